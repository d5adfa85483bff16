//! End-to-end tests: synthetic traces through extraction, detection and alerting.

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use crate::alert::trigger::tests::RecordingPlayer;
    use crate::alert::{AlertConfig, AlertConfigUpdate};
    use crate::detection::{Classification, DetectionConfig, MotionKind};
    use crate::monitor::{MonitorController, MonitorOutput, MonitoringSession};
    use crate::motion::Sample;
    use crate::simulate::TraceBuilder;

    fn run(session: &mut MonitoringSession, trace: &[Sample]) -> Vec<MonitorOutput> {
        trace
            .iter()
            .filter_map(|s| session.process_sample(*s))
            .collect()
    }

    fn default_session() -> MonitoringSession {
        MonitoringSession::new(DetectionConfig::default(), AlertConfig::default(), None)
    }

    fn kinds(outputs: &[MonitorOutput]) -> Vec<MotionKind> {
        outputs.iter().map(|o| o.classification.kind).collect()
    }

    #[test]
    fn test_ordinary_activity_never_alerts() {
        let trace = TraceBuilder::new(11)
            .standing(3000)
            .walking(5000)
            .running(5000)
            .handling(2000)
            .walking(2000)
            .build();

        let mut session = default_session();
        session.start();
        let outputs = run(&mut session, &trace);

        assert!(!outputs.is_empty());
        assert!(outputs.iter().all(|o| o.classification.kind == MotionKind::None));
        assert!(outputs.iter().all(|o| o.alert.is_none()));
    }

    #[test]
    fn test_fall_detected_and_alerted_once() {
        let trace = TraceBuilder::new(5).walking(3000).fall().walking(2000).build();
        let recorder = Arc::new(RecordingPlayer::default());
        let mut session =
            MonitoringSession::new(DetectionConfig::default(), AlertConfig::default(), Some(recorder.clone()));
        session.start();

        let outputs = run(&mut session, &trace);
        let falls: Vec<&Classification> = outputs
            .iter()
            .map(|o| &o.classification)
            .filter(|c| c.kind == MotionKind::Fall)
            .collect();

        assert!(!falls.is_empty());
        assert_eq!(falls[0].confidence, 0.75);
        assert_eq!(falls[1].confidence, 0.85);
        assert!(falls[2..].iter().all(|c| c.confidence == 0.9));

        let alerts: Vec<_> = outputs.iter().filter_map(|o| o.alert.as_ref()).collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, MotionKind::Fall);
        assert_eq!(alerts[0].timestamp_ms, falls[0].timestamp_ms);
        assert_eq!(recorder.plays.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fall_reported_for_at_most_post_impact_window() {
        let trace = TraceBuilder::new(9).walking(2000).fall().build();
        let mut session = default_session();
        session.start();
        let outputs = run(&mut session, &trace);

        let fall_times: Vec<u64> = outputs
            .iter()
            .filter(|o| o.classification.kind == MotionKind::Fall)
            .map(|o| o.classification.timestamp_ms)
            .collect();
        let first = fall_times[0];
        let last = *fall_times.last().unwrap();
        // Impact step, then post-impact entry, then < 1000ms of confirmed reporting
        assert!(last - first <= 1020);
    }

    #[test]
    fn test_violent_shaking_alerts() {
        let trace = TraceBuilder::new(21).walking(2000).shaking(2000).build();
        let mut session = default_session();
        session.start();
        let outputs = run(&mut session, &trace);

        assert!(kinds(&outputs).contains(&MotionKind::ViolentMovement));
        let alerts: Vec<_> = outputs.iter().filter_map(|o| o.alert.as_ref()).collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, MotionKind::ViolentMovement);
        assert!(alerts[0].confidence >= 0.75);
    }

    #[test]
    fn test_cooldown_spaces_alerts() {
        let trace = TraceBuilder::new(4).walking(1000).shaking(12_000).build();
        let mut session = default_session();
        session.start();
        session.update_alert_config(&AlertConfigUpdate {
            cooldown_period_ms: Some(5000),
            ..Default::default()
        });

        let outputs = run(&mut session, &trace);
        let alert_times: Vec<u64> = outputs
            .iter()
            .filter_map(|o| o.alert.as_ref())
            .map(|a| a.timestamp_ms)
            .collect();

        assert!(alert_times.len() >= 2);
        assert!(alert_times.windows(2).all(|w| w[1] - w[0] >= 5000));
    }

    #[test]
    fn test_disabled_alerts_still_classify() {
        let trace = TraceBuilder::new(5).walking(3000).fall().build();
        let mut session = default_session();
        session.start();
        session.update_alert_config(&AlertConfigUpdate {
            enabled: Some(false),
            ..Default::default()
        });

        let outputs = run(&mut session, &trace);
        assert!(kinds(&outputs).contains(&MotionKind::Fall));
        assert!(outputs.iter().all(|o| o.alert.is_none()));
    }

    #[test]
    fn test_restart_reproduces_classifications() {
        let trace = TraceBuilder::new(5).walking(3000).fall().shaking(1000).build();
        let mut session = default_session();

        session.start();
        let first: Vec<Classification> = run(&mut session, &trace)
            .into_iter()
            .map(|o| o.classification)
            .collect();

        session.start();
        let second: Vec<Classification> = run(&mut session, &trace)
            .into_iter()
            .map(|o| o.classification)
            .collect();

        assert!(first.iter().any(|c| c.kind == MotionKind::Fall));
        assert_eq!(first, second);
    }

    #[test]
    fn test_raw_only_stream_is_processed() {
        let trace = TraceBuilder::new(8).raw_only(true).walking(4000).build();
        let mut session = default_session();
        session.start();
        let outputs = run(&mut session, &trace);

        assert_eq!(outputs.len(), trace.len() - 9);
        for o in &outputs {
            let f = &o.classification.features;
            assert!(f.magnitude.is_finite() && f.magnitude >= 0.0);
            assert!(f.variance >= 0.0 && f.jerk >= 0.0);
        }
    }

    #[test]
    fn test_low_rate_stream() {
        // 1 Hz: window warms after 10 seconds, nothing fires on walking
        let trace = TraceBuilder::new(2).interval_ms(1000).walking(30_000).build();
        let mut session = default_session();
        session.start();
        let outputs = run(&mut session, &trace);
        assert_eq!(outputs.len(), 21);
        assert!(outputs.iter().all(|o| o.alert.is_none()));
    }

    #[tokio::test]
    async fn test_controller_end_to_end() {
        let trace = TraceBuilder::new(5).walking(3000).fall().build();
        let mut controller = MonitorController::new();
        let (out_tx, mut out_rx) = tokio::sync::mpsc::channel(1024);
        controller.start(default_session(), out_tx).unwrap();

        let sender = controller.sample_sender().unwrap();
        for sample in &trace {
            sender.send(*sample).await.unwrap();
        }
        drop(sender);
        controller.drain().await.unwrap();

        let mut alerts = Vec::new();
        while let Ok(output) = out_rx.try_recv() {
            if let Some(alert) = output.alert {
                alerts.push(alert);
            }
        }
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, MotionKind::Fall);
    }
}
