use std::sync::Arc;

use serde::Serialize;

use crate::alert::{AlarmPlayer, AlertConfig, AlertConfigUpdate, AlertEvent, AlertTrigger};
use crate::detection::{Classification, DetectionConfig, PatternDetector};
use crate::motion::{FeatureExtractor, Sample};
use crate::settings::EngineSettings;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// What one processed sample produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOutput {
    pub classification: Classification,
    pub alert: Option<AlertEvent>,
}

/// One monitoring session: sample window, pattern detector and alert trigger,
/// run inline for every sample. Not shared between threads; callers that
/// receive samples concurrently must serialize access.
pub struct MonitoringSession {
    extractor: FeatureExtractor,
    detector: PatternDetector,
    trigger: AlertTrigger,
    samples_seen: u64,
}

impl MonitoringSession {
    pub fn new(
        detection: DetectionConfig,
        alert: AlertConfig,
        player: Option<Arc<dyn AlarmPlayer>>,
    ) -> Self {
        Self {
            extractor: FeatureExtractor::new(detection.features.clone()),
            detector: PatternDetector::new(detection),
            trigger: AlertTrigger::new(alert, player),
            samples_seen: 0,
        }
    }

    pub fn from_settings(settings: &EngineSettings, player: Option<Arc<dyn AlarmPlayer>>) -> Self {
        Self::new(settings.detection.clone(), settings.alert.clone(), player)
    }

    /// Drop all buffered state so a new session starts cold.
    pub fn start(&mut self) {
        self.extractor.clear();
        self.detector.reset();
        self.trigger.reset();
        self.samples_seen = 0;
        log_info!("monitoring session started");
    }

    pub fn stop(&mut self) {
        self.trigger.stop_alert();
        log_info!("monitoring session stopped after {} samples", self.samples_seen);
    }

    /// Feed one sample through extraction, detection and alerting. Returns
    /// `None` while the window is still warming up.
    pub fn process_sample(&mut self, sample: Sample) -> Option<MonitorOutput> {
        self.samples_seen += 1;
        self.extractor.add_sample(sample);
        let features = self.extractor.extract_features()?;
        let classification = self.detector.detect(&features);
        let alert = self.trigger.evaluate(&classification);
        Some(MonitorOutput {
            classification,
            alert,
        })
    }

    pub fn update_alert_config(&mut self, update: &AlertConfigUpdate) {
        self.trigger.update_config(update);
    }

    pub fn stop_alert(&mut self) {
        self.trigger.stop_alert();
    }

    /// Manual alarm check; stamped with the newest sample time seen.
    pub fn test_alert(&mut self) -> Option<AlertEvent> {
        let now = self
            .extractor
            .extract_features()
            .map(|f| f.timestamp_ms)
            .or(self.trigger.state().last_alert_ms)
            .unwrap_or(0);
        self.trigger.test_alert(now)
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    pub fn trigger(&self) -> &AlertTrigger {
        &self.trigger
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }
}
