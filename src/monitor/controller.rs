use anyhow::{anyhow, bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::monitor_loop;
use super::session::{MonitorOutput, MonitoringSession};
use crate::motion::Sample;

/// Buffered samples between the sensor feed and the monitor task.
const SAMPLE_CHANNEL_CAPACITY: usize = 256;

/// Runs a `MonitoringSession` on a tokio task fed through a channel.
pub struct MonitorController {
    handle: Option<JoinHandle<MonitoringSession>>,
    cancel_token: Option<CancellationToken>,
    sample_tx: Option<mpsc::Sender<Sample>>,
}

impl MonitorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            sample_tx: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        session: MonitoringSession,
        outputs: mpsc::Sender<MonitorOutput>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("monitoring already active");
        }

        let cancel_token = CancellationToken::new();
        let (sample_tx, sample_rx) = mpsc::channel(SAMPLE_CHANNEL_CAPACITY);

        let handle = tokio::spawn(monitor_loop(session, sample_rx, outputs, cancel_token.clone()));

        info!("monitoring started");
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.sample_tx = Some(sample_tx);
        Ok(())
    }

    /// A sender the sensor feed can own directly.
    pub fn sample_sender(&self) -> Option<mpsc::Sender<Sample>> {
        self.sample_tx.clone()
    }

    pub async fn feed(&self, sample: Sample) -> Result<()> {
        let tx = self
            .sample_tx
            .as_ref()
            .ok_or_else(|| anyhow!("monitoring not active"))?;
        tx.send(sample)
            .await
            .map_err(|_| anyhow!("monitor loop has exited"))
    }

    /// Cancel the monitor task and return its session. Samples still queued
    /// are dropped.
    pub async fn stop(&mut self) -> Result<Option<MonitoringSession>> {
        self.sample_tx = None;
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            let session = handle.await.context("monitor task failed to join")?;
            info!("monitoring stopped");
            Ok(Some(session))
        } else {
            Ok(None)
        }
    }

    /// Close the sample channel and let the task finish everything queued.
    pub async fn drain(&mut self) -> Result<Option<MonitoringSession>> {
        self.sample_tx = None;
        let session = match self.handle.take() {
            Some(handle) => Some(handle.await.context("monitor task failed to join")?),
            None => None,
        };
        self.cancel_token = None;
        Ok(session)
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertConfig;
    use crate::detection::DetectionConfig;
    use crate::motion::{RotationRate, Vector3};

    fn session() -> MonitoringSession {
        MonitoringSession::new(DetectionConfig::default(), AlertConfig::default(), None)
    }

    fn sample(timestamp_ms: u64) -> Sample {
        Sample::new(
            timestamp_ms,
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 9.81),
            RotationRate::default(),
        )
    }

    #[tokio::test]
    async fn test_forwards_classifications() {
        let mut controller = MonitorController::new();
        let (out_tx, mut out_rx) = mpsc::channel(64);
        controller.start(session(), out_tx).unwrap();

        for i in 0..15 {
            controller.feed(sample(i * 20)).await.unwrap();
        }
        let session = controller.drain().await.unwrap().unwrap();
        assert_eq!(session.samples_seen(), 15);

        let mut received = 0;
        while out_rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 6);
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut controller = MonitorController::new();
        let (out_tx, _out_rx) = mpsc::channel(8);
        controller.start(session(), out_tx.clone()).unwrap();
        assert!(controller.start(session(), out_tx).is_err());
        assert!(controller.stop().await.unwrap().is_some());
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn test_stop_with_unread_outputs() {
        let mut controller = MonitorController::new();
        let (out_tx, _out_rx) = mpsc::channel(1);
        controller.start(session(), out_tx).unwrap();

        for i in 0..15 {
            controller.feed(sample(i * 20)).await.unwrap();
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let stopped = tokio::time::timeout(std::time::Duration::from_secs(3), controller.stop())
            .await
            .expect("stop blocked on a full output channel");
        assert!(stopped.unwrap().is_some());
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn test_feed_without_start_fails() {
        let controller = MonitorController::new();
        assert!(controller.feed(sample(0)).await.is_err());
    }

    #[tokio::test]
    async fn test_stop_when_idle() {
        let mut controller = MonitorController::default();
        assert!(controller.stop().await.unwrap().is_none());
    }
}
