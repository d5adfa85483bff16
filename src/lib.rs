//! Fall and violent-motion detection for inertial sensor streams.
//!
//! Samples flow through three stages, each owned by one session:
//!
//! - [`motion::FeatureExtractor`] keeps a sliding window, removes gravity and
//!   computes scalar features (magnitude, jerk, variance, peaks, rotation).
//! - [`detection::PatternDetector`] runs the fall state machine, the
//!   violent-movement and abnormal-motion scorers, suppresses ordinary
//!   activity and reduces everything to one [`detection::Classification`].
//! - [`alert::AlertTrigger`] applies the enable flag, confidence threshold and
//!   cooldown, then sounds the alarm and emits an [`alert::AlertEvent`].
//!
//! [`monitor::MonitoringSession`] wires the three together; hosts that
//! receive samples on an async runtime can use [`monitor::MonitorController`].
//!
//! ```ignore
//! use fallsense_lib::monitor::MonitoringSession;
//! use fallsense_lib::settings::EngineSettings;
//!
//! let mut session = MonitoringSession::from_settings(&EngineSettings::default(), None);
//! session.start();
//! for sample in samples {
//!     if let Some(output) = session.process_sample(sample) {
//!         if let Some(alert) = output.alert {
//!             store.record(alert);
//!         }
//!     }
//! }
//! ```

pub mod alert;
pub mod detection;
pub mod monitor;
pub mod motion;
pub mod settings;
pub mod simulate;
mod utils;

#[cfg(test)]
mod integration_tests;

pub use alert::{AlarmPlayer, AlertConfig, AlertConfigUpdate, AlertEvent, AlertSoundHandle, AlertTrigger};
pub use detection::{Classification, DetectionConfig, MotionKind, PatternDetector};
pub use monitor::{MonitorController, MonitorOutput, MonitoringSession};
pub use motion::{FeatureExtractor, FeatureVector, RotationRate, Sample, Vector3};
pub use settings::{EngineSettings, SettingsStore};

/// Install `env_logger` as the `log` backend (reads `RUST_LOG`, defaults to
/// info). Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
