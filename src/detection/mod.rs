pub mod abnormal;
pub mod classification;
pub mod config;
pub mod detector;
pub mod fall;
pub mod profiles;
pub mod violent;

pub use classification::{Classification, MotionKind};
pub use config::{AbnormalThresholds, ActivityProfile, DetectionConfig, FallThresholds, ViolentThresholds};
pub use detector::{DetectorScores, PatternDetector};
pub use fall::{FallDetector, FallState};
