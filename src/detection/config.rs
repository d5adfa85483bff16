use serde::{Deserialize, Serialize};

use crate::motion::FeatureConfig;

/// Thresholds for the free-fall → impact → inactivity sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallThresholds {
    /// Magnitude below which the device is considered in free fall (m/s²).
    pub free_fall_max: f64,
    /// Peak acceleration that counts as an impact (m/s²).
    pub impact_min: f64,
    /// Jerk that must accompany the impact (m/s³).
    pub jerk_spike_min: f64,
    /// Average acceleration below which the device is considered still after impact (m/s²).
    pub inactivity_max: f64,
    pub min_free_fall_ms: u64,
    /// How long a confirmed fall keeps reporting before returning to idle.
    pub post_impact_ms: u64,
    /// Any state older than this since its last transition is abandoned.
    pub sequence_timeout_ms: u64,
    pub impact_confidence: f64,
    pub post_impact_confidence: f64,
    pub confirmed_confidence: f64,
}

impl Default for FallThresholds {
    fn default() -> Self {
        Self {
            free_fall_max: 1.5,
            impact_min: 40.0,
            jerk_spike_min: 200.0,
            inactivity_max: 8.0,
            min_free_fall_ms: 300,
            post_impact_ms: 1000,
            sequence_timeout_ms: 2000,
            impact_confidence: 0.75,
            post_impact_confidence: 0.85,
            confirmed_confidence: 0.9,
        }
    }
}

/// Indicator thresholds for violent movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViolentThresholds {
    pub jerk_high: f64,
    pub accel_peak: f64,
    /// deg/s
    pub rotation_rapid: f64,
    pub variance_high: f64,
    /// Confidence indexed by the number of indicators that fired (0..=4).
    pub confidence_by_count: [f64; 5],
}

impl Default for ViolentThresholds {
    fn default() -> Self {
        Self {
            jerk_high: 150.0,
            accel_peak: 30.0,
            rotation_rapid: 300.0,
            variance_high: 50.0,
            confidence_by_count: [0.0, 0.0, 0.6, 0.8, 0.95],
        }
    }
}

/// Thresholds for sustained abnormal motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AbnormalThresholds {
    pub average_min: f64,
    pub variance_min: f64,
    pub peak_min: f64,
    /// Lower companion threshold applied to the history.
    pub sustained_average_min: f64,
    /// Number of most recent history entries examined.
    pub sustained_window: usize,
    /// How many of those must exceed `sustained_average_min`.
    pub sustained_min_hits: usize,
    pub base_confidence: f64,
    pub sustained_confidence: f64,
}

impl Default for AbnormalThresholds {
    fn default() -> Self {
        Self {
            average_min: 15.0,
            variance_min: 40.0,
            peak_min: 25.0,
            sustained_average_min: 12.0,
            sustained_window: 7,
            sustained_min_hits: 6,
            base_confidence: 0.5,
            sustained_confidence: 0.75,
        }
    }
}

/// Feature ceilings of one ordinary activity. A feature vector strictly below
/// every ceiling matches the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityProfile {
    pub name: String,
    pub peak_max: f64,
    pub variance_max: f64,
    pub jerk_max: f64,
    pub rotation_max: f64,
}

impl ActivityProfile {
    pub fn new(name: &str, peak_max: f64, variance_max: f64, jerk_max: f64, rotation_max: f64) -> Self {
        Self {
            name: name.to_string(),
            peak_max,
            variance_max,
            jerk_max,
            rotation_max,
        }
    }

    pub fn walking() -> Self {
        Self::new("walking", 15.0, 10.0, 80.0, 150.0)
    }

    pub fn running() -> Self {
        Self::new("running", 25.0, 30.0, 140.0, 250.0)
    }

    /// Picking the phone up, turning it over, putting it in a pocket.
    pub fn handling() -> Self {
        Self::new("handling", 12.0, 8.0, 120.0, 400.0)
    }
}

/// Every tunable of the pattern detector in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionConfig {
    pub features: FeatureConfig,
    pub fall: FallThresholds,
    pub violent: ViolentThresholds,
    pub abnormal: AbnormalThresholds,
    pub normal_profiles: Vec<ActivityProfile>,
    /// Feature vectors kept for trend scoring.
    pub history_len: usize,
    /// The winning detector must reach this confidence or the result is `None`.
    pub min_confidence: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            fall: FallThresholds::default(),
            violent: ViolentThresholds::default(),
            abnormal: AbnormalThresholds::default(),
            normal_profiles: vec![
                ActivityProfile::walking(),
                ActivityProfile::running(),
                ActivityProfile::handling(),
            ],
            history_len: 10,
            min_confidence: 0.75,
        }
    }
}
