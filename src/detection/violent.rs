use super::config::{ActivityProfile, ViolentThresholds};
use super::profiles::is_normal_activity;
use crate::motion::FeatureVector;

/// Number of violent-movement indicators the features trip (0..=4).
pub fn indicator_count(thresholds: &ViolentThresholds, features: &FeatureVector) -> usize {
    [
        features.jerk > thresholds.jerk_high,
        features.peak_acceleration > thresholds.accel_peak,
        features.rotation_magnitude > thresholds.rotation_rapid,
        features.variance > thresholds.variance_high,
    ]
    .iter()
    .filter(|hit| **hit)
    .count()
}

/// Violent-movement confidence. Zero when fewer than two indicators fire or
/// the features look like ordinary activity.
pub fn score_violent(
    thresholds: &ViolentThresholds,
    profiles: &[ActivityProfile],
    features: &FeatureVector,
) -> f64 {
    let count = indicator_count(thresholds, features);
    let confidence = thresholds
        .confidence_by_count
        .get(count)
        .copied()
        .unwrap_or(0.0);

    if confidence <= 0.0 || is_normal_activity(profiles, features) {
        return 0.0;
    }
    confidence
}
