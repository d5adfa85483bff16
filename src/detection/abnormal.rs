use std::collections::VecDeque;

use super::config::{AbnormalThresholds, ActivityProfile};
use super::profiles::is_normal_activity;
use crate::motion::FeatureVector;

/// Sustained-motion confidence.
///
/// `history` holds earlier feature vectors, oldest first, not including
/// `features`. A single elevated window scores the base confidence; it is
/// raised when most of the recent history was elevated too.
pub fn score_abnormal(
    thresholds: &AbnormalThresholds,
    profiles: &[ActivityProfile],
    history: &VecDeque<FeatureVector>,
    features: &FeatureVector,
) -> f64 {
    let elevated = features.average_acceleration > thresholds.average_min
        && features.variance > thresholds.variance_min
        && features.peak_acceleration > thresholds.peak_min;
    if !elevated || is_normal_activity(profiles, features) {
        return 0.0;
    }

    if is_sustained(thresholds, history) {
        thresholds.sustained_confidence
    } else {
        thresholds.base_confidence
    }
}

fn is_sustained(thresholds: &AbnormalThresholds, history: &VecDeque<FeatureVector>) -> bool {
    let window = thresholds.sustained_window;
    if window == 0 || history.len() < window {
        return false;
    }
    let hits = history
        .iter()
        .skip(history.len() - window)
        .filter(|f| f.average_acceleration > thresholds.sustained_average_min)
        .count();
    hits >= thresholds.sustained_min_hits
}
