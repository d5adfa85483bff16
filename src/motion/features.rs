use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::gravity::GravityFilter;
use super::types::{FeatureVector, Sample, Vector3};

/// Window sizes and filter tuning for feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureConfig {
    /// Maximum samples held in the sliding window.
    pub window_capacity: usize,
    /// Samples required before any features are produced.
    pub min_samples: usize,
    /// Trailing samples considered for jerk.
    pub jerk_window: usize,
    /// Trailing samples considered for rotation magnitude.
    pub rotation_window: usize,
    /// Low-pass coefficient for gravity removal.
    pub gravity_alpha: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            window_capacity: 50,
            min_samples: 10,
            jerk_window: 10,
            rotation_window: 5,
            gravity_alpha: 0.8,
        }
    }
}

/// A sample together with the linear acceleration the extractor settled on.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    sample: Sample,
    linear: Vector3,
}

impl WindowEntry {
    fn magnitude(&self) -> f64 {
        self.linear.magnitude()
    }
}

/// Sliding window of recent samples and the scalar features derived from it.
///
/// Gravity removal runs once per sample as it enters the window, so the filter
/// state advances with the stream and `extract_features` has no side effects.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: FeatureConfig,
    window: VecDeque<WindowEntry>,
    gravity: GravityFilter,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        let capacity = config.window_capacity.max(1);
        Self {
            gravity: GravityFilter::new(config.gravity_alpha),
            window: VecDeque::with_capacity(capacity),
            config: FeatureConfig {
                window_capacity: capacity,
                ..config
            },
        }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn add_sample(&mut self, sample: Sample) {
        // The filter tracks every raw reading so its estimate stays warm even
        // while the platform supplies linear acceleration directly.
        let derived = self.gravity.linear(sample.gravity_acceleration);
        let linear = if sample.linear_acceleration.is_zero() {
            derived
        } else {
            sample.linear_acceleration
        };

        if self.window.len() == self.config.window_capacity {
            self.window.pop_front();
        }
        self.window.push_back(WindowEntry { sample, linear });
    }

    /// Features for the current window, or `None` while fewer than
    /// `min_samples` samples have been collected.
    pub fn extract_features(&self) -> Option<FeatureVector> {
        if self.window.len() < self.config.min_samples.max(1) {
            return None;
        }
        let newest = self.window.back()?;

        let magnitudes: Vec<f64> = self.window.iter().map(WindowEntry::magnitude).collect();
        let count = magnitudes.len() as f64;
        let average = magnitudes.iter().sum::<f64>() / count;
        let peak = magnitudes.iter().copied().fold(0.0, f64::max);
        let variance = magnitudes
            .iter()
            .map(|m| (m - average).powi(2))
            .sum::<f64>()
            / count;

        Some(FeatureVector {
            timestamp_ms: newest.sample.timestamp_ms,
            magnitude: newest.magnitude(),
            jerk: self.jerk(),
            variance,
            peak_acceleration: peak,
            average_acceleration: average,
            rotation_magnitude: self.rotation_magnitude(),
        })
    }

    /// Largest ‖Δa/Δt‖ over adjacent pairs in the jerk sub-window.
    /// Pairs with a zero or negative time step are skipped.
    fn jerk(&self) -> f64 {
        let start = self.window.len().saturating_sub(self.config.jerk_window);
        let recent: Vec<&WindowEntry> = self.window.range(start..).collect();

        let mut max_jerk: f64 = 0.0;
        let mut valid_pairs = 0;
        for pair in recent.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let dt_ms = curr.sample.timestamp_ms as i128 - prev.sample.timestamp_ms as i128;
            if dt_ms <= 0 {
                continue;
            }
            let dt_secs = dt_ms as f64 / 1000.0;
            let jerk = curr.linear.sub(&prev.linear).scale(1.0 / dt_secs).magnitude();
            if jerk.is_finite() {
                max_jerk = max_jerk.max(jerk);
                valid_pairs += 1;
            }
        }

        if valid_pairs < 2 {
            0.0
        } else {
            max_jerk
        }
    }

    fn rotation_magnitude(&self) -> f64 {
        let start = self.window.len().saturating_sub(self.config.rotation_window);
        self.window
            .range(start..)
            .map(|entry| entry.sample.rotation_rate.magnitude())
            .fold(0.0, f64::max)
    }

    /// Drop all buffered samples and the gravity estimate.
    pub fn clear(&mut self) {
        self.window.clear();
        self.gravity.reset();
    }

    pub fn buffer_len(&self) -> usize {
        self.window.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::types::RotationRate;

    fn linear_sample(timestamp_ms: u64, linear: Vector3) -> Sample {
        Sample::new(
            timestamp_ms,
            linear,
            Vector3::new(0.0, 0.0, 9.81).sub(&linear.scale(-1.0)),
            RotationRate::default(),
        )
    }

    fn steady_samples(count: u64, magnitude: f64) -> Vec<Sample> {
        (0..count)
            .map(|i| linear_sample(i * 20, Vector3::new(magnitude, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_insufficient_data_below_min_samples() {
        let mut extractor = FeatureExtractor::default();
        for (i, sample) in steady_samples(9, 1.0).into_iter().enumerate() {
            extractor.add_sample(sample);
            assert!(extractor.extract_features().is_none(), "returned features at {} samples", i + 1);
        }
        extractor.add_sample(linear_sample(500, Vector3::new(1.0, 0.0, 0.0)));
        assert!(extractor.extract_features().is_some());
    }

    #[test]
    fn test_window_evicts_oldest_first() {
        let mut extractor = FeatureExtractor::default();
        for sample in steady_samples(60, 1.0) {
            extractor.add_sample(sample);
            assert!(extractor.buffer_len() <= 50);
        }
        assert_eq!(extractor.buffer_len(), 50);
        // Samples 0..10 (timestamps 0..180) were evicted
        assert_eq!(extractor.window.front().unwrap().sample.timestamp_ms, 200);
        assert_eq!(extractor.window.back().unwrap().sample.timestamp_ms, 1180);
    }

    #[test]
    fn test_steady_signal_features() {
        let mut extractor = FeatureExtractor::default();
        for sample in steady_samples(20, 2.0) {
            extractor.add_sample(sample);
        }
        let features = extractor.extract_features().unwrap();

        assert!((features.magnitude - 2.0).abs() < 1e-9);
        assert!((features.peak_acceleration - 2.0).abs() < 1e-9);
        assert!((features.average_acceleration - 2.0).abs() < 1e-9);
        assert!(features.variance.abs() < 1e-9);
        assert!(features.jerk.abs() < 1e-9);
        assert_eq!(features.rotation_magnitude, 0.0);
        assert_eq!(features.timestamp_ms, 380);
    }

    #[test]
    fn test_jerk_from_single_step() {
        let mut extractor = FeatureExtractor::default();
        for sample in steady_samples(15, 0.0) {
            extractor.add_sample(sample);
        }
        // 10 m/s² jump across 20 ms = 500 m/s³
        extractor.add_sample(linear_sample(300, Vector3::new(0.0, 10.0, 0.0)));
        let features = extractor.extract_features().unwrap();
        assert!((features.jerk - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_jerk_skips_non_positive_time_steps() {
        let mut extractor = FeatureExtractor::default();
        for sample in steady_samples(12, 1.0) {
            extractor.add_sample(sample);
        }
        // Duplicate and backwards timestamps with a large change
        extractor.add_sample(linear_sample(220, Vector3::new(50.0, 0.0, 0.0)));
        extractor.add_sample(linear_sample(100, Vector3::new(-50.0, 0.0, 0.0)));
        let features = extractor.extract_features().unwrap();

        assert!(features.jerk.is_finite());
        assert!(features.jerk >= 0.0);
        assert!(features.jerk.abs() < 1e-9);
    }

    #[test]
    fn test_jerk_zero_with_fewer_than_two_valid_pairs() {
        let mut extractor = FeatureExtractor::default();
        for i in 0..10 {
            // All samples share a timestamp except the last
            let ts = if i == 9 { 20 } else { 0 };
            extractor.add_sample(linear_sample(ts, Vector3::new(i as f64, 0.0, 0.0)));
        }
        assert_eq!(extractor.extract_features().unwrap().jerk, 0.0);
    }

    #[test]
    fn test_rotation_uses_recent_samples_only() {
        let mut extractor = FeatureExtractor::default();
        extractor.add_sample(Sample::new(
            0,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 9.81),
            RotationRate::new(500.0, 0.0, 0.0),
        ));
        for i in 1..10 {
            extractor.add_sample(Sample::new(
                i * 20,
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 9.81),
                RotationRate::new(0.0, 30.0, 40.0),
            ));
        }
        let features = extractor.extract_features().unwrap();
        assert!((features.rotation_magnitude - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_variance_of_alternating_magnitudes() {
        let mut extractor = FeatureExtractor::default();
        for i in 0..10u64 {
            let m = if i % 2 == 0 { 1.0 } else { 3.0 };
            extractor.add_sample(linear_sample(i * 20, Vector3::new(m, 0.0, 0.0)));
        }
        let features = extractor.extract_features().unwrap();
        assert!((features.average_acceleration - 2.0).abs() < 1e-9);
        assert!((features.variance - 1.0).abs() < 1e-9);
        assert!((features.peak_acceleration - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_gravity_removed_when_linear_missing() {
        let mut extractor = FeatureExtractor::default();
        for i in 0..20 {
            extractor.add_sample(Sample::raw(
                i * 20,
                Vector3::new(0.0, 0.0, 9.81),
                RotationRate::default(),
            ));
        }
        let features = extractor.extract_features().unwrap();
        assert!(features.magnitude < 1e-9);
        assert!(features.peak_acceleration < 1e-9);
    }

    #[test]
    fn test_clear_empties_window_and_filter() {
        let mut extractor = FeatureExtractor::default();
        for i in 0..20 {
            extractor.add_sample(Sample::raw(
                i * 20,
                Vector3::new(0.0, 0.0, 9.81),
                RotationRate::default(),
            ));
        }
        extractor.clear();
        assert_eq!(extractor.buffer_len(), 0);
        assert!(extractor.extract_features().is_none());

        // A freshly seeded filter yields zero for the first raw reading in a new orientation
        extractor.add_sample(Sample::raw(0, Vector3::new(9.81, 0.0, 0.0), RotationRate::default()));
        assert!(extractor.window.back().unwrap().linear.magnitude() < 1e-12);
    }
}
