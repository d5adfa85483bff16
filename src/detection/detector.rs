use std::collections::VecDeque;

use super::abnormal::score_abnormal;
use super::classification::{Classification, MotionKind};
use super::config::DetectionConfig;
use super::fall::{FallDetector, FallState};
use super::violent::score_violent;
use crate::motion::FeatureVector;

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Evaluation order; the first detector with a non-zero score wins.
pub const PRIORITY: [MotionKind; 3] = [
    MotionKind::Fall,
    MotionKind::ViolentMovement,
    MotionKind::AbnormalMotion,
];

/// Per-detector confidences for one step, before the minimum-confidence gate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectorScores {
    pub fall: f64,
    pub violent: f64,
    pub abnormal: f64,
}

impl DetectorScores {
    pub fn get(&self, kind: MotionKind) -> f64 {
        match kind {
            MotionKind::Fall => self.fall,
            MotionKind::ViolentMovement => self.violent,
            MotionKind::AbnormalMotion => self.abnormal,
            MotionKind::None => 0.0,
        }
    }

    /// Highest-priority detector that produced a non-zero score.
    pub fn winner(&self) -> Option<(MotionKind, f64)> {
        PRIORITY
            .iter()
            .map(|kind| (*kind, self.get(*kind)))
            .find(|(_, confidence)| *confidence > 0.0)
    }
}

/// Runs the fall, violent-movement and abnormal-motion detectors over each
/// feature vector and reduces them to one classification.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    config: DetectionConfig,
    fall: FallDetector,
    history: VecDeque<FeatureVector>,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

impl PatternDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            fall: FallDetector::new(config.fall.clone()),
            history: VecDeque::with_capacity(config.history_len),
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn fall_state(&self) -> FallState {
        self.fall.state()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Score every detector for this step. Advances the fall state machine
    /// and the trend history exactly once.
    pub fn score(&mut self, features: &FeatureVector) -> DetectorScores {
        let profiles = &self.config.normal_profiles;
        let scores = DetectorScores {
            fall: self.fall.step(features),
            violent: score_violent(&self.config.violent, profiles, features),
            abnormal: score_abnormal(&self.config.abnormal, profiles, &self.history, features),
        };
        self.push_history(*features);
        scores
    }

    pub fn detect(&mut self, features: &FeatureVector) -> Classification {
        let scores = self.score(features);

        match scores.winner() {
            Some((kind, confidence)) if confidence >= self.config.min_confidence => {
                Classification::new(kind, confidence, *features)
            }
            Some((kind, confidence)) => {
                log_debug!(
                    "{} scored {:.2}, below minimum {:.2}",
                    kind.label(),
                    confidence,
                    self.config.min_confidence
                );
                Classification::none(*features)
            }
            None => Classification::none(*features),
        }
    }

    fn push_history(&mut self, features: FeatureVector) {
        if self.config.history_len == 0 {
            return;
        }
        if self.history.len() == self.config.history_len {
            self.history.pop_front();
        }
        self.history.push_back(features);
    }

    /// Back to idle with an empty history.
    pub fn reset(&mut self) {
        self.fall.reset();
        self.history.clear();
    }
}
