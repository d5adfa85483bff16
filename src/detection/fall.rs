//! Fall detection as a small state machine.
//!
//! A fall is free fall (near-zero net acceleration) followed by an impact
//! (acceleration peak together with a jerk spike) and then inactivity. Time
//! is taken from the feature timestamps; nothing here schedules callbacks.

use serde::{Deserialize, Serialize};

use super::config::FallThresholds;
use crate::motion::FeatureVector;

const ENABLE_LOGS: bool = true;

use crate::log_debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FallState {
    Idle,
    FreeFall,
    Impact,
    PostImpact,
}

impl Default for FallState {
    fn default() -> Self {
        FallState::Idle
    }
}

#[derive(Debug, Clone)]
pub struct FallDetector {
    thresholds: FallThresholds,
    state: FallState,
    /// When the current state was entered; `None` while idle.
    state_entered_ms: Option<u64>,
    free_fall_started_ms: Option<u64>,
}

impl FallDetector {
    pub fn new(thresholds: FallThresholds) -> Self {
        Self {
            thresholds,
            state: FallState::Idle,
            state_entered_ms: None,
            free_fall_started_ms: None,
        }
    }

    pub fn state(&self) -> FallState {
        self.state
    }

    pub fn thresholds(&self) -> &FallThresholds {
        &self.thresholds
    }

    /// Advance the state machine by one feature vector and return the fall
    /// confidence for this step (0 when no fall is being reported).
    pub fn step(&mut self, features: &FeatureVector) -> f64 {
        let now = features.timestamp_ms;
        let t = self.thresholds.clone();

        if let Some(entered) = self.state_entered_ms {
            if now.saturating_sub(entered) > t.sequence_timeout_ms {
                log_debug!(
                    "fall sequence timed out in {:?} after {}ms",
                    self.state,
                    now.saturating_sub(entered)
                );
                self.reset();
            }
        }

        match self.state {
            FallState::Idle => {
                if features.magnitude < t.free_fall_max {
                    self.free_fall_started_ms = Some(now);
                    self.transition(FallState::FreeFall, now);
                }
                0.0
            }
            FallState::FreeFall => {
                let in_free_fall = now.saturating_sub(self.free_fall_started_ms.unwrap_or(now));
                let impact = features.peak_acceleration > t.impact_min
                    && features.jerk > t.jerk_spike_min
                    && in_free_fall >= t.min_free_fall_ms;

                if impact {
                    let confidence = t.impact_confidence;
                    self.transition(FallState::Impact, now);
                    confidence
                } else if features.magnitude > t.free_fall_max {
                    log_debug!("free fall ended without impact after {}ms", in_free_fall);
                    self.reset();
                    0.0
                } else {
                    0.0
                }
            }
            FallState::Impact => {
                if features.average_acceleration < t.inactivity_max {
                    let confidence = t.post_impact_confidence;
                    self.transition(FallState::PostImpact, now);
                    confidence
                } else {
                    log_debug!(
                        "impact rejected, still moving (average {:.2})",
                        features.average_acceleration
                    );
                    self.reset();
                    0.0
                }
            }
            FallState::PostImpact => {
                let elapsed = now.saturating_sub(self.state_entered_ms.unwrap_or(now));
                if elapsed < t.post_impact_ms {
                    t.confirmed_confidence
                } else {
                    self.reset();
                    0.0
                }
            }
        }
    }

    fn transition(&mut self, next: FallState, now: u64) {
        log_debug!("fall state {:?} -> {:?} at {}ms", self.state, next, now);
        self.state = next;
        self.state_entered_ms = Some(now);
    }

    pub fn reset(&mut self) {
        self.state = FallState::Idle;
        self.state_entered_ms = None;
        self.free_fall_started_ms = None;
    }
}
