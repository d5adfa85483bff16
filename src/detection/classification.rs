use serde::{Deserialize, Serialize};

use crate::motion::FeatureVector;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MotionKind {
    Fall,
    ViolentMovement,
    AbnormalMotion,
    None,
}

impl Default for MotionKind {
    fn default() -> Self {
        MotionKind::None
    }
}

impl MotionKind {
    pub fn label(&self) -> &'static str {
        match self {
            MotionKind::Fall => "fall",
            MotionKind::ViolentMovement => "violent_movement",
            MotionKind::AbnormalMotion => "abnormal_motion",
            MotionKind::None => "none",
        }
    }
}

/// Outcome of one detection step. `kind` is `None` exactly when `confidence` is 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub kind: MotionKind,
    pub confidence: f64,
    pub timestamp_ms: u64,
    pub features: FeatureVector,
}

impl Classification {
    /// Builds a classification, collapsing non-positive confidence to `None`.
    pub fn new(kind: MotionKind, confidence: f64, features: FeatureVector) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if kind == MotionKind::None || confidence <= 0.0 {
            return Self::none(features);
        }
        Self {
            kind,
            confidence,
            timestamp_ms: features.timestamp_ms,
            features,
        }
    }

    pub fn none(features: FeatureVector) -> Self {
        Self {
            kind: MotionKind::None,
            confidence: 0.0,
            timestamp_ms: features.timestamp_ms,
            features,
        }
    }

    pub fn is_event(&self) -> bool {
        self.kind != MotionKind::None
    }
}
