use serde::{Deserialize, Serialize};

/// Three-axis reading in m/s². Axes the platform did not report deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn sub(&self, other: &Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, factor: f64) -> Vector3 {
        Vector3::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// Device rotation rate around the z (alpha), x (beta) and y (gamma) axes, in deg/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationRate {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl RotationRate {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    pub fn magnitude(&self) -> f64 {
        (self.alpha * self.alpha + self.beta * self.beta + self.gamma * self.gamma).sqrt()
    }
}

/// One reading from the sensor collaborator.
///
/// `linear_acceleration` is gravity-free acceleration as reported by the
/// platform; an all-zero value means the platform had none and the extractor
/// derives it from `gravity_acceleration` (the raw, gravity-inclusive reading).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,
    #[serde(default)]
    pub linear_acceleration: Vector3,
    #[serde(default)]
    pub gravity_acceleration: Vector3,
    #[serde(default)]
    pub rotation_rate: RotationRate,
}

impl Sample {
    pub fn new(
        timestamp_ms: u64,
        linear_acceleration: Vector3,
        gravity_acceleration: Vector3,
        rotation_rate: RotationRate,
    ) -> Self {
        Self {
            timestamp_ms,
            linear_acceleration,
            gravity_acceleration,
            rotation_rate,
        }
    }

    /// Sample from a device that only reports raw (gravity-inclusive) acceleration.
    pub fn raw(timestamp_ms: u64, gravity_acceleration: Vector3, rotation_rate: RotationRate) -> Self {
        Self::new(timestamp_ms, Vector3::ZERO, gravity_acceleration, rotation_rate)
    }
}

/// Scalar features of the current sample window. All values are non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Timestamp of the newest sample in the window.
    pub timestamp_ms: u64,
    /// Linear acceleration norm of the newest sample (m/s²).
    pub magnitude: f64,
    /// Largest rate of change of linear acceleration over the jerk sub-window (m/s³).
    pub jerk: f64,
    /// Population variance of per-sample magnitudes over the whole window.
    pub variance: f64,
    pub peak_acceleration: f64,
    pub average_acceleration: f64,
    /// Largest rotation-rate norm over the rotation sub-window (deg/s).
    pub rotation_magnitude: f64,
}
