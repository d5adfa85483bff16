use super::types::Vector3;

/// Exponential low-pass estimate of the gravity vector.
///
/// `g_n = α·g_{n-1} + (1-α)·raw_n`. Seeded with the first reading so the
/// first derived linear acceleration is zero instead of a spurious spike.
#[derive(Debug, Clone)]
pub struct GravityFilter {
    alpha: f64,
    gravity: Option<Vector3>,
}

impl GravityFilter {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            gravity: None,
        }
    }

    /// Feed one gravity-inclusive reading and return the updated estimate.
    pub fn update(&mut self, raw: Vector3) -> Vector3 {
        let next = match self.gravity {
            None => raw,
            Some(previous) => {
                let a = self.alpha;
                Vector3::new(
                    a * previous.x + (1.0 - a) * raw.x,
                    a * previous.y + (1.0 - a) * raw.y,
                    a * previous.z + (1.0 - a) * raw.z,
                )
            }
        };
        self.gravity = Some(next);
        next
    }

    /// Update with `raw` and return `raw - gravity`.
    pub fn linear(&mut self, raw: Vector3) -> Vector3 {
        let gravity = self.update(raw);
        raw.sub(&gravity)
    }

    pub fn gravity(&self) -> Option<Vector3> {
        self.gravity
    }

    pub fn reset(&mut self) {
        self.gravity = None;
    }
}
