//! Synthetic motion traces.
//!
//! Deterministic for a given seed, so tests and threshold tuning can replay
//! the same activity. Amplitudes are loosely modelled on a phone carried in
//! a hand or pocket at 50 Hz.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::motion::{RotationRate, Sample, Vector3};

const GRAVITY: Vector3 = Vector3 {
    x: 0.0,
    y: 0.0,
    z: 9.81,
};

pub struct TraceBuilder {
    rng: StdRng,
    interval_ms: u64,
    next_ms: u64,
    raw_only: bool,
    samples: Vec<Sample>,
}

impl TraceBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            interval_ms: 20,
            next_ms: 0,
            raw_only: false,
            samples: Vec::new(),
        }
    }

    pub fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    pub fn start_at(mut self, timestamp_ms: u64) -> Self {
        self.next_ms = timestamp_ms;
        self
    }

    /// Emit only gravity-inclusive readings, leaving gravity removal to the extractor.
    pub fn raw_only(mut self, raw_only: bool) -> Self {
        self.raw_only = raw_only;
        self
    }

    pub fn standing(mut self, duration_ms: u64) -> Self {
        for _ in 0..self.steps(duration_ms) {
            let linear = Vector3::new(self.noise(0.05), self.noise(0.05), 0.1 + self.noise(0.05));
            let rotation = RotationRate::new(self.noise(2.0), self.noise(2.0), self.noise(2.0));
            self.push(linear, rotation);
        }
        self
    }

    pub fn walking(self, duration_ms: u64) -> Self {
        self.periodic(duration_ms, 4.0, 1.5, 2.0, 0.3, 60.0)
    }

    pub fn running(self, duration_ms: u64) -> Self {
        self.periodic(duration_ms, 10.0, 6.0, 3.0, 0.2, 180.0)
    }

    /// Picking the phone up and turning it over: gentle acceleration, fast rotation.
    pub fn handling(mut self, duration_ms: u64) -> Self {
        let start = self.next_ms;
        for _ in 0..self.steps(duration_ms) {
            let t = (self.next_ms - start) as f64 / 1000.0;
            let m = 3.0 + 2.0 * (2.0 * PI * 1.5 * t).sin();
            let linear = Vector3::new(m, self.noise(0.2), self.noise(0.2));
            let rotation = RotationRate::new(320.0 + self.noise(40.0), self.noise(20.0), self.noise(20.0));
            self.push(linear, rotation);
        }
        self
    }

    /// Weightless phase, a hard impact, then lying still.
    pub fn fall(mut self) -> Self {
        for _ in 0..self.steps(400) {
            let linear = Vector3::new(self.noise(0.1), self.noise(0.1), 0.2);
            let rotation = RotationRate::new(self.noise(30.0), self.noise(30.0), self.noise(30.0));
            self.push(linear, rotation);
        }

        let impact = Vector3::new(5.0 + self.noise(1.0), 3.0 + self.noise(1.0), 60.0);
        self.push(impact, RotationRate::new(250.0, 80.0, 40.0));

        self.standing(1500)
    }

    /// Hard random shaking in every direction.
    pub fn shaking(mut self, duration_ms: u64) -> Self {
        for _ in 0..self.steps(duration_ms) {
            let magnitude = self.rng.gen_range(10.0..60.0);
            let direction = self.unit_vector();
            let rotation = RotationRate::new(
                self.rng.gen_range(300.0..500.0),
                self.rng.gen_range(200.0..400.0),
                self.noise(100.0),
            );
            self.push(direction.scale(magnitude), rotation);
        }
        self
    }

    pub fn build(self) -> Vec<Sample> {
        self.samples
    }

    fn periodic(
        mut self,
        duration_ms: u64,
        base: f64,
        amplitude: f64,
        cadence_hz: f64,
        noise: f64,
        rotation: f64,
    ) -> Self {
        let start = self.next_ms;
        for _ in 0..self.steps(duration_ms) {
            let t = (self.next_ms - start) as f64 / 1000.0;
            let m = base + amplitude * (2.0 * PI * cadence_hz * t).sin();
            let linear = Vector3::new(self.noise(noise), self.noise(noise), m + self.noise(noise));
            let rate = RotationRate::new(
                rotation * (2.0 * PI * cadence_hz * t).cos(),
                self.noise(rotation / 4.0),
                self.noise(rotation / 4.0),
            );
            self.push(linear, rate);
        }
        self
    }

    fn push(&mut self, linear: Vector3, rotation: RotationRate) {
        let raw = Vector3::new(linear.x + GRAVITY.x, linear.y + GRAVITY.y, linear.z + GRAVITY.z);
        let sample = if self.raw_only {
            Sample::raw(self.next_ms, raw, rotation)
        } else {
            Sample::new(self.next_ms, linear, raw, rotation)
        };
        self.samples.push(sample);
        self.next_ms += self.interval_ms;
    }

    fn steps(&self, duration_ms: u64) -> u64 {
        duration_ms / self.interval_ms
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-amplitude..amplitude)
    }

    fn unit_vector(&mut self) -> Vector3 {
        loop {
            let v = Vector3::new(self.noise(1.0), self.noise(1.0), self.noise(1.0));
            let m = v.magnitude();
            if m > 0.1 {
                return v.scale(1.0 / m);
            }
        }
    }
}
