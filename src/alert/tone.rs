use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

pub const ALARM_STEPS: usize = 6;
pub const ALARM_STEP_MS: u64 = 400;
/// Full length of one alarm pattern.
pub const ALARM_DURATION_MS: u64 = ALARM_STEPS as u64 * ALARM_STEP_MS;

const HIGH_FREQ: f32 = 880.0;
const LOW_FREQ: f32 = 660.0;
/// Fade in/out per step to avoid clicks at the frequency switch.
const RAMP_MS: u64 = 10;

/// Attention-grabbing alarm: six steps alternating between two tones.
pub struct AlarmTone {
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
    step_samples: usize,
    ramp_samples: usize,
}

impl AlarmTone {
    pub fn new() -> Self {
        let sample_rate = 44100;
        let step_samples = (sample_rate as u64 * ALARM_STEP_MS / 1000) as usize;
        Self {
            sample_rate,
            num_sample: 0,
            total_samples: step_samples * ALARM_STEPS,
            step_samples,
            ramp_samples: (sample_rate as u64 * RAMP_MS / 1000) as usize,
        }
    }

    /// Frequency of the given step; even steps are high.
    pub fn step_frequency(step: usize) -> f32 {
        if step % 2 == 0 {
            HIGH_FREQ
        } else {
            LOW_FREQ
        }
    }

    fn envelope(&self, pos_in_step: usize) -> f32 {
        let from_end = self.step_samples - pos_in_step;
        let edge = pos_in_step.min(from_end);
        if edge >= self.ramp_samples || self.ramp_samples == 0 {
            1.0
        } else {
            edge as f32 / self.ramp_samples as f32
        }
    }
}

impl Default for AlarmTone {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for AlarmTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }

        let step = self.num_sample / self.step_samples;
        let pos_in_step = self.num_sample % self.step_samples;
        let t = self.num_sample as f32 / self.sample_rate as f32;
        let freq = Self::step_frequency(step);

        self.num_sample += 1;

        Some((2.0 * PI * freq * t).sin() * self.envelope(pos_in_step) * 0.5)
    }
}

impl Source for AlarmTone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(ALARM_DURATION_MS))
    }
}
