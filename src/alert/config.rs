use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertConfig {
    pub enabled: bool,
    /// Minimum classification confidence that raises an alert, in [0, 1].
    pub confidence_threshold: f64,
    /// Minimum time between two alerts, in sample-clock milliseconds.
    pub cooldown_period_ms: u64,
    pub sound_enabled: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confidence_threshold: 0.75,
            cooldown_period_ms: 5000,
            sound_enabled: true,
        }
    }
}

/// Partial alert configuration; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertConfigUpdate {
    pub enabled: Option<bool>,
    pub confidence_threshold: Option<f64>,
    pub cooldown_period_ms: Option<u64>,
    pub sound_enabled: Option<bool>,
}

impl AlertConfig {
    pub fn merge(&mut self, update: &AlertConfigUpdate) {
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(threshold) = update.confidence_threshold {
            if threshold.is_finite() {
                self.confidence_threshold = threshold.clamp(0.0, 1.0);
            }
        }
        if let Some(cooldown) = update.cooldown_period_ms {
            self.cooldown_period_ms = cooldown;
        }
        if let Some(sound) = update.sound_enabled {
            self.sound_enabled = sound;
        }
    }
}
