use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::config::{AlertConfig, AlertConfigUpdate};
use super::player::AlarmPlayer;
use super::tone::ALARM_DURATION_MS;
use crate::detection::{Classification, MotionKind};
use crate::motion::FeatureVector;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Payload handed to whoever records or displays alerts.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub id: Uuid,
    pub kind: MotionKind,
    pub confidence: f64,
    /// Sample-clock time of the classification that raised the alert.
    pub timestamp_ms: u64,
    pub raised_at: DateTime<Utc>,
    pub features: FeatureVector,
    pub sound_played: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTriggerState {
    pub last_alert_ms: Option<u64>,
    pub is_alerting: bool,
    pub alert_count: u64,
}

/// Turns classifications into alerts: enable flag, confidence threshold and
/// cooldown decide (`should_alert`), `trigger` acts.
pub struct AlertTrigger {
    config: AlertConfig,
    state: AlertTriggerState,
    player: Option<Arc<dyn AlarmPlayer>>,
}

impl AlertTrigger {
    pub fn new(config: AlertConfig, player: Option<Arc<dyn AlarmPlayer>>) -> Self {
        Self {
            config,
            state: AlertTriggerState::default(),
            player,
        }
    }

    /// Trigger with no audio backend; alerts are only logged and returned.
    pub fn silent(config: AlertConfig) -> Self {
        Self::new(config, None)
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    pub fn state(&self) -> AlertTriggerState {
        self.state
    }

    pub fn is_alerting(&self) -> bool {
        self.state.is_alerting
    }

    pub fn should_alert(&self, classification: &Classification) -> bool {
        if !self.config.enabled || classification.kind == MotionKind::None {
            return false;
        }
        if classification.confidence < self.config.confidence_threshold {
            return false;
        }
        match self.state.last_alert_ms {
            Some(last) => {
                classification.timestamp_ms.saturating_sub(last) >= self.config.cooldown_period_ms
            }
            None => true,
        }
    }

    /// Raise an alert for `classification`. Does nothing and returns `None`
    /// while a previous alert is still sounding.
    pub fn trigger(&mut self, classification: &Classification) -> Option<AlertEvent> {
        self.expire(classification.timestamp_ms);
        if self.state.is_alerting {
            return None;
        }

        self.state.is_alerting = true;
        self.state.last_alert_ms = Some(classification.timestamp_ms);
        self.state.alert_count += 1;

        let mut sound_played = false;
        if self.config.sound_enabled {
            if let Some(player) = &self.player {
                match player.play_alarm() {
                    Ok(()) => sound_played = true,
                    Err(err) => {
                        log_error!("alarm playback via {} failed: {}", player.name(), err);
                        // Nothing is sounding; the cooldown still applies.
                        self.state.is_alerting = false;
                    }
                }
            }
        }

        let event = AlertEvent {
            id: Uuid::new_v4(),
            kind: classification.kind,
            confidence: classification.confidence,
            timestamp_ms: classification.timestamp_ms,
            raised_at: Utc::now(),
            features: classification.features,
            sound_played,
        };

        match serde_json::to_string(&event) {
            Ok(json) => log_warn!("motion alert: {}", json),
            Err(_) => log_warn!("motion alert: {:?}", event),
        }

        Some(event)
    }

    /// `should_alert` followed by `trigger`.
    pub fn evaluate(&mut self, classification: &Classification) -> Option<AlertEvent> {
        if self.should_alert(classification) {
            self.trigger(classification)
        } else {
            None
        }
    }

    pub fn stop_alert(&mut self) {
        if let Some(player) = &self.player {
            if let Err(err) = player.stop() {
                log_error!("failed to stop alarm via {}: {}", player.name(), err);
            }
        }
        self.state.is_alerting = false;
    }

    pub fn update_config(&mut self, update: &AlertConfigUpdate) {
        self.config.merge(update);
        log_info!("alert config updated: {:?}", self.config);
    }

    /// Fire a maximal-confidence fall alert at `now_ms` regardless of the enable flag.
    pub fn test_alert(&mut self, now_ms: u64) -> Option<AlertEvent> {
        let was_enabled = self.config.enabled;
        self.config.enabled = true;

        let features = FeatureVector {
            timestamp_ms: now_ms,
            ..FeatureVector::default()
        };
        let event = self.trigger(&Classification::new(MotionKind::Fall, 1.0, features));

        self.config.enabled = was_enabled;
        event
    }

    /// Forget cooldown and alerting state for a new monitoring session.
    pub fn reset(&mut self) {
        self.stop_alert();
        self.state = AlertTriggerState::default();
    }

    /// The alarm pattern has a fixed length; once it has run its course on the
    /// sample clock the trigger is free again.
    fn expire(&mut self, now_ms: u64) {
        if let (true, Some(last)) = (self.state.is_alerting, self.state.last_alert_ms) {
            if now_ms.saturating_sub(last) >= ALARM_DURATION_MS {
                self.state.is_alerting = false;
            }
        }
    }
}
