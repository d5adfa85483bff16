pub mod config;
pub mod player;
pub mod tone;
pub mod trigger;

pub use config::{AlertConfig, AlertConfigUpdate};
pub use player::{AlarmPlayer, AlertSoundHandle};
pub use tone::{AlarmTone, ALARM_DURATION_MS};
pub use trigger::{AlertEvent, AlertTrigger, AlertTriggerState};
