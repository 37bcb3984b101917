//! Tick granularity and the pure matching rule.

use chrono::Timelike;

use versecast_core::config::{ScheduleConfig, ScheduleKind};
use versecast_core::types::{DeliveryChannel, Preference, TimeOfDay};

/// When the runner fires and how a tick picks recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleMode {
    /// Fire every minute; deliver to preferences whose time equals now.
    #[default]
    EveryMinute,
    /// Fire once a day at `hour:00`; deliver to every push subscriber.
    Daily { hour: u8 },
}

impl From<&ScheduleConfig> for ScheduleMode {
    fn from(config: &ScheduleConfig) -> Self {
        match config.mode {
            ScheduleKind::EveryMinute => ScheduleMode::EveryMinute,
            ScheduleKind::Daily => ScheduleMode::Daily { hour: config.daily_hour },
        }
    }
}

impl ScheduleMode {
    /// Whether a tick at `now` should run at all.
    pub fn should_fire(&self, now: &impl Timelike) -> bool {
        match self {
            ScheduleMode::EveryMinute => true,
            ScheduleMode::Daily { hour } => now.hour() == u32::from(*hour) && now.minute() == 0,
        }
    }
}

/// Preferences due at `now`. Only the push channel is dispatched.
pub fn due_preferences<'a>(
    mode: ScheduleMode,
    now: &impl Timelike,
    preferences: &'a [Preference],
) -> Vec<&'a Preference> {
    let current = TimeOfDay::of(now);
    preferences
        .iter()
        .filter(|p| p.channel == DeliveryChannel::PushNotification)
        .filter(|p| match mode {
            ScheduleMode::EveryMinute => p.time_of_day == current,
            ScheduleMode::Daily { .. } => true,
        })
        .collect()
}
