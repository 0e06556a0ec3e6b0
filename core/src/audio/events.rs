//! Audio event types for timer system integration

use crate::timer::Notification;

/// Events that can trigger audio playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// Warning checkpoint: warning tone + spoken remaining time
    /// e.g., "10 seconds", "1 minutes and 30 seconds"
    Warning { remaining_secs: u32 },

    /// Countdown expired: alarm tone + "Time's up!"
    Alarm,
}

impl From<Notification> for AudioEvent {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::Warning { remaining_secs } => AudioEvent::Warning { remaining_secs },
            Notification::Alarm => AudioEvent::Alarm,
        }
    }
}
