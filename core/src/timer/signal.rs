use serde::Serialize;

use super::TimerState;
use crate::format::speech_text;
use crate::intensity::VisualState;

/// Phrase spoken when the countdown expires
pub const ALARM_PHRASE: &str = "Time's up!";

/// A checkpoint the user asked to be told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Notification {
    /// Remaining time crossed a warning offset
    Warning { remaining_secs: u32 },
    /// Remaining time reached zero
    Alarm,
}

impl Notification {
    /// What gets spoken for this notification
    pub fn phrase(&self) -> String {
        match self {
            Notification::Warning { remaining_secs } => speech_text(*remaining_secs),
            Notification::Alarm => ALARM_PHRASE.to_string(),
        }
    }
}

/// Observable effects emitted by the controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TimerSignal {
    StateChanged(TimerState),
    /// Clock face text ("MM:SS")
    DisplayUpdated(String),
    IntensityChanged(VisualState),
    /// Tone + speech should be produced
    Notified(Notification),
}

impl TimerSignal {
    /// Display and intensity updates; each one replaces the last
    pub fn is_frame(&self) -> bool {
        matches!(
            self,
            TimerSignal::DisplayUpdated(_) | TimerSignal::IntensityChanged(_)
        )
    }
}
