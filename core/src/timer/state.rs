//! Timer lifecycle states and per-run countdown state

use hashbrown::HashSet;
use serde::Serialize;

/// Where the countdown is in its lifecycle
///
/// ```text
/// Idle ──start──► Running ◄──resume── Paused
///                   │  └──pause───────►  │
///                   ▼ (remaining = 0)    │
///                Expired                 │
/// reset: any ──► Running    cancel: any ──► Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimerState {
    /// No active countdown (setup view)
    #[default]
    Idle,
    Running,
    Paused,
    /// Remaining time reached zero
    Expired,
}

impl TimerState {
    /// A countdown is on screen (running or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, TimerState::Running | TimerState::Paused)
    }

    /// Label for the single pause/resume control
    pub fn pause_label(&self) -> &'static str {
        match self {
            TimerState::Paused => "Resume",
            _ => "Pause",
        }
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Expired => "expired",
        };
        f.write_str(label)
    }
}

/// Mutable countdown state for the current run
#[derive(Debug, Clone, Default)]
pub(crate) struct RunState {
    pub remaining_secs: u32,
    /// Offsets already announced this run
    pub fired_warnings: HashSet<u32>,
}

impl RunState {
    /// Re-arm for a fresh run of `duration_secs`
    pub fn restart(&mut self, duration_secs: u32) {
        self.remaining_secs = duration_secs;
        self.fired_warnings.clear();
    }
}
