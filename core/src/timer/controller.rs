//! Countdown state machine
//!
//! The controller owns the session and run state and reacts to user
//! transitions plus the once-per-second tick. It performs no I/O: every
//! transition returns the `TimerSignal`s the caller should act on.

use super::signal::{Notification, TimerSignal};
use super::state::{RunState, TimerState};
use crate::error::TimerError;
use crate::format::display_text;
use crate::intensity::VisualState;
use crate::session::Session;

#[derive(Debug, Default)]
pub struct TimerController {
    state: TimerState,
    /// Last-used session; survives cancel so reset can replay it
    session: Option<Session>,
    run: RunState,
}

impl TimerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn remaining_secs(&self) -> u32 {
        self.run.remaining_secs
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The tick source should exist exactly while this is true
    pub fn is_ticking(&self) -> bool {
        self.state == TimerState::Running && self.session.is_some() && self.run.remaining_secs > 0
    }

    /// Offsets already announced this run, ascending
    pub fn fired_warnings(&self) -> Vec<u32> {
        let mut fired: Vec<u32> = self.run.fired_warnings.iter().copied().collect();
        fired.sort_unstable();
        fired
    }

    pub fn display_text(&self) -> String {
        display_text(self.run.remaining_secs)
    }

    pub fn visual_state(&self) -> VisualState {
        match self.state {
            TimerState::Idle => VisualState::BASELINE,
            TimerState::Expired => VisualState::EXPIRED,
            TimerState::Running | TimerState::Paused => {
                VisualState::for_remaining(self.run.remaining_secs)
            }
        }
    }

    /// Begin a new run. Only allowed from Idle or Expired.
    pub fn start(&mut self, session: Session) -> Result<Vec<TimerSignal>, TimerError> {
        if self.state.is_active() {
            return Err(TimerError::AlreadyActive);
        }

        tracing::info!(
            duration_secs = session.initial_duration_secs(),
            warnings = ?session.warning_offsets(),
            "Starting countdown"
        );
        self.session = Some(session);
        Ok(self.begin_run())
    }

    pub fn pause(&mut self) -> Result<Vec<TimerSignal>, TimerError> {
        if self.state != TimerState::Running {
            return Err(TimerError::NotRunning);
        }
        tracing::debug!(remaining = self.run.remaining_secs, "Paused");
        Ok(self.transition(TimerState::Paused))
    }

    pub fn resume(&mut self) -> Result<Vec<TimerSignal>, TimerError> {
        if self.state != TimerState::Paused {
            return Err(TimerError::NotPaused);
        }
        tracing::debug!(remaining = self.run.remaining_secs, "Resumed");
        Ok(self.transition(TimerState::Running))
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) -> Result<Vec<TimerSignal>, TimerError> {
        match self.state {
            TimerState::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Restart the last-used session from its full duration, from any state
    pub fn reset(&mut self) -> Result<Vec<TimerSignal>, TimerError> {
        if self.session.is_none() {
            return Err(TimerError::NoSession);
        }
        tracing::debug!("Reset");
        Ok(self.begin_run())
    }

    /// Back to setup. The session is kept for a later reset.
    pub fn cancel(&mut self) -> Vec<TimerSignal> {
        if self.state == TimerState::Idle {
            return Vec::new();
        }
        tracing::debug!(remaining = self.run.remaining_secs, "Cancelled");
        self.transition(TimerState::Idle)
    }

    /// Advance the countdown by one second. No-op unless running.
    pub fn tick(&mut self) -> Vec<TimerSignal> {
        if self.state != TimerState::Running {
            return Vec::new();
        }
        let Some(session) = &self.session else {
            return Vec::new();
        };

        self.run.remaining_secs = self.run.remaining_secs.saturating_sub(1);
        let remaining = self.run.remaining_secs;

        let mut signals = vec![
            TimerSignal::DisplayUpdated(display_text(remaining)),
            TimerSignal::IntensityChanged(VisualState::for_remaining(remaining)),
        ];

        // Warnings are checked before expiry; offsets are never 0
        if session.has_warning_at(remaining) && self.run.fired_warnings.insert(remaining) {
            tracing::info!(remaining, "Warning checkpoint reached");
            signals.push(TimerSignal::Notified(Notification::Warning {
                remaining_secs: remaining,
            }));
        }

        if remaining == 0 {
            tracing::info!("Countdown expired");
            signals.push(TimerSignal::Notified(Notification::Alarm));
            signals.extend(self.transition(TimerState::Expired));
        }

        signals
    }

    fn begin_run(&mut self) -> Vec<TimerSignal> {
        let duration = self
            .session
            .as_ref()
            .map(Session::initial_duration_secs)
            .unwrap_or_default();
        self.run.restart(duration);

        let mut signals = self.transition(TimerState::Running);
        signals.push(TimerSignal::DisplayUpdated(display_text(duration)));
        signals.push(TimerSignal::IntensityChanged(VisualState::for_remaining(
            duration,
        )));
        signals
    }

    fn transition(&mut self, next: TimerState) -> Vec<TimerSignal> {
        self.state = next;
        vec![TimerSignal::StateChanged(next)]
    }
}
