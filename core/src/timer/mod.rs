//! Timer system
//!
//! This module provides:
//! - **State**: lifecycle states and the per-run countdown state
//! - **Signals**: the effects a transition asks the outside world to perform
//! - **Controller**: the state machine driven by user transitions and ticks

mod controller;
mod signal;
mod state;


pub use controller::TimerController;
pub use signal::{ALARM_PHRASE, Notification, TimerSignal};
pub use state::TimerState;
