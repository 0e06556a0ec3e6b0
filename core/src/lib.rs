pub mod audio;
pub mod error;
pub mod format;
pub mod intensity;
pub mod service;
pub mod session;
pub mod timer;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use audio::{AudioEvent, CommandSpeech, SpeechEngine, TerminalBell, Tone, ToneSink};
pub use error::{AudioError, SessionError, TimerError};
pub use intensity::VisualState;
pub use service::{ServiceHandle, Services, TICK_PERIOD, TimerSnapshot, spawn_services};
pub use session::Session;
pub use timer::{Notification, TimerController, TimerSignal, TimerState};
