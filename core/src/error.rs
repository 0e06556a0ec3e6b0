//! Error types for timer operations

use thiserror::Error;

/// Rejected start requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("please enter a valid time between 1 and 60 minutes (got {0})")]
    InvalidDuration(i64),

    #[error("please enter a valid time between 1 and 60 minutes (got {0:?})")]
    UnparsableDuration(String),
}

/// Invalid state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("a countdown is already active; cancel it first")]
    AlreadyActive,

    #[error("timer not running")]
    NotRunning,

    #[error("timer not paused")]
    NotPaused,

    #[error("no countdown has been started yet")]
    NoSession,

    #[error("timer service has shut down")]
    ServiceClosed,
}

/// Failures from the tone or speech collaborators. Never fatal to the countdown.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("failed to launch speech command {command}")]
    SpawnSpeech {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("speech command {command} exited with {status}")]
    SpeechFailed { command: String, status: String },

    #[error("speech engine error: {0}")]
    Voice(String),

    #[error("failed to write to terminal")]
    Terminal(#[source] std::io::Error),
}
