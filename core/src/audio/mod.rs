//! Audio subsystem for countdown notifications
//!
//! Provides tones and queued, throttled speech for warning checkpoints and
//! expiry. The platform facilities sit behind `ToneSink` and `SpeechEngine`.
//! Speech uses the native voice where one exists and `espeak` on Linux.

mod events;
mod queue;
mod service;
mod speech;
mod tone;
mod voice;


pub use events::AudioEvent;
pub use queue::{
    DrainStep, MIN_SPEECH_GAP, SpeechDispatcher, SpeechQueue, SpeechSender,
    create_speech_channel,
};
pub use service::{AudioSender, AudioService, create_audio_channel};
pub use speech::{CommandSpeech, SpeechEngine};
#[cfg(feature = "rodio")]
pub use tone::SineTone;
pub use tone::{MAX_TONE_SECS, TerminalBell, Tone, ToneSink};
pub use voice::{SystemSpeech, Voice};
