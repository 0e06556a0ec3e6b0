//! Tone output
//!
//! Tones are fire-and-forget: `play` returns as soon as playback has been
//! handed off, and nothing (pause, reset, cancel) interrupts a tone already
//! playing.

use std::io::Write;
use std::time::Duration;

use countdown_types::ToneSpec;

use crate::error::AudioError;

/// Longest tone a config can ask for
pub const MAX_TONE_SECS: f32 = 10.0;

/// A sine tone ready to be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Output amplitude in [0.0, 1.0]
    pub gain: f32,
}

impl Tone {
    pub fn from_spec(spec: ToneSpec, gain: f32) -> Self {
        Self {
            frequency_hz: spec.frequency_hz,
            duration: Duration::try_from_secs_f32(spec.duration_secs.clamp(0.0, MAX_TONE_SECS))
                .unwrap_or(Duration::ZERO),
            gain: gain.clamp(0.0, 1.0),
        }
    }
}

/// Platform tone generator
pub trait ToneSink: Send + 'static {
    /// Start playing `tone` without waiting for it to finish
    fn play(&mut self, tone: Tone) -> Result<(), AudioError>;
}

/// Rings the terminal bell. Pitch and length are not controllable.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl ToneSink for TerminalBell {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
        tracing::trace!(frequency_hz = tone.frequency_hz, "Bell");
        // stdout belongs to the prompt
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07").map_err(AudioError::Terminal)?;
        stderr.flush().map_err(AudioError::Terminal)
    }
}

/// Synthesized sine tones on the default output device
#[cfg(feature = "rodio")]
#[derive(Debug, Default)]
pub struct SineTone;

#[cfg(feature = "rodio")]
impl ToneSink for SineTone {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
        std::thread::Builder::new()
            .name("tone".to_string())
            .spawn(move || {
                use rodio::source::{SineWave, Source};
                use rodio::{OutputStream, Sink};

                let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
                    tracing::warn!("No audio output device for tone");
                    return;
                };
                let Ok(sink) = Sink::try_new(&stream_handle) else {
                    return;
                };

                let source = SineWave::new(tone.frequency_hz)
                    .take_duration(tone.duration)
                    .amplify(tone.gain);
                sink.append(source);
                sink.sleep_until_end();
            })
            .map(|_| ())
            .map_err(|e| AudioError::Unavailable(e.to_string()))
    }
}
