//! Audio notification service
//!
//! Runs in a background task, receiving AudioEvents via channel. Tones are
//! played immediately; phrases are forwarded to the speech dispatcher so they
//! queue behind each other instead of talking over one another.

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use countdown_types::{AudioSettings, ToneSpec};

use super::events::AudioEvent;
use super::queue::SpeechSender;
use super::tone::{Tone, ToneSink};
use crate::format::speech_text;
use crate::timer::ALARM_PHRASE;

/// Audio service that routes notifications to tone and speech output
pub struct AudioService<T: ToneSink> {
    /// Channel to receive audio events
    event_rx: mpsc::Receiver<AudioEvent>,

    /// Shared audio settings (can be updated at runtime)
    settings: Arc<RwLock<AudioSettings>>,

    tones: T,

    /// Phrases for the speech dispatcher
    speech_tx: SpeechSender,
}

impl<T: ToneSink> AudioService<T> {
    pub fn new(
        event_rx: mpsc::Receiver<AudioEvent>,
        settings: Arc<RwLock<AudioSettings>>,
        tones: T,
        speech_tx: SpeechSender,
    ) -> Self {
        Self {
            event_rx,
            settings,
            tones,
            speech_tx,
        }
    }

    /// Run the audio service until the event channel closes
    pub async fn run(mut self) {
        let (test_tone, enabled, gain) = {
            let settings = self.settings.read().await;
            (settings.test_tone_on_start, settings.enabled, settings.gain())
        };
        if test_tone && enabled {
            self.play(ToneSpec::test(), gain);
        }

        while let Some(event) = self.event_rx.recv().await {
            // Read settings and extract what we need, then drop the guard
            let settings = self.settings.read().await.clone();

            // Master audio toggle
            if !settings.enabled {
                tracing::debug!(?event, "Audio disabled, dropping event");
                continue;
            }

            let (tone, phrase) = match event {
                AudioEvent::Warning { remaining_secs } => {
                    (settings.warning_tone, speech_text(remaining_secs))
                }
                AudioEvent::Alarm => (settings.alarm_tone, ALARM_PHRASE.to_string()),
            };

            if settings.tones_enabled {
                self.play(tone, settings.gain());
            }
            if settings.speech_enabled {
                self.speak(phrase);
            }
        }
    }

    fn play(&mut self, spec: ToneSpec, gain: f32) {
        if let Err(e) = self.tones.play(Tone::from_spec(spec, gain)) {
            tracing::warn!(error = %e, frequency_hz = spec.frequency_hz, "Tone playback failed");
        }
    }

    fn speak(&self, phrase: String) {
        if self.speech_tx.send(phrase).is_err() {
            tracing::warn!("Speech dispatcher stopped, dropping phrase");
        }
    }
}

/// Sender handle for sending audio events
pub type AudioSender = mpsc::Sender<AudioEvent>;

/// Create a new audio channel
pub fn create_audio_channel() -> (AudioSender, mpsc::Receiver<AudioEvent>) {
    // Buffer size of 64 should be plenty for audio events
    mpsc::channel(64)
}
