//! Recording fakes for the audio collaborators

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::audio::{SpeechEngine, Tone, ToneSink};
use crate::error::AudioError;

#[derive(Debug, Clone, Default)]
pub struct RecordingTones {
    pub played: Arc<Mutex<Vec<Tone>>>,
}

impl RecordingTones {
    pub fn frequencies(&self) -> Vec<f32> {
        self.played
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.frequency_hz)
            .collect()
    }
}

impl ToneSink for RecordingTones {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
        self.played.lock().unwrap().push(tone);
        Ok(())
    }
}

/// Tone sink whose device is always missing
#[derive(Debug, Default)]
pub struct BrokenTones;

impl ToneSink for BrokenTones {
    fn play(&mut self, _tone: Tone) -> Result<(), AudioError> {
        Err(AudioError::Unavailable("no device".to_string()))
    }
}

/// Records each utterance with its start time. Each utterance takes
/// `utterance_len`; phrases listed in `fail_on` fail after that time.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeech {
    pub spoken: Arc<Mutex<Vec<(String, Instant)>>>,
    pub cancels: Arc<Mutex<u32>>,
    pub utterance_len: Duration,
    pub fail_on: Vec<String>,
}

impl RecordingSpeech {
    pub fn with_utterance_len(utterance_len: Duration) -> Self {
        Self {
            utterance_len,
            ..Self::default()
        }
    }

    pub fn phrases(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn start_times(&self) -> Vec<Instant> {
        self.spoken.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

impl SpeechEngine for RecordingSpeech {
    async fn speak(&mut self, text: &str) -> Result<(), AudioError> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), Instant::now()));
        tokio::time::sleep(self.utterance_len).await;
        if self.fail_on.iter().any(|f| f == text) {
            return Err(AudioError::SpeechFailed {
                command: "fake".to_string(),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    fn cancel(&mut self) {
        *self.cancels.lock().unwrap() += 1;
    }
}
