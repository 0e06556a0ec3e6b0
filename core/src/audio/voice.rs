//! Speech through the platform's native voice
//!
//! Native voices are blocking and not necessarily `Send`, so the voice is
//! opened on and owned by a dedicated thread. `SystemSpeech` hands it requests
//! over a channel; an utterance counts as finished once the voice stops
//! reporting `is_speaking`.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use tokio::sync::oneshot;

use super::speech::SpeechEngine;
use crate::error::AudioError;

/// How often the voice thread checks whether an utterance has ended
const POLL_INTERVAL: Duration = Duration::from_millis(25);

type Done = oneshot::Sender<Result<(), AudioError>>;

/// A blocking, thread-bound voice
pub trait Voice {
    /// Begin speaking `text` without waiting for it to finish
    fn start(&mut self, text: &str) -> Result<(), AudioError>;

    fn is_speaking(&self) -> bool;

    fn stop(&mut self);
}

enum VoiceRequest {
    Speak { text: String, done: Done },
    Stop,
}

/// `SpeechEngine` backed by a `Voice` running on its own thread
#[derive(Debug)]
pub struct SystemSpeech {
    requests: mpsc::Sender<VoiceRequest>,
}

impl SystemSpeech {
    /// Start the voice thread. `open` runs on that thread; if it fails, every
    /// utterance fails with the same reason.
    pub fn spawn<V, F>(open: F) -> Self
    where
        V: Voice,
        F: FnOnce() -> Result<V, AudioError> + Send + 'static,
    {
        let (requests, rx) = mpsc::channel();
        if let Err(e) = std::thread::Builder::new()
            .name("speech".to_string())
            .spawn(move || run_voice(open, rx))
        {
            tracing::warn!(error = %e, "Failed to start speech thread");
        }
        Self { requests }
    }
}

#[cfg(not(target_os = "linux"))]
impl SystemSpeech {
    /// The OS text-to-speech engine
    pub fn native() -> Self {
        Self::spawn(NativeVoice::open)
    }
}

impl SpeechEngine for SystemSpeech {
    async fn speak(&mut self, text: &str) -> Result<(), AudioError> {
        let (done, finished) = oneshot::channel();
        self.requests
            .send(VoiceRequest::Speak {
                text: text.to_string(),
                done,
            })
            .map_err(|_| thread_gone())?;
        finished.await.map_err(|_| thread_gone())?
    }

    fn cancel(&mut self) {
        let _ = self.requests.send(VoiceRequest::Stop);
    }
}

fn thread_gone() -> AudioError {
    AudioError::Unavailable("speech thread stopped".to_string())
}

fn run_voice<V, F>(open: F, requests: Receiver<VoiceRequest>)
where
    V: Voice,
    F: FnOnce() -> Result<V, AudioError>,
{
    let mut voice = match open() {
        Ok(voice) => voice,
        Err(e) => {
            tracing::warn!(error = %e, "Speech unavailable");
            let reason = e.to_string();
            for request in requests {
                if let VoiceRequest::Speak { done, .. } = request {
                    let _ = done.send(Err(AudioError::Unavailable(reason.clone())));
                }
            }
            return;
        }
    };

    let mut in_flight: Option<Done> = None;
    loop {
        let request = if in_flight.is_some() {
            match requests.recv_timeout(POLL_INTERVAL) {
                Ok(request) => Some(request),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match requests.recv() {
                Ok(request) => Some(request),
                Err(_) => break,
            }
        };

        match request {
            Some(VoiceRequest::Speak { text, done }) => {
                finish(&mut in_flight);
                match voice.start(&text) {
                    Ok(()) => in_flight = Some(done),
                    Err(e) => {
                        let _ = done.send(Err(e));
                    }
                }
            }
            Some(VoiceRequest::Stop) => {
                if in_flight.is_some() {
                    voice.stop();
                    finish(&mut in_flight);
                }
            }
            None => {
                if !voice.is_speaking() {
                    finish(&mut in_flight);
                }
            }
        }
    }

    voice.stop();
}

fn finish(in_flight: &mut Option<Done>) {
    if let Some(done) = in_flight.take() {
        let _ = done.send(Ok(()));
    }
}

#[cfg(not(target_os = "linux"))]
struct NativeVoice(tts::Tts);

#[cfg(not(target_os = "linux"))]
impl NativeVoice {
    fn open() -> Result<Self, AudioError> {
        let mut tts = tts::Tts::default().map_err(|e| AudioError::Voice(e.to_string()))?;
        let _ = tts.set_rate(tts.normal_rate());
        Ok(Self(tts))
    }
}

#[cfg(not(target_os = "linux"))]
impl Voice for NativeVoice {
    fn start(&mut self, text: &str) -> Result<(), AudioError> {
        self.0
            .speak(text, false)
            .map(|_| ())
            .map_err(|e| AudioError::Voice(e.to_string()))
    }

    fn is_speaking(&self) -> bool {
        // Backends without the query report done right away; the queue's
        // start-to-start gap still spaces utterances.
        self.0.is_speaking().unwrap_or(false)
    }

    fn stop(&mut self) {
        let _ = self.0.stop();
    }
}
