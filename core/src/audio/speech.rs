//! Text-to-speech engines

use std::future::Future;
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::error::AudioError;

/// Platform speech facility
pub trait SpeechEngine: Send + 'static {
    /// Speak `text`, resolving when the utterance completes or fails
    fn speak(&mut self, text: &str) -> impl Future<Output = Result<(), AudioError>> + Send;

    /// Stop any utterance still in flight
    fn cancel(&mut self);
}

/// Speaks by running an external program (normally `espeak`) with the phrase
/// as its argument. Used on Linux, where there is no native voice API.
#[derive(Debug)]
pub struct CommandSpeech {
    command: String,
    in_flight: Option<Child>,
}

impl CommandSpeech {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            in_flight: None,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl SpeechEngine for CommandSpeech {
    async fn speak(&mut self, text: &str) -> Result<(), AudioError> {
        let child = Command::new(&self.command)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AudioError::SpawnSpeech {
                command: self.command.clone(),
                source,
            })?;

        let status = self.in_flight.insert(child).wait().await;
        self.in_flight = None;

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(AudioError::SpeechFailed {
                command: self.command.clone(),
                status: status.to_string(),
            }),
            Err(source) => Err(AudioError::SpawnSpeech {
                command: self.command.clone(),
                source,
            }),
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.in_flight.take() {
            let _ = child.start_kill();
        }
    }
}
