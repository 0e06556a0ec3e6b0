//! Speech queue with start-to-start throttling
//!
//! Phrases are spoken strictly in arrival order, one at a time, and two
//! utterances never start less than `min_gap` apart. The queue itself makes no
//! timing decisions beyond answering "what now?"; `SpeechDispatcher` owns the
//! clock and the engine.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::speech::SpeechEngine;

/// Utterance starts are never closer than this, whatever the config says
pub const MIN_SPEECH_GAP: Duration = Duration::from_millis(1000);

/// What the drain loop should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainStep {
    /// Queue empty; stop draining
    Idle,
    /// Throttled; check again after this long
    Wait(Duration),
    /// Hand this phrase to the engine now
    Speak(String),
}

#[derive(Debug)]
pub struct SpeechQueue {
    pending: VecDeque<String>,
    /// Start time of the most recent utterance
    last_spoken_at: Option<Instant>,
    /// A drain is in progress
    is_speaking: bool,
    min_gap: Duration,
}

impl SpeechQueue {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            last_spoken_at: None,
            is_speaking: false,
            min_gap: min_gap.max(MIN_SPEECH_GAP),
        }
    }

    /// Append a phrase. Returns true if no drain is in progress and the caller
    /// must start one.
    pub fn enqueue(&mut self, text: String) -> bool {
        self.pending.push_back(text);
        !self.is_speaking
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    /// One drain step at time `now`
    pub fn next_step(&mut self, now: Instant) -> DrainStep {
        if self.pending.is_empty() {
            self.is_speaking = false;
            return DrainStep::Idle;
        }
        self.is_speaking = true;

        if let Some(last) = self.last_spoken_at {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.min_gap {
                return DrainStep::Wait(self.min_gap - elapsed);
            }
        }

        match self.pending.pop_front() {
            Some(text) => {
                self.last_spoken_at = Some(now);
                DrainStep::Speak(text)
            }
            None => DrainStep::Idle,
        }
    }
}

impl Default for SpeechQueue {
    fn default() -> Self {
        Self::new(MIN_SPEECH_GAP)
    }
}

/// Sender handle for queuing phrases
pub type SpeechSender = mpsc::UnboundedSender<String>;

/// Create the phrase channel. Unbounded, like the queue it feeds.
pub fn create_speech_channel() -> (SpeechSender, mpsc::UnboundedReceiver<String>) {
    mpsc::unbounded_channel()
}

/// Background task that drains queued phrases into a `SpeechEngine`
pub struct SpeechDispatcher<E: SpeechEngine> {
    phrase_rx: mpsc::UnboundedReceiver<String>,
    queue: SpeechQueue,
    engine: E,
}

impl<E: SpeechEngine> SpeechDispatcher<E> {
    pub fn new(phrase_rx: mpsc::UnboundedReceiver<String>, engine: E, min_gap: Duration) -> Self {
        Self {
            phrase_rx,
            queue: SpeechQueue::new(min_gap),
            engine,
        }
    }

    /// Run until every sender is dropped and the queue has drained
    pub async fn run(mut self) {
        while let Some(text) = self.phrase_rx.recv().await {
            if self.queue.enqueue(text) {
                self.drain().await;
            }
        }
        self.engine.cancel();
    }

    async fn drain(&mut self) {
        loop {
            // Pick up anything queued while we were speaking or waiting
            while let Ok(text) = self.phrase_rx.try_recv() {
                self.queue.enqueue(text);
            }

            match self.queue.next_step(Instant::now()) {
                DrainStep::Idle => return,
                DrainStep::Wait(wait) => tokio::time::sleep(wait).await,
                DrainStep::Speak(text) => {
                    self.engine.cancel();
                    tracing::debug!(text = %text, queued = self.queue.len(), "Speaking");
                    if let Err(e) = self.engine.speak(&text).await {
                        tracing::warn!(error = %e, text = %text, "Utterance failed");
                    }
                }
            }
        }
    }
}
