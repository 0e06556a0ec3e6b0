//! Timer service - owns the countdown and its tick source
//!
//! Architecture:
//! - ServiceHandle: for sending commands from the UI layer
//! - TimerService: background task that applies commands and ticks, then
//!   forwards the resulting signals to the UI and audio channels
//! - AudioService / SpeechDispatcher: background tasks producing tones and
//!   queued speech
//!
//! The controller is only ever touched from the service task, so commands and
//! ticks are serialized through its mailbox.
mod handle;

#[cfg(test)]
mod service_tests;

pub use handle::{ServiceHandle, TimerSnapshot};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use countdown_types::AudioSettings;

use crate::audio::{
    AudioSender, AudioService, SpeechDispatcher, SpeechEngine, ToneSink, create_audio_channel,
    create_speech_channel,
};
use crate::error::TimerError;
use crate::session::Session;
use crate::timer::{TimerController, TimerSignal};

/// Period of the countdown tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

type Reply = oneshot::Sender<Result<TimerSnapshot, TimerError>>;

/// What a successful command does to the tick source
#[derive(Debug, Clone, Copy)]
enum TickAction {
    Keep,
    Stop,
    /// Replace with a fresh interval if the countdown should be ticking
    Rearm,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Messages sent to the service from the UI layer
pub(crate) enum ServiceCommand {
    Start { session: Session, reply: Reply },
    Pause { reply: Reply },
    Resume { reply: Reply },
    TogglePause { reply: Reply },
    Reset { reply: Reply },
    Cancel { reply: Reply },
    Status { reply: Reply },
    Shutdown,
}

// ─────────────────────────────────────────────────────────────────────────────
// Timer Service
// ─────────────────────────────────────────────────────────────────────────────

pub struct TimerService {
    controller: TimerController,
    cmd_rx: mpsc::Receiver<ServiceCommand>,
    /// Present exactly while the controller is ticking
    ticker: Option<Interval>,
    period: Duration,
    signal_tx: mpsc::Sender<TimerSignal>,
    audio_tx: AudioSender,
}

impl TimerService {
    pub fn new(
        period: Duration,
        signal_tx: mpsc::Sender<TimerSignal>,
        audio_tx: AudioSender,
    ) -> (Self, ServiceHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let service = Self {
            controller: TimerController::new(),
            cmd_rx,
            ticker: None,
            period,
            signal_tx,
            audio_tx,
        };
        (service, ServiceHandle::new(cmd_tx))
    }

    /// Run until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(ServiceCommand::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }
                _ = next_tick(&mut self.ticker) => {
                    let signals = self.controller.tick();
                    self.dispatch(signals).await;
                }
            }

            if !self.controller.is_ticking() {
                self.ticker = None;
            }
        }
        tracing::debug!("Timer service stopped");
    }

    async fn handle_command(&mut self, cmd: ServiceCommand) {
        let (result, reply, tick) = match cmd {
            ServiceCommand::Start { session, reply } => {
                (self.controller.start(session), reply, TickAction::Rearm)
            }
            ServiceCommand::Pause { reply } => (self.controller.pause(), reply, TickAction::Stop),
            ServiceCommand::Resume { reply } => {
                (self.controller.resume(), reply, TickAction::Rearm)
            }
            ServiceCommand::TogglePause { reply } => {
                (self.controller.toggle_pause(), reply, TickAction::Rearm)
            }
            ServiceCommand::Reset { reply } => (self.controller.reset(), reply, TickAction::Rearm),
            ServiceCommand::Cancel { reply } => {
                (Ok(self.controller.cancel()), reply, TickAction::Stop)
            }
            ServiceCommand::Status { reply } => (Ok(Vec::new()), reply, TickAction::Keep),
            ServiceCommand::Shutdown => return,
        };

        let result = match result {
            Ok(signals) => {
                match tick {
                    TickAction::Keep => {}
                    // Always drop the old tick source before arranging a new one
                    TickAction::Stop => self.ticker = None,
                    TickAction::Rearm => {
                        self.ticker = None;
                        if self.controller.is_ticking() {
                            self.ticker = Some(new_ticker(self.period));
                        }
                    }
                }
                self.dispatch(signals).await;
                Ok(TimerSnapshot::of(&self.controller))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected timer command");
                Err(e)
            }
        };

        // Requester may have gone away; nothing to do about it
        let _ = reply.send(result);
    }

    async fn dispatch(&mut self, signals: Vec<TimerSignal>) {
        for signal in signals {
            if let TimerSignal::Notified(notification) = &signal {
                if self.audio_tx.send((*notification).into()).await.is_err() {
                    tracing::warn!(?notification, "Audio service stopped, notification dropped");
                }
            }
            if signal.is_frame() {
                // Frames are superseded by the next tick, so a lagging UI
                // just skips them
                if let Err(mpsc::error::TrySendError::Full(signal)) =
                    self.signal_tx.try_send(signal)
                {
                    tracing::debug!(?signal, "UI lagging, frame dropped");
                }
            } else if self.signal_tx.send(signal).await.is_err() {
                tracing::debug!("UI gone, signal dropped");
            }
        }
    }
}

/// First tick one full period after (re)arming, like a fresh interval timer
fn new_ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────────────────────────────────────

/// Running countdown services
pub struct Services {
    pub handle: ServiceHandle,
    /// Display, intensity, state and notification signals for the UI
    pub signals: mpsc::Receiver<TimerSignal>,
    pub tasks: Vec<JoinHandle<()>>,
}

/// Spawn the timer, audio and speech tasks on the current runtime
pub async fn spawn_services<T, E>(
    settings: Arc<RwLock<AudioSettings>>,
    tones: T,
    speech: E,
) -> Services
where
    T: ToneSink,
    E: SpeechEngine,
{
    let speech_gap = Duration::from_millis(settings.read().await.speech_gap_ms);

    let (signal_tx, signals) = mpsc::channel(64);
    let (audio_tx, audio_rx) = create_audio_channel();
    let (speech_tx, speech_rx) = create_speech_channel();

    let (timer, handle) = TimerService::new(TICK_PERIOD, signal_tx, audio_tx);
    let audio = AudioService::new(audio_rx, settings, tones, speech_tx);
    let dispatcher = SpeechDispatcher::new(speech_rx, speech, speech_gap);

    let tasks = vec![
        tokio::spawn(timer.run()),
        tokio::spawn(audio.run()),
        tokio::spawn(dispatcher.run()),
    ];

    Services {
        handle,
        signals,
        tasks,
    }
}
