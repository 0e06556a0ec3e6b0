use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use countdown_core::{ServiceHandle, TimerSignal, spawn_services};
use countdown_types::{AppConfig, AudioSettings};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;

pub const APP_NAME: &str = "countdown";

/// How long exit waits for queued tones and speech to finish
pub const EXIT_GRACE: Duration = Duration::from_secs(5);

pub struct AppState {
    pub config: AppConfig,
    /// Shared with the audio service; edits apply to the next notification
    pub audio: Arc<RwLock<AudioSettings>>,
    /// Read by the renderer on every frame
    pub dark_mode: Arc<AtomicBool>,
    pub handle: ServiceHandle,
    pub tasks: Vec<JoinHandle<()>>,
}

impl AppState {
    /// Spawn the timer services. Returns the state plus the signal stream the
    /// renderer consumes.
    pub async fn start(config: AppConfig) -> (Self, mpsc::Receiver<TimerSignal>) {
        let audio = Arc::new(RwLock::new(config.audio.clone()));

        #[cfg(target_os = "linux")]
        let speech = countdown_core::CommandSpeech::new(config.audio.speech_command.clone());
        #[cfg(not(target_os = "linux"))]
        let speech = countdown_core::audio::SystemSpeech::native();

        #[cfg(feature = "rodio")]
        let tones = countdown_core::audio::SineTone;
        #[cfg(not(feature = "rodio"))]
        let tones = countdown_core::TerminalBell;
        let services = spawn_services(Arc::clone(&audio), tones, speech).await;

        tracing::info!(audio_enabled = config.audio.enabled, "Timer services started");

        let state = Self {
            dark_mode: Arc::new(AtomicBool::new(config.dark_mode)),
            config,
            audio,
            handle: services.handle,
            tasks: services.tasks,
        };
        (state, services.signals)
    }

    /// Flip and persist the dark mode preference
    pub fn toggle_dark_mode(&mut self) -> Result<bool, String> {
        let dark = self.config.toggle_dark_mode();
        self.dark_mode.store(dark, Ordering::Relaxed);
        self.save_config()?;
        Ok(dark)
    }

    pub fn save_config(&self) -> Result<(), String> {
        confy::store(APP_NAME, None, &self.config).map_err(|e| {
            tracing::warn!(error = %e, "Failed to save config");
            format!("failed to save settings: {e}")
        })
    }
}

/// Wait for background tasks to wind down, aborting any still running once
/// `grace` has passed. Returns how many had to be aborted.
pub async fn join_tasks(tasks: Vec<JoinHandle<()>>, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    let mut aborted = 0;
    for mut task in tasks {
        if tokio::time::timeout_at(deadline, &mut task).await.is_err() {
            task.abort();
            aborted += 1;
        }
    }
    if aborted > 0 {
        tracing::warn!(aborted, "Background tasks did not finish in time");
    }
    aborted
}

/// Load the persisted config, falling back to defaults on any error
pub fn load_config() -> AppConfig {
    match confy::load(APP_NAME, None) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn join_tasks_waits_for_finishing_work() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let speaking = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            flag.store(true, Ordering::Relaxed);
        });

        assert_eq!(join_tasks(vec![speaking], EXIT_GRACE).await, 0);
        assert!(finished.load(Ordering::Relaxed));
    }

    #[tokio::test(start_paused = true)]
    async fn join_tasks_aborts_stragglers() {
        let done = tokio::spawn(async {});
        let stuck = tokio::spawn(std::future::pending::<()>());

        let started = tokio::time::Instant::now();
        assert_eq!(join_tasks(vec![done, stuck], Duration::from_secs(2)).await, 1);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
