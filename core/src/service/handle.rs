use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use super::ServiceCommand;
use crate::error::TimerError;
use crate::intensity::VisualState;
use crate::session::Session;
use crate::timer::{TimerController, TimerState};

/// Point-in-time view of the countdown, returned by every request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub remaining_secs: u32,
    pub display: String,
    pub visual: VisualState,
    /// Configured offsets, largest first
    pub warnings: Vec<u32>,
    /// Offsets already announced this run
    pub fired_warnings: Vec<u32>,
}

impl TimerSnapshot {
    pub(crate) fn of(controller: &TimerController) -> Self {
        Self {
            state: controller.state(),
            remaining_secs: controller.remaining_secs(),
            display: controller.display_text(),
            visual: controller.visual_state(),
            warnings: controller
                .session()
                .map(Session::warning_offsets)
                .unwrap_or_default(),
            fired_warnings: controller.fired_warnings(),
        }
    }
}

/// Handle to the timer service for the UI layer
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    cmd_tx: mpsc::Sender<ServiceCommand>,
}

impl ServiceHandle {
    pub(crate) fn new(cmd_tx: mpsc::Sender<ServiceCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Validate and start. An invalid duration is rejected here and the
    /// service never sees the request.
    pub async fn request_start(
        &self,
        minutes: i64,
        offsets: impl IntoIterator<Item = i64>,
    ) -> Result<TimerSnapshot, TimerError> {
        let session = Session::from_request(minutes, offsets)?;
        self.start(session).await
    }

    pub async fn start(&self, session: Session) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| ServiceCommand::Start { session, reply })
            .await
    }

    pub async fn request_pause(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| ServiceCommand::Pause { reply }).await
    }

    pub async fn request_resume(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| ServiceCommand::Resume { reply }).await
    }

    pub async fn request_toggle_pause(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| ServiceCommand::TogglePause { reply })
            .await
    }

    pub async fn request_reset(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| ServiceCommand::Reset { reply }).await
    }

    pub async fn request_cancel(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| ServiceCommand::Cancel { reply }).await
    }

    pub async fn status(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| ServiceCommand::Status { reply }).await
    }

    /// Stop the service task. Already-closed services are not an error.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(ServiceCommand::Shutdown).await;
    }

    async fn request(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<TimerSnapshot, TimerError>>) -> ServiceCommand,
    ) -> Result<TimerSnapshot, TimerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| TimerError::ServiceClosed)?;
        reply_rx.await.map_err(|_| TimerError::ServiceClosed)?
    }
}
