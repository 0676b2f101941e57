//! Task lifecycle.
//!
//! At most one check loop runs at a time. Stopping flips the shutdown
//! signal, waits for the loop to finish, clears the slot, then reports
//! the shutdown by email on a best-effort basis.

use chrono::Local;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::engine::{ScheduleContext, run_loop};

/// Timestamp format of lifecycle reports.
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Slot for the single background task.
#[derive(Default)]
struct TaskSettings {
    started_at: Option<String>,
    handle: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
}

/// Snapshot of the task state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub active: bool,
    pub started_at: Option<String>,
}

/// Owns the background check task.
pub struct TaskSupervisor {
    ctx: ScheduleContext,
    state: Mutex<TaskSettings>,
}

impl TaskSupervisor {
    pub fn new(ctx: ScheduleContext) -> Self {
        Self {
            ctx,
            state: Mutex::new(TaskSettings::default()),
        }
    }

    /// Start the check task. False when one is already active or no
    /// artifact has been saved yet.
    pub async fn start(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.handle.is_some() {
            tracing::warn!("🚫 Check task already active");
            return false;
        }
        if !self.ctx.store.exists() {
            tracing::warn!("🚫 No saved artifact; nothing to check");
            return false;
        }

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(self.ctx.clone(), rx));

        state.shutdown = Some(tx);
        state.handle = Some(handle);
        state.started_at = Some(Local::now().format(TIMESTAMP_FORMAT).to_string());
        tracing::info!("⏰ Check task started");
        true
    }

    /// Stop the check task and wait for it to finish. False when none
    /// is active.
    pub async fn stop(&self) -> bool {
        let mut state = self.state.lock().await;
        let Some(handle) = state.handle.take() else {
            tracing::warn!("🚫 No active check task to stop");
            return false;
        };

        if let Some(tx) = state.shutdown.take() {
            let _ = tx.send(true);
        }
        if let Err(e) = handle.await {
            tracing::warn!("⚠️ Check task ended abnormally: {e}");
        }
        state.started_at = None;
        drop(state);

        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        let body = format!("<p>Encerramento da tarefa em {stamp}</p>");
        if let Err(e) = self.ctx.notifier.notify("Tarefa encerrada", &body).await {
            tracing::warn!("⚠️ Failed to send shutdown notice: {e}");
        }
        tracing::info!("🛑 Check task stopped");
        true
    }

    /// Current task state.
    pub async fn status(&self) -> TaskStatus {
        let state = self.state.lock().await;
        TaskStatus {
            active: state.handle.is_some(),
            started_at: state.started_at.clone(),
        }
    }
}
