//! Email Batch Runner
//!
//! Runs at most one email batch at a time and remembers the last report.
//! Used by the HTTP trigger and by the scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use helpdesk::DomainError;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use super::agent::{BatchReport, CustomerServiceAgent};

/// Current batch state
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchStatus {
    pub running: bool,
    pub last_report: Option<BatchReport>,
}

pub struct BatchRunner {
    agent: Arc<CustomerServiceAgent>,
    running: AtomicBool,
    last_report: RwLock<Option<BatchReport>>,
}

/// Clears the running flag however the batch ends
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BatchRunner {
    pub fn new(agent: Arc<CustomerServiceAgent>) -> Self {
        Self {
            agent,
            running: AtomicBool::new(false),
            last_report: RwLock::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run a batch to completion on the current task
    pub async fn run(&self) -> Result<BatchReport, DomainError> {
        let guard = self.acquire()?;
        self.run_acquired(guard).await
    }

    /// Start a batch in the background
    pub fn start(self: &Arc<Self>) -> Result<JoinHandle<()>, DomainError> {
        // Claim the flag before spawning so a second request sees it.
        // The spawned task takes over clearing it.
        let claimed = self.acquire()?;
        std::mem::forget(claimed);

        let runner = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let guard = RunningGuard(&runner.running);
            if let Err(e) = runner.run_acquired(guard).await {
                tracing::error!("Email batch failed: {}", e);
            }
        }))
    }

    pub async fn status(&self) -> BatchStatus {
        BatchStatus {
            running: self.is_running(),
            last_report: self.last_report.read().await.clone(),
        }
    }

    fn acquire(&self) -> Result<RunningGuard<'_>, DomainError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| {
                DomainError::Conflict("Email batch processing is already running".to_string())
            })?;
        Ok(RunningGuard(&self.running))
    }

    async fn run_acquired(&self, _guard: RunningGuard<'_>) -> Result<BatchReport, DomainError> {
        let report = self.agent.process_email_batch().await?;
        *self.last_report.write().await = Some(report.clone());
        Ok(report)
    }
}
