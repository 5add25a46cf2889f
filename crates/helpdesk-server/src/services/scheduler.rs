//! Scheduler Service - Periodic email batch processing
//!
//! Polls the mailbox at a configured interval through the batch runner.

use std::sync::Arc;
use std::time::Duration;

use helpdesk::DomainError;
use tokio::time::interval;

use crate::application::BatchRunner;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between batch runs
    pub interval: Duration,
    /// Enable/disable scheduler
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            enabled: true,
        }
    }
}

/// Email polling scheduler
pub struct EmailScheduler {
    runner: Arc<BatchRunner>,
    config: SchedulerConfig,
}

impl EmailScheduler {
    pub fn new(runner: Arc<BatchRunner>, config: Option<SchedulerConfig>) -> Self {
        Self {
            runner,
            config: config.unwrap_or_default(),
        }
    }

    /// Start the scheduler (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        if !self.config.enabled {
            tracing::info!("📅 Email scheduler disabled");
            return;
        }

        tracing::info!(
            "📅 Email scheduler started (interval: {:?})",
            self.config.interval
        );

        let mut ticker = interval(self.config.interval);

        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;

            tracing::info!("🔄 Scheduler: Starting email batch...");

            match self.runner.run().await {
                Ok(report) => {
                    tracing::info!(
                        "🔄 Scheduler: Email batch completed ({} processed, {} failed)",
                        report.processed,
                        report.failures.len()
                    );
                    for failure in &report.failures {
                        tracing::warn!("  ❌ {}: {}", failure.email_id, failure.error);
                    }
                }
                Err(DomainError::Conflict(_)) => {
                    tracing::info!("⏭️  Scheduler: Previous batch still running, skipping");
                }
                Err(e) => {
                    tracing::warn!("  ❌ Scheduler: Email batch failed: {}", e);
                }
            }
        }
    }
}

/// Start the scheduler when a poll interval is configured
pub fn maybe_start_scheduler(
    runner: Arc<BatchRunner>,
    interval_secs: Option<u64>,
) -> Option<tokio::task::JoinHandle<()>> {
    let interval_secs = interval_secs.filter(|secs| *secs > 0)?;

    let config = SchedulerConfig {
        interval: Duration::from_secs(interval_secs),
        enabled: true,
    };

    Some(EmailScheduler::new(runner, Some(config)).start())
}
