//! Sync agent
//!
//! One background task pushes dirty trip records to the remote store every
//! few seconds. Each iteration connects if needed, pushes the dirty records
//! oldest edit first, and records the remote id of every accepted push.
//! Failures are logged and published on the [`StatusBoard`]; the next tick
//! is the only retry.

use crate::config::SYNC_POLL_INTERVAL;
use crate::database::{Repository, SyncRecord};
use crate::error::{AppError, Result};
use crate::services::remote::{RemoteStore, SyncPayload};
use crate::services::status::{StatusBoard, SyncStatus};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifecycle of the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentState {
    Stopped,
    Running,
}

/// Outcome of a single sync iteration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub connected: bool,
    pub attempted: usize,
    pub pushed: usize,
    pub failed: usize,
    pub cancelled: bool,
}

struct RunningLoop {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Background synchronization of dirty trip records
pub struct SyncAgent {
    worker: SyncWorker,
    interval: Duration,
    running: Mutex<Option<RunningLoop>>,
}

impl SyncAgent {
    pub fn new(repo: Repository, remote: Arc<dyn RemoteStore>, status: StatusBoard) -> Self {
        Self {
            worker: SyncWorker {
                repo,
                remote,
                status,
            },
            interval: SYNC_POLL_INTERVAL,
            running: Mutex::new(None),
        }
    }

    /// Override the pause between iterations
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn state(&self) -> AgentState {
        match self.running.lock().await.as_ref() {
            Some(_) => AgentState::Running,
            None => AgentState::Stopped,
        }
    }

    /// Spawn the poll loop. Returns `false` if it was already running.
    pub async fn start(&self) -> bool {
        let mut running = self.running.lock().await;
        if running.is_some() {
            tracing::debug!("Sync agent already running");
            return false;
        }

        let cancel = CancellationToken::new();
        let worker = self.worker.clone();
        let task = tokio::spawn(worker.run(cancel.clone(), self.interval));

        *running = Some(RunningLoop { cancel, task });
        tracing::info!("Sync agent started (interval: {:?})", self.interval);
        true
    }

    /// Cancel the poll loop and wait for it to wind down
    pub async fn stop(&self) {
        let Some(running) = self.running.lock().await.take() else {
            return;
        };

        running.cancel.cancel();
        if let Err(e) = running.task.await {
            tracing::error!("Sync loop ended abnormally: {}", e);
        }

        self.worker.status.publish(SyncStatus::Idle);
        tracing::info!("Sync agent stopped");
    }

    /// Run a single iteration on the caller's task
    pub async fn sync_now(&self) -> SyncReport {
        self.worker.run_iteration(&CancellationToken::new()).await
    }
}

#[derive(Clone)]
struct SyncWorker {
    repo: Repository,
    remote: Arc<dyn RemoteStore>,
    status: StatusBoard,
}

impl SyncWorker {
    async fn run(self, cancel: CancellationToken, interval: Duration) {
        tracing::info!("Sync loop started");

        loop {
            let report = self.run_iteration(&cancel).await;
            if report.attempted > 0 {
                tracing::info!(
                    "Sync iteration: {} pushed, {} failed",
                    report.pushed,
                    report.failed
                );
            }

            if report.cancelled {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::info!("Sync loop stopped");
    }

    async fn run_iteration(&self, cancel: &CancellationToken) -> SyncReport {
        let mut report = SyncReport::default();

        if !self.remote.is_connected().await {
            self.status.publish(SyncStatus::Connecting);

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    return report;
                }
                attempt = self.remote.connect() => attempt,
            };

            if let Err(e) = attempt {
                tracing::warn!("Remote store unreachable: {}", e);
                self.status.publish(SyncStatus::Error {
                    detail: format!("Cannot reach remote store: {}", e),
                });
                return report;
            }
        }
        report.connected = true;

        let records = match self.repo.list_dirty_sync_records().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Failed to load dirty records: {}", e);
                self.status.publish(SyncStatus::Error {
                    detail: format!("Cannot read local records: {}", e),
                });
                return report;
            }
        };

        if records.is_empty() {
            self.status.publish(SyncStatus::UpToDate);
            return report;
        }

        self.status.publish(SyncStatus::Pushing {
            pending: records.len(),
        });

        for record in &records {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            report.attempted += 1;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                outcome = self.push_record(record) => outcome,
            };

            match outcome {
                Ok(()) => {
                    report.pushed += 1;
                    self.status.publish(SyncStatus::UpToDate);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Sync of trip {} failed: {}", record.trip_id, e);
                    self.status.publish(SyncStatus::Error {
                        detail: format!("Trip {}: {}", record.trip_id, e),
                    });
                }
            }
        }

        report
    }

    async fn push_record(&self, record: &SyncRecord) -> Result<()> {
        let payload = SyncPayload::from(record);
        let remote_id = self.remote.push(&payload).await?;

        if remote_id.trim().is_empty() {
            return Err(AppError::Remote(
                "Remote store returned an empty document id".to_string(),
            ));
        }

        let cleared = self
            .repo
            .mark_synced(record.trip_id, &remote_id, record.updated_at)
            .await?;

        if !cleared {
            tracing::debug!(
                "Trip {} was edited during its push; it stays dirty",
                record.trip_id
            );
        }

        Ok(())
    }
}
