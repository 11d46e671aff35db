//! Sync status board
//!
//! Holds the current sync status and lets any number of subscribers follow
//! it. A new subscription first yields the current value, then every change.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// What the sync agent is doing right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncStatus {
    Idle,
    Connecting,
    Pushing { pending: usize },
    UpToDate,
    Error { detail: String },
}

impl SyncStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, SyncStatus::Error { .. })
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => write!(f, "Sync idle"),
            SyncStatus::Connecting => write!(f, "Connecting to remote store"),
            SyncStatus::Pushing { pending } => write!(f, "Syncing {} record(s)", pending),
            SyncStatus::UpToDate => write!(f, "Up to date"),
            SyncStatus::Error { detail } => write!(f, "Sync error: {}", detail),
        }
    }
}

/// Shared, cloneable handle to the current sync status
#[derive(Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<SyncStatus>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SyncStatus::Idle);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current status; subscribers are only woken on change
    pub fn publish(&self, status: SyncStatus) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status.clone();
                true
            }
        });

        if changed {
            if status.is_error() {
                tracing::warn!("{}", status);
            } else {
                tracing::debug!("{}", status);
            }
        }
    }

    pub fn current(&self) -> SyncStatus {
        self.tx.borrow().clone()
    }

    /// Follow the status. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> StatusSubscription {
        StatusSubscription {
            rx: self.tx.subscribe(),
            replayed: false,
        }
    }
}

/// Stream of status values for a single subscriber
pub struct StatusSubscription {
    rx: watch::Receiver<SyncStatus>,
    replayed: bool,
}

impl StatusSubscription {
    /// Next status: the current value on the first call, then each change.
    /// Returns `None` once every board handle is gone.
    pub async fn next(&mut self) -> Option<SyncStatus> {
        if !self.replayed {
            self.replayed = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_new_subscriber_gets_current_value_first() {
        let board = StatusBoard::new();
        board.publish(SyncStatus::UpToDate);

        let mut sub = board.subscribe();
        assert_eq!(sub.next().await, Some(SyncStatus::UpToDate));
    }

    #[tokio::test]
    async fn test_subscriber_streams_changes() {
        let board = StatusBoard::new();
        let mut sub = board.subscribe();
        assert_eq!(sub.next().await, Some(SyncStatus::Idle));

        board.publish(SyncStatus::Connecting);
        assert_eq!(sub.next().await, Some(SyncStatus::Connecting));

        board.publish(SyncStatus::Error {
            detail: "offline".to_string(),
        });
        let status = sub.next().await.unwrap();
        assert!(status.is_error());
        assert_eq!(status.to_string(), "Sync error: offline");
    }

    #[tokio::test]
    async fn test_identical_status_does_not_wake_subscribers() {
        let board = StatusBoard::new();
        let mut sub = board.subscribe();
        sub.next().await;

        board.publish(SyncStatus::Idle);

        let woke = tokio::time::timeout(Duration::from_millis(50), sub.next()).await;
        assert!(woke.is_err());
    }

    #[tokio::test]
    async fn test_subscription_ends_when_board_dropped() {
        let board = StatusBoard::new();
        let mut sub = board.subscribe();
        sub.next().await;

        drop(board);
        assert_eq!(sub.next().await, None);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(SyncStatus::Pushing { pending: 3 }.to_string(), "Syncing 3 record(s)");
        assert_eq!(SyncStatus::UpToDate.to_string(), "Up to date");
    }
}
