//! # Closing Watcher
//!
//! Re-evaluates the closing gate on a fixed cadence so the UI can enable
//! the "close day" button the moment the window opens, without a reload.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Closing Watcher Loop                             │
//! │                                                                         │
//! │  ┌──────────┐   tick (60 s)   ┌──────────────────┐   changed?          │
//! │  │ interval │ ──────────────► │ closing_status() │ ──────────► watch    │
//! │  └──────────┘                 └──────────────────┘             channel  │
//! │        ▲                                                          │     │
//! │        │                              subscribers (UI) ◄──────────┘     │
//! │  shutdown_rx ◄── ClosingWatcherHandle::shutdown()                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a soft consistency mechanism. It narrows the window in which two
//! terminals see a stale "open" state but is not a lock; the uniqueness
//! constraint on the closing date is.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::commands::closing::{closing_status, ClosingStatus};
use crate::error::ApiError;
use crate::state::{AppState, ConfigState, DbState};

/// Background task publishing [`ClosingStatus`].
pub struct ClosingWatcher {
    db: DbState,
    config: Arc<ConfigState>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    status_tx: watch::Sender<Option<ClosingStatus>>,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Handle for controlling the closing watcher.
#[derive(Clone)]
pub struct ClosingWatcherHandle {
    shutdown_tx: mpsc::Sender<()>,
    status_rx: watch::Receiver<Option<ClosingStatus>>,
}

impl ClosingWatcherHandle {
    /// A receiver that sees every published status change.
    pub fn subscribe(&self) -> watch::Receiver<Option<ClosingStatus>> {
        self.status_rx.clone()
    }

    /// Last published status. `None` until the first evaluation.
    pub fn current(&self) -> Option<ClosingStatus> {
        self.status_rx.borrow().clone()
    }

    /// Triggers graceful shutdown.
    pub async fn shutdown(&self) -> Result<(), ApiError> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| ApiError::internal("Closing watcher already stopped"))
    }
}

impl ClosingWatcher {
    /// Creates a watcher over the given state and returns its handle.
    pub fn new(state: &AppState) -> (Self, ClosingWatcherHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let (status_tx, status_rx) = watch::channel(None);

        let watcher = ClosingWatcher {
            db: state.db.clone(),
            config: Arc::clone(&state.config),
            clock: Arc::clone(&state.clock),
            poll_interval: state.config.poll_interval,
            status_tx,
            shutdown_rx,
        };

        (watcher, ClosingWatcherHandle { shutdown_tx, status_rx })
    }

    /// Runs the watcher loop. Spawn it as a background task.
    ///
    /// The first tick fires immediately, so subscribers get a status right
    /// after startup.
    pub async fn run(mut self) {
        info!(interval = ?self.poll_interval, "Closing watcher starting");

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.evaluate().await {
                        error!(%e, "Failed to evaluate closing status");
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Closing watcher shutting down");
                    break;
                }
            }
        }

        info!("Closing watcher stopped");
    }

    async fn evaluate(&self) -> Result<(), ApiError> {
        let status = closing_status(&self.db, &self.config, self.clock.as_ref()).await?;

        let changed = self.status_tx.send_if_modified(|current| {
            if current.as_ref() == Some(&status) {
                return false;
            }
            *current = Some(status.clone());
            true
        });

        if changed {
            info!(
                date = %status.date,
                closed = status.is_closed,
                eligible = status.is_eligible,
                can_close = status.can_close,
                "Closing status changed"
            );
        } else {
            debug!("Closing status unchanged");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::commands::closing::close_today;
    use chrono::{TimeZone, Utc};
    use tourdesk_db::{Database, DbConfig};

    async fn changed(rx: &mut watch::Receiver<Option<ClosingStatus>>) -> ClosingStatus {
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("watcher published nothing")
            .unwrap();
        rx.borrow_and_update().clone().unwrap()
    }

    #[tokio::test]
    async fn test_publishes_gate_flip_and_close() {
        // 04:59:30 in São Paulo
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 7, 59, 30).unwrap()));
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ConfigState {
            poll_interval: Duration::from_millis(10),
            ..ConfigState::default()
        };
        let state = AppState::new(DbState::connected(db), config, clock.clone());
        state.session.sign_in("token");

        let (watcher, handle) = ClosingWatcher::new(&state);
        let mut rx = handle.subscribe();
        let task = tokio::spawn(watcher.run());

        let first = changed(&mut rx).await;
        assert!(!first.is_eligible);
        assert!(!first.can_close);

        clock.set(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let open = changed(&mut rx).await;
        assert!(open.can_close);

        close_today(&state.db, &state.session, &state.config, state.clock.as_ref())
            .await
            .unwrap();
        let closed = changed(&mut rx).await;
        assert!(closed.is_closed);
        assert!(!closed.can_close);
        assert_eq!(handle.current(), Some(closed));

        handle.shutdown().await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    }
}
