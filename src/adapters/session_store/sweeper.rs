//! SessionSweeper - Background expiry of idle chat sessions.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 1h | How often to sweep |
//! | `max_idle` | 1h | Idle time after which a session is removed |
//!
//! The loop stops when the shutdown channel flips to `true`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::ports::{SessionStore, SessionStoreError};

/// Configuration for the SessionSweeper task.
#[derive(Debug, Clone)]
pub struct SessionSweeperConfig {
    /// How often to sweep.
    pub interval: Duration,
    /// Idle time after which a session is removed.
    pub max_idle: Duration,
}

impl Default for SessionSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            max_idle: Duration::from_secs(3600),
        }
    }
}

impl SessionSweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_idle(mut self, max_idle: Duration) -> Self {
        self.max_idle = max_idle;
        self
    }
}

/// Periodically removes idle sessions from a [`SessionStore`].
pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    config: SessionSweeperConfig,
}

impl SessionSweeper {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionSweeperConfig) -> Self {
        Self { store, config }
    }

    /// Run the sweep loop until the shutdown signal is received.
    ///
    /// Store failures are logged and the loop keeps going.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Session sweeper stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(err) = self.sweep_once().await {
                        warn!(error = %err, "Session sweep failed");
                    }
                }
            }
        }
    }

    /// Run exactly one sweep.
    pub async fn sweep_once(&self) -> Result<usize, SessionStoreError> {
        let removed = self.store.sweep(self.config.max_idle).await?;
        if removed > 0 {
            info!(removed, "Expired idle chat sessions");
        }
        Ok(removed)
    }
}
