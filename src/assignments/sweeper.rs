//! Background reclamation of expired assignments.
//!
//! # Responsibilities
//! - Periodically sweep the store
//! - Stop when the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::assignments::store::AssignmentStore;
use crate::observability::metrics;

/// Longest supported sweep period. Larger values are clamped.
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub struct Sweeper {
    store: Arc<AssignmentStore>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(store: Arc<AssignmentStore>, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.min(MAX_SWEEP_INTERVAL),
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Assignment sweeper starting"
        );

        // First sweep one full interval after startup.
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn sweep_once(&self) {
        let removed = self.store.sweep();
        metrics::record_swept(removed);
        if removed > 0 {
            tracing::debug!(
                removed,
                remaining = self.store.len(),
                "Swept expired assignments"
            );
        }
    }
}
