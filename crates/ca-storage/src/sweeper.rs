//! Time-based cleanup of public uploads and conversion results.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::store::ObjectStore;

/// Counters from one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Deletes objects under the configured prefixes once they are older than
/// the retention period.
#[derive(Clone)]
pub struct Sweeper {
    store: Arc<dyn ObjectStore>,
    retention: chrono::Duration,
    prefixes: Vec<String>,
}

impl Sweeper {
    pub fn new(store: Arc<dyn ObjectStore>, retention: Duration, prefixes: Vec<String>) -> Self {
        let retention = chrono::Duration::from_std(retention)
            .unwrap_or_else(|_| chrono::Duration::days(365 * 100));
        Self {
            store,
            retention,
            prefixes,
        }
    }

    /// Run a single pass as of `now`.
    ///
    /// Failures on one object or prefix are logged and counted; the pass
    /// carries on with the rest.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> SweepReport {
        let cutoff = now
            .checked_sub_signed(self.retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut report = SweepReport::default();

        for prefix in &self.prefixes {
            let objects = match self.store.list(prefix).await {
                Ok(objects) => objects,
                Err(e) => {
                    tracing::warn!(prefix = %prefix, "Failed to list objects for cleanup: {e}");
                    report.failed += 1;
                    continue;
                }
            };

            for object in objects {
                report.scanned += 1;
                if object.created >= cutoff {
                    continue;
                }
                match self.store.delete(&object.name).await {
                    Ok(true) => {
                        tracing::debug!(path = %object.name, "Deleted expired object");
                        report.deleted += 1;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(path = %object.name, "Failed to delete expired object: {e}");
                        report.failed += 1;
                    }
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            deleted = report.deleted,
            failed = report.failed,
            "Storage cleanup finished"
        );
        report
    }
}

/// Run `sweeper` every `period` until `cancel` fires.
///
/// The first pass happens one full period after start.
pub fn start_sweeper_task(
    sweeper: Sweeper,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = period.max(Duration::from_secs(1));
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(period_secs = period.as_secs(), "Storage sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    sweeper.sweep_once(Utc::now()).await;
                }
                _ = cancel.cancelled() => break,
            }
        }
        tracing::info!("Storage sweeper stopped");
    })
}
