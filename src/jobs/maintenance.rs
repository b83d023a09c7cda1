use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};

use crate::storage::MetricsStorage;

pub(super) fn start_maintenance_job(storage: MetricsStorage, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            storage.cleanup_old_data();
            let stats = storage.stats();
            tracing::debug!(
                target: "storage",
                total_bytes = stats.total_bytes(),
                metrics_bytes = stats.metrics_bytes,
                alerts_bytes = stats.alerts_bytes,
                "storage_maintenance_done"
            );
        }
    });
}
