use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{
    sync::Notify,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};

use crate::monitor::MonitorCore;

/// Polls `core` every `period` until `stop` is notified. The first tick fires
/// one period after spawning; the caller runs the immediate cycle itself.
pub(crate) fn spawn_monitor_job(
    core: Arc<MonitorCore>,
    period: Duration,
    stop: Arc<Notify>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut previous_tick = None;

        loop {
            tokio::select! {
                biased;
                _ = stop.notified() => break,
                _ = ticker.tick() => {}
            }

            let now = Utc::now();
            if let Some(previous) = previous_tick {
                let elapsed_ms = now.signed_duration_since(previous).num_milliseconds().max(0);
                let threshold_ms = i64::try_from(period.as_millis() * 2).unwrap_or(i64::MAX);
                if elapsed_ms > threshold_ms {
                    tracing::warn!(
                        target: "monitor",
                        elapsed_ms,
                        threshold_ms,
                        "monitor_loop_delayed"
                    );
                }
            }
            previous_tick = Some(now);

            core.run_cycle().await;
        }

        tracing::debug!(target: "monitor", "monitor_job_exited");
    })
}
