use chrono::Utc;
use tokio::sync::Mutex;

use crate::config::AlertThresholds;
use crate::storage::{MetricsStorage, optimize_storage, prune_stale_alerts};

use super::super::{
    chart::ChartConfig,
    evaluator::{evaluate_sample, retain_recent},
    history::MetricHistory,
    model::{PerformanceAlert, SystemMetrics},
    provider::ActiveMetricsProvider,
};

pub(super) struct MonitorState {
    pub history: MetricHistory,
    pub current_metrics: Option<SystemMetrics>,
    pub last_updated: Option<i64>,
    pub alerts: Vec<PerformanceAlert>,
    pub config: ChartConfig,
}

/// State shared between a controller and its polling job.
pub(crate) struct MonitorCore {
    // Held for a whole cycle, which serializes timer ticks and manual refreshes.
    provider: Mutex<ActiveMetricsProvider>,
    pub(super) state: Mutex<MonitorState>,
    pub(super) storage: Option<MetricsStorage>,
    thresholds: AlertThresholds,
}

impl MonitorCore {
    pub(super) fn new(
        provider: ActiveMetricsProvider,
        storage: Option<MetricsStorage>,
        state: MonitorState,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            provider: Mutex::new(provider),
            state: Mutex::new(state),
            storage,
            thresholds,
        }
    }

    /// One sample cycle. Returns `None` when the source produced no sample;
    /// state is left untouched in that case.
    pub(crate) async fn run_cycle(&self) -> Option<SystemMetrics> {
        self.cycle(|| Utc::now().timestamp_millis()).await
    }

    /// Same as [`Self::run_cycle`] with the cycle clock pinned to `now_ms`.
    pub(crate) async fn run_cycle_at(&self, now_ms: i64) -> Option<SystemMetrics> {
        self.cycle(|| now_ms).await
    }

    async fn cycle(&self, clock: impl FnOnce() -> i64) -> Option<SystemMetrics> {
        let mut provider = self.provider.lock().await;
        let mut metrics = provider.fetch_system_metrics().await?;
        metrics.normalize_memory();
        let now = clock();

        let mut state = self.state.lock().await;
        state.history.push(metrics.clone());

        if let Some(storage) = &self.storage {
            let optimized = optimize_storage(state.history.to_vec());
            storage.save_metrics_at(&optimized, now);
            storage.save_last_updated(now);
        }

        state.current_metrics = Some(metrics.clone());
        state.last_updated = Some(now);

        let new_alerts = evaluate_sample(&metrics, &self.thresholds, now);
        let alert_count = new_alerts.len();
        for alert in &new_alerts {
            tracing::warn!(
                target: "monitor",
                metric = %alert.metric,
                severity = ?alert.severity,
                threshold = alert.threshold,
                message = %alert.message,
                "performance_alert"
            );
        }

        let expired_alerts = prune_stale_alerts(&mut state.alerts, now);
        if alert_count > 0 || expired_alerts > 0 {
            retain_recent(&mut state.alerts, new_alerts);
            if let Some(storage) = &self.storage {
                storage.save_alerts_at(&state.alerts, now);
            }
        }

        tracing::info!(
            target: "monitor",
            cpu = metrics.cpu.usage,
            memory = metrics.memory.usage,
            history_len = state.history.len(),
            new_alerts = alert_count,
            "monitor_metrics"
        );

        drop(state);
        drop(provider);
        Some(metrics)
    }
}
