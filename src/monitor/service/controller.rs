use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{
    sync::{Mutex, Notify},
    task::JoinHandle,
};

use crate::config::{AlertThresholds, Config};
use crate::jobs::spawn_monitor_job;
use crate::storage::MetricsStorage;

use super::super::{
    chart::{ChartConfig, ChartConfigPatch, ConfigUpdateError},
    evaluator::retain_recent,
    history::MetricHistory,
    model::SystemMetrics,
    provider::ActiveMetricsProvider,
};
use super::cycle::{MonitorCore, MonitorState};
use super::snapshot::{ChartSeries, HistorySummary, MonitorSnapshot, chart_series};

#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub max_history: usize,
    pub refresh_interval_ms: u64,
    pub thresholds: AlertThresholds,
}

impl MonitorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_history: config.monitor.max_history,
            refresh_interval_ms: config.monitor.refresh_interval_ms,
            thresholds: config.alerts,
        }
    }
}

struct PollingTimer {
    stop: Arc<Notify>,
    handle: JoinHandle<()>,
}

/// Owns the monitoring pipeline for one consumer: the polling timer, the
/// rolling history, alerts and chart configuration. Dropping the controller
/// stops its polling job.
pub struct MonitorController {
    core: Arc<MonitorCore>,
    timer: Mutex<Option<PollingTimer>>,
}

impl MonitorController {
    /// Builds a controller, restoring history, alerts and chart configuration
    /// from `storage` when it is present.
    pub fn new(
        provider: ActiveMetricsProvider,
        storage: Option<MetricsStorage>,
        settings: MonitorSettings,
    ) -> Self {
        let default_config = ChartConfig::with_refresh_interval(settings.refresh_interval_ms);

        let state = match &storage {
            Some(storage) => {
                let config = match storage.load_config() {
                    Some(config) => match config.validate() {
                        Ok(()) => config,
                        Err(error) => {
                            tracing::warn!(
                                target: "monitor",
                                error = %error,
                                "stored_chart_config_invalid"
                            );
                            default_config
                        }
                    },
                    None => default_config,
                };

                let mut alerts = Vec::new();
                retain_recent(&mut alerts, storage.load_alerts());

                let history = MetricHistory::restore(settings.max_history, storage.load_metrics());
                tracing::info!(
                    target: "monitor",
                    restored_samples = history.len(),
                    restored_alerts = alerts.len(),
                    "monitor_state_restored"
                );

                MonitorState {
                    history,
                    current_metrics: None,
                    last_updated: storage.load_last_updated(),
                    alerts,
                    config,
                }
            }
            None => MonitorState {
                history: MetricHistory::with_capacity(settings.max_history),
                current_metrics: None,
                last_updated: None,
                alerts: Vec::new(),
                config: default_config,
            },
        };

        Self {
            core: Arc::new(MonitorCore::new(
                provider,
                storage,
                state,
                settings.thresholds,
            )),
            timer: Mutex::new(None),
        }
    }

    /// (Re)installs the polling job at the configured refresh interval and
    /// runs one cycle right away. A running job is replaced.
    pub async fn start_monitoring(&self) -> Option<SystemMetrics> {
        let refresh_interval_ms = self.core.state.lock().await.config.refresh_interval;
        let period = Duration::from_millis(refresh_interval_ms.max(1));

        {
            let mut timer = self.timer.lock().await;
            if let Some(previous) = timer.take() {
                previous.stop.notify_one();
            }

            let stop = Arc::new(Notify::new());
            let handle = spawn_monitor_job(Arc::clone(&self.core), period, Arc::clone(&stop));
            *timer = Some(PollingTimer { stop, handle });
        }

        tracing::info!(target: "monitor", refresh_interval_ms, "monitoring_started");
        self.core.run_cycle().await
    }

    /// Prevents further ticks. A cycle already in flight still completes.
    pub async fn stop_monitoring(&self) {
        let Some(timer) = self.timer.lock().await.take() else {
            return;
        };

        timer.stop.notify_one();
        tracing::info!(target: "monitor", "monitoring_stopped");
    }

    /// Runs one cycle outside the timer cadence. If a tick is in flight this
    /// waits for it to finish first.
    pub async fn refresh_now(&self) -> Option<SystemMetrics> {
        self.core.run_cycle().await
    }

    /// Runs one cycle stamped with `now_ms` instead of the wall clock.
    pub async fn refresh_now_at(&self, now_ms: i64) -> Option<SystemMetrics> {
        self.core.run_cycle_at(now_ms).await
    }

    /// Merges `patch` into the chart configuration and persists it. The
    /// polling period only changes on the next `start_monitoring`.
    pub async fn update_config(
        &self,
        patch: ChartConfigPatch,
    ) -> Result<ChartConfig, ConfigUpdateError> {
        let mut state = self.core.state.lock().await;
        let merged = state.config.merged(patch)?;
        state.config = merged.clone();

        if let Some(storage) = &self.core.storage {
            storage.save_config(&merged);
        }

        Ok(merged)
    }

    pub async fn clear_alerts(&self) {
        let mut state = self.core.state.lock().await;
        state.alerts.clear();

        if let Some(storage) = &self.core.storage {
            storage.clear_alerts();
        }
    }

    pub async fn is_monitoring(&self) -> bool {
        self.timer
            .lock()
            .await
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    pub async fn snapshot(&self) -> MonitorSnapshot {
        let is_monitoring = self.is_monitoring().await;
        let state = self.core.state.lock().await;

        MonitorSnapshot {
            current_metrics: state.current_metrics.clone(),
            historical_data: state.history.historical_data(),
            alerts: state.alerts.clone(),
            config: state.config.clone(),
            is_monitoring,
            last_updated: state.last_updated,
        }
    }

    pub async fn chart_data(&self) -> Vec<ChartSeries> {
        self.chart_data_at(Utc::now().timestamp_millis()).await
    }

    pub async fn chart_data_at(&self, now_ms: i64) -> Vec<ChartSeries> {
        let state = self.core.state.lock().await;
        chart_series(&state.history, &state.config, now_ms)
    }

    pub async fn summary(&self) -> Option<HistorySummary> {
        let state = self.core.state.lock().await;
        HistorySummary::from_history(&state.history)
    }
}

impl Drop for MonitorController {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.stop.notify_one();
        }
    }
}
