use serde::Serialize;

use super::super::{
    chart::ChartConfig,
    history::MetricHistory,
    model::{HistoricalData, PerformanceAlert, SystemMetrics},
};

/// Read-only view handed to consumers of the monitor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub current_metrics: Option<SystemMetrics>,
    pub historical_data: HistoricalData,
    pub alerts: Vec<PerformanceAlert>,
    pub config: ChartConfig,
    pub is_monitoring: bool,
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: String,
    pub points: Vec<(i64, f64)>,
}

/// Line data for each selected metric within the configured time range.
pub(super) fn chart_series(
    history: &MetricHistory,
    config: &ChartConfig,
    now_ms: i64,
) -> Vec<ChartSeries> {
    let recent = history.latest_window(config.time_range.as_duration(), now_ms);
    let window = HistoricalData::from_metrics(recent);

    config
        .metrics
        .iter()
        .map(|metric| ChartSeries {
            metric: metric.clone(),
            points: window.series(metric),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub sample_count: usize,
    pub cpu_avg: f64,
    pub cpu_min: f64,
    pub cpu_max: f64,
    pub memory_avg: f64,
    pub memory_min: f64,
    pub memory_max: f64,
}

impl HistorySummary {
    pub(super) fn from_history(history: &MetricHistory) -> Option<Self> {
        let mut summary = Self {
            sample_count: 0,
            cpu_avg: 0.0,
            cpu_min: f64::MAX,
            cpu_max: f64::MIN,
            memory_avg: 0.0,
            memory_min: f64::MAX,
            memory_max: f64::MIN,
        };
        let mut cpu_sum = 0.0;
        let mut memory_sum = 0.0;

        for sample in history.iter() {
            summary.sample_count += 1;
            cpu_sum += sample.cpu.usage;
            memory_sum += sample.memory.usage;
            summary.cpu_min = summary.cpu_min.min(sample.cpu.usage);
            summary.cpu_max = summary.cpu_max.max(sample.cpu.usage);
            summary.memory_min = summary.memory_min.min(sample.memory.usage);
            summary.memory_max = summary.memory_max.max(sample.memory.usage);
        }

        if summary.sample_count == 0 {
            return None;
        }

        summary.cpu_avg = cpu_sum / summary.sample_count as f64;
        summary.memory_avg = memory_sum / summary.sample_count as f64;
        Some(summary)
    }
}
