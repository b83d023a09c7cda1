mod chart;
mod evaluator;
mod history;
pub(crate) mod model;
mod provider;
mod service;

pub use chart::{
    ChartConfig, ChartConfigPatch, ChartTimeRange, ChartType, ConfigUpdateError, TimeUnit,
};
pub use evaluator::{MAX_ALERTS, evaluate_sample, retain_recent};
pub use history::MetricHistory;
pub use model::{
    AlertCondition, AlertSeverity, CpuMetrics, DatabaseMetrics, HistoricalData, MemoryMetrics,
    NetworkMetrics, PerformanceAlert, SystemMetrics, TimeRange,
};
pub use provider::{
    ActiveMetricsProvider, HostMetricsProvider, LiveMetricsProvider, MetricsProvider, MonitorError,
    SyntheticMetricsProvider,
};
pub use service::{
    ChartSeries, HistorySummary, MonitorController, MonitorSettings, MonitorSnapshot,
};
pub(crate) use service::MonitorCore;
