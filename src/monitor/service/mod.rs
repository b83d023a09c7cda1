mod controller;
mod cycle;
mod snapshot;

pub use controller::{MonitorController, MonitorSettings};
pub(crate) use cycle::MonitorCore;
pub use snapshot::{ChartSeries, HistorySummary, MonitorSnapshot};
