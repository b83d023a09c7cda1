use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub timestamp: i64,
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub database: DatabaseMetrics,
    pub network: NetworkMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuMetrics {
    pub usage: f64,
    pub cores: u32,
    pub load_average: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub total: u64,
    pub used: u64,
    #[serde(default)]
    pub free: u64,
    #[serde(default)]
    pub usage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseMetrics {
    pub connections: u64,
    pub size: u64,
    pub queries: u64,
}

/// Bytes moved during the last sampling interval, not running totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkMetrics {
    #[serde(rename = "in")]
    pub inbound: u64,
    #[serde(rename = "out")]
    pub outbound: u64,
}

/// Body returned by a live metrics endpoint. The receipt time is stamped
/// locally, so the payload carries no timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsPayload {
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    #[serde(default)]
    pub database: DatabaseMetrics,
    #[serde(default)]
    pub network: NetworkMetrics,
}

impl MetricsPayload {
    pub fn stamped(self, timestamp: i64) -> SystemMetrics {
        SystemMetrics {
            timestamp,
            cpu: self.cpu,
            memory: self.memory,
            database: self.database,
            network: self.network,
        }
    }
}

impl MemoryMetrics {
    pub fn from_used(total: u64, used: u64) -> Self {
        let mut memory = Self {
            total,
            used,
            free: 0,
            usage: 0.0,
        };
        memory.normalize();
        memory
    }

    /// Fills `usage` and `free` from `total` and `used` when the source left
    /// them unset.
    pub fn normalize(&mut self) {
        if self.total == 0 {
            return;
        }

        if self.usage == 0.0 || !self.usage.is_finite() {
            self.usage = self.used as f64 / self.total as f64 * 100.0;
            self.free = self.total.saturating_sub(self.used);
        } else if self.free == 0 && self.total >= self.used {
            self.free = self.total - self.used;
        }
    }
}

impl SystemMetrics {
    pub fn normalize_memory(&mut self) {
        self.memory.normalize();
    }

    /// Resolves a dotted metric path such as `cpu.usage` to a chartable value.
    pub fn metric_value(&self, path: &str) -> Option<f64> {
        let value = match path {
            "cpu.usage" => self.cpu.usage,
            "cpu.cores" => f64::from(self.cpu.cores),
            "cpu.loadAverage" => self.cpu.load_average[0],
            "memory.usage" => self.memory.usage,
            "memory.total" => self.memory.total as f64,
            "memory.used" => self.memory.used as f64,
            "memory.free" => self.memory.free as f64,
            "database.connections" => self.database.connections as f64,
            "database.size" => self.database.size as f64,
            "database.queries" => self.database.queries as f64,
            "network.in" => self.network.inbound as f64,
            "network.out" => self.network.outbound as f64,
            _ => return None,
        };
        Some(value)
    }
}

pub const METRIC_PATHS: [&str; 12] = [
    "cpu.usage",
    "cpu.cores",
    "cpu.loadAverage",
    "memory.usage",
    "memory.total",
    "memory.used",
    "memory.free",
    "database.connections",
    "database.size",
    "database.queries",
    "network.in",
    "network.out",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalData {
    pub metrics: Vec<SystemMetrics>,
    pub time_range: Option<TimeRange>,
}

impl HistoricalData {
    pub fn from_metrics(metrics: Vec<SystemMetrics>) -> Self {
        let time_range = match (metrics.first(), metrics.last()) {
            (Some(first), Some(last)) => Some(TimeRange {
                start: first.timestamp,
                end: last.timestamp,
            }),
            _ => None,
        };

        Self {
            metrics,
            time_range,
        }
    }

    pub fn series(&self, path: &str) -> Vec<(i64, f64)> {
        self.metrics
            .iter()
            .filter_map(|sample| {
                sample
                    .metric_value(path)
                    .map(|value| (sample.timestamp, value))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAlert {
    pub id: String,
    pub metric: String,
    pub threshold: f64,
    pub condition: AlertCondition,
    pub message: String,
    pub severity: AlertSeverity,
    pub triggered_at: i64,
}

#[cfg(test)]
pub(crate) fn sample_at(timestamp: i64, cpu: f64, memory_usage: f64) -> SystemMetrics {
    const TOTAL: u64 = 8 * 1024 * 1024 * 1024;
    let used = (TOTAL as f64 * memory_usage / 100.0) as u64;

    SystemMetrics {
        timestamp,
        cpu: CpuMetrics {
            usage: cpu,
            cores: 4,
            load_average: [0.5, 0.4, 0.3],
        },
        memory: MemoryMetrics {
            total: TOTAL,
            used,
            free: TOTAL - used,
            usage: memory_usage,
        },
        database: DatabaseMetrics::default(),
        network: NetworkMetrics::default(),
    }
}
