use std::{future::Future, time::Duration};

use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};
use sysinfo::{CpuExt, NetworkExt, NetworksExt, System, SystemExt};
use thiserror::Error;

use crate::config::{SourceConfig, SourceMode};

use super::model::{
    CpuMetrics, DatabaseMetrics, MemoryMetrics, MetricsPayload, NetworkMetrics, SystemMetrics,
};

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to build metrics client: {0}")]
    Client(reqwest::Error),
    #[error("metrics request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("metrics endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[cfg(test)]
    #[error("mock metrics exhausted")]
    MockExhausted,
}

pub trait MetricsProvider {
    fn collect_metrics(
        &mut self,
    ) -> impl Future<Output = Result<SystemMetrics, MonitorError>> + Send;
}

pub enum ActiveMetricsProvider {
    Live(LiveMetricsProvider),
    Synthetic(SyntheticMetricsProvider),
    Host(Box<HostMetricsProvider>),
    #[cfg(test)]
    Mock(MockMetricsProvider),
}

impl ActiveMetricsProvider {
    pub fn from_source(source: &SourceConfig) -> Result<Self, MonitorError> {
        let provider = match source.mode {
            SourceMode::Live => Self::Live(LiveMetricsProvider::new(
                &source.endpoint,
                source.auth_token.clone(),
                Duration::from_secs(source.timeout_secs),
            )?),
            SourceMode::Synthetic => Self::Synthetic(SyntheticMetricsProvider::new()),
            SourceMode::Host => Self::Host(Box::new(HostMetricsProvider::new())),
        };
        Ok(provider)
    }

    fn source_name(&self) -> &'static str {
        match self {
            ActiveMetricsProvider::Live(_) => "live",
            ActiveMetricsProvider::Synthetic(_) => "synthetic",
            ActiveMetricsProvider::Host(_) => "host",
            #[cfg(test)]
            ActiveMetricsProvider::Mock(_) => "mock",
        }
    }

    /// Collects one sample. Failures are logged and reported as `None` so the
    /// caller can skip the tick.
    pub async fn fetch_system_metrics(&mut self) -> Option<SystemMetrics> {
        match self.collect_metrics().await {
            Ok(metrics) => Some(metrics),
            Err(error) => {
                tracing::warn!(
                    target: "monitor",
                    source = self.source_name(),
                    error = %error,
                    "metrics_fetch_failed"
                );
                None
            }
        }
    }
}

impl MetricsProvider for ActiveMetricsProvider {
    async fn collect_metrics(&mut self) -> Result<SystemMetrics, MonitorError> {
        match self {
            ActiveMetricsProvider::Live(provider) => provider.collect_metrics().await,
            ActiveMetricsProvider::Synthetic(provider) => provider.collect_metrics().await,
            ActiveMetricsProvider::Host(provider) => provider.collect_metrics().await,
            #[cfg(test)]
            ActiveMetricsProvider::Mock(provider) => provider.collect_metrics().await,
        }
    }
}

pub struct LiveMetricsProvider {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl LiveMetricsProvider {
    pub fn new(
        endpoint: &str,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MonitorError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            auth_token: auth_token.filter(|token| !token.trim().is_empty()),
        })
    }
}

impl MetricsProvider for LiveMetricsProvider {
    async fn collect_metrics(&mut self) -> Result<SystemMetrics, MonitorError> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Status(status));
        }

        let payload: MetricsPayload = response.json().await?;
        Ok(payload.stamped(Utc::now().timestamp_millis()))
    }
}

/// Bounded pseudo-random samples for environments without a metrics backend.
pub struct SyntheticMetricsProvider {
    rng: StdRng,
}

impl SyntheticMetricsProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SyntheticMetricsProvider {
    async fn collect_metrics(&mut self) -> Result<SystemMetrics, MonitorError> {
        let rng = &mut self.rng;
        let total = 8 * GIB;
        let used = rng.gen_range(2 * GIB..=6 * GIB);

        Ok(SystemMetrics {
            timestamp: Utc::now().timestamp_millis(),
            cpu: CpuMetrics {
                usage: rng.gen_range(20.0..50.0),
                cores: 8,
                load_average: [
                    rng.gen_range(0.0..2.0),
                    rng.gen_range(0.0..2.0),
                    rng.gen_range(0.0..2.0),
                ],
            },
            memory: MemoryMetrics::from_used(total, used),
            database: DatabaseMetrics {
                connections: rng.gen_range(5..=25),
                size: rng.gen_range(100 * MIB..=120 * MIB),
                queries: rng.gen_range(100..=1000),
            },
            network: NetworkMetrics {
                inbound: rng.gen_range(0..=MIB),
                outbound: rng.gen_range(0..=MIB),
            },
        })
    }
}

pub struct HostMetricsProvider {
    system: System,
}

impl HostMetricsProvider {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl Default for HostMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for HostMetricsProvider {
    async fn collect_metrics(&mut self) -> Result<SystemMetrics, MonitorError> {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.system.refresh_networks_list();
        self.system.refresh_networks();

        let load = self.system.load_average();
        let (inbound, outbound) = self
            .system
            .networks()
            .iter()
            .fold((0u64, 0u64), |(inbound, outbound), (_, data)| {
                (
                    inbound.saturating_add(data.received()),
                    outbound.saturating_add(data.transmitted()),
                )
            });

        Ok(SystemMetrics {
            timestamp: Utc::now().timestamp_millis(),
            cpu: CpuMetrics {
                usage: f64::from(self.system.global_cpu_info().cpu_usage()),
                cores: u32::try_from(self.system.cpus().len()).unwrap_or(u32::MAX),
                load_average: [load.one, load.five, load.fifteen],
            },
            memory: MemoryMetrics::from_used(self.system.total_memory(), self.system.used_memory()),
            database: DatabaseMetrics::default(),
            network: NetworkMetrics { inbound, outbound },
        })
    }
}

#[cfg(test)]
pub struct MockMetricsProvider {
    sequence: std::collections::VecDeque<SystemMetrics>,
}

#[cfg(test)]
impl MockMetricsProvider {
    pub fn new(sequence: Vec<SystemMetrics>) -> Self {
        Self {
            sequence: sequence.into(),
        }
    }
}

#[cfg(test)]
impl MetricsProvider for MockMetricsProvider {
    async fn collect_metrics(&mut self) -> Result<SystemMetrics, MonitorError> {
        self.sequence.pop_front().ok_or(MonitorError::MockExhausted)
    }
}
