use std::path::Path;

use chrono::{Duration as ChronoDuration, Utc};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::monitor::{ChartConfig, PerformanceAlert, SystemMetrics};

mod model;
mod optimize;

pub use model::StorageStats;
pub use optimize::{MAX_STORED_METRICS, optimize_storage};

use model::StoredRecord;

pub const METRICS_KEY: &str = "system_metrics_history";
pub const CONFIG_KEY: &str = "monitoring_config";
pub const ALERTS_KEY: &str = "performance_alerts";
pub const LAST_UPDATED_KEY: &str = "metrics_last_updated";
const PROBE_KEY: &str = "__storage_probe__";

const TREE_NAME: &str = "monitoring";

fn metrics_retention() -> ChronoDuration {
    ChronoDuration::days(7)
}

fn alerts_retention() -> ChronoDuration {
    ChronoDuration::hours(24)
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key-value store error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable copy of the monitoring state in a sled tree.
///
/// Every public operation is fail-soft: errors are logged with the affected
/// key and the operation falls back to an empty or absent value.
#[derive(Clone)]
pub struct MetricsStorage {
    tree: sled::Tree,
}

impl MetricsStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, StorageError> {
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { tree })
    }

    pub fn is_available(&self) -> bool {
        let probe = self
            .tree
            .insert(PROBE_KEY, b"probe".as_slice())
            .and_then(|_| self.tree.remove(PROBE_KEY));

        match probe {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(target: "storage", error = %error, "storage_unavailable");
                false
            }
        }
    }

    pub fn save_metrics(&self, metrics: &[SystemMetrics]) {
        self.save_metrics_at(metrics, now_ms());
    }

    pub fn save_metrics_at(&self, metrics: &[SystemMetrics], now_ms: i64) {
        self.write_logged(METRICS_KEY, metrics, now_ms);
    }

    pub fn load_metrics(&self) -> Vec<SystemMetrics> {
        self.load_metrics_at(now_ms())
    }

    pub fn load_metrics_at(&self, now_ms: i64) -> Vec<SystemMetrics> {
        self.read_expiring(METRICS_KEY, now_ms, metrics_retention())
            .unwrap_or_default()
    }

    pub fn save_config(&self, config: &ChartConfig) {
        self.write_logged(CONFIG_KEY, config, now_ms());
    }

    pub fn load_config(&self) -> Option<ChartConfig> {
        self.read_logged::<ChartConfig>(CONFIG_KEY)
            .map(|record| record.data)
    }

    pub fn save_alerts(&self, alerts: &[PerformanceAlert]) {
        self.save_alerts_at(alerts, now_ms());
    }

    pub fn save_alerts_at(&self, alerts: &[PerformanceAlert], now_ms: i64) {
        self.write_logged(ALERTS_KEY, alerts, now_ms);
    }

    pub fn load_alerts(&self) -> Vec<PerformanceAlert> {
        self.load_alerts_at(now_ms())
    }

    pub fn load_alerts_at(&self, now_ms: i64) -> Vec<PerformanceAlert> {
        let mut alerts: Vec<PerformanceAlert> = self
            .read_expiring(ALERTS_KEY, now_ms, alerts_retention())
            .unwrap_or_default();
        prune_stale_alerts(&mut alerts, now_ms);
        alerts
    }

    pub fn clear_alerts(&self) {
        self.remove_logged(ALERTS_KEY);
    }

    pub fn save_last_updated(&self, timestamp: i64) {
        self.write_logged(LAST_UPDATED_KEY, &timestamp, timestamp);
    }

    pub fn load_last_updated(&self) -> Option<i64> {
        self.read_logged::<i64>(LAST_UPDATED_KEY)
            .map(|record| record.data)
    }

    /// Drops the metrics record if it has expired and removes individual
    /// alerts older than the alert retention window.
    pub fn cleanup_old_data(&self) {
        self.cleanup_old_data_at(now_ms());
    }

    pub fn cleanup_old_data_at(&self, now_ms: i64) {
        let _ = self.read_expiring::<Vec<SystemMetrics>>(METRICS_KEY, now_ms, metrics_retention());

        let Some(mut record) = self.read_logged::<Vec<PerformanceAlert>>(ALERTS_KEY) else {
            return;
        };

        let removed = prune_stale_alerts(&mut record.data, now_ms);
        if removed == 0 {
            return;
        }

        tracing::info!(
            target: "storage",
            removed,
            kept = record.data.len(),
            "storage_alerts_pruned"
        );
        if record.data.is_empty() {
            self.remove_logged(ALERTS_KEY);
        } else {
            self.write_logged(ALERTS_KEY, &record.data, record.timestamp);
        }
    }

    pub fn clear_all(&self) {
        for key in [METRICS_KEY, CONFIG_KEY, ALERTS_KEY, LAST_UPDATED_KEY] {
            self.remove_logged(key);
        }
    }

    pub fn stats(&self) -> StorageStats {
        StorageStats {
            metrics_bytes: self.value_len(METRICS_KEY),
            config_bytes: self.value_len(CONFIG_KEY),
            alerts_bytes: self.value_len(ALERTS_KEY),
            last_updated_bytes: self.value_len(LAST_UPDATED_KEY),
        }
    }

    fn write_record<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        timestamp: i64,
    ) -> Result<(), StorageError> {
        let value = serde_json::to_vec(&StoredRecord::new(data, timestamp))?;
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn read_record<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<StoredRecord<T>>, StorageError> {
        let Some(value) = self.tree.get(key)? else {
            return Ok(None);
        };
        let record = serde_json::from_slice(&value)?;
        Ok(Some(record))
    }

    fn write_logged<T: Serialize + ?Sized>(&self, key: &str, data: &T, timestamp: i64) {
        if let Err(error) = self.write_record(key, data, timestamp) {
            tracing::warn!(target: "storage", key, error = %error, "storage_write_failed");
        }
    }

    fn read_logged<T: DeserializeOwned>(&self, key: &str) -> Option<StoredRecord<T>> {
        match self.read_record(key) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(target: "storage", key, error = %error, "storage_read_failed");
                None
            }
        }
    }

    fn read_expiring<T: DeserializeOwned>(
        &self,
        key: &str,
        now_ms: i64,
        retention: ChronoDuration,
    ) -> Option<T> {
        let record = self.read_logged::<T>(key)?;
        if record.is_expired(now_ms, retention.num_milliseconds()) {
            tracing::info!(
                target: "storage",
                key,
                saved_at = record.timestamp,
                "storage_record_expired"
            );
            self.remove_logged(key);
            return None;
        }
        Some(record.data)
    }

    fn remove_logged(&self, key: &str) {
        if let Err(error) = self.tree.remove(key) {
            tracing::warn!(target: "storage", key, error = %error, "storage_remove_failed");
        }
    }

    fn value_len(&self, key: &str) -> usize {
        match self.tree.get(key) {
            Ok(value) => value.map_or(0, |value| value.len()),
            Err(error) => {
                tracing::warn!(target: "storage", key, error = %error, "storage_read_failed");
                0
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&self, key: &str, value: &[u8]) {
        self.tree.insert(key, value).expect("raw insert");
    }

    #[cfg(test)]
    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.tree.contains_key(key).expect("contains key")
    }
}

/// Drops alerts triggered more than 24 hours before `now_ms` and returns how
/// many were removed.
pub fn prune_stale_alerts(alerts: &mut Vec<PerformanceAlert>, now_ms: i64) -> usize {
    let cutoff = now_ms - alerts_retention().num_milliseconds();
    let before = alerts.len();
    alerts.retain(|alert| alert.triggered_at >= cutoff);
    before - alerts.len()
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
