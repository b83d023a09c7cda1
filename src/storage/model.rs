use serde::{Deserialize, Serialize};

pub(super) const STORAGE_VERSION: &str = "1.0";

/// Envelope written under every storage key. `timestamp` is the save time in
/// milliseconds and drives expiration.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct StoredRecord<T> {
    pub timestamp: i64,
    pub data: T,
    pub version: String,
}

impl<T> StoredRecord<T> {
    pub(super) fn new(data: T, timestamp: i64) -> Self {
        Self {
            timestamp,
            data,
            version: STORAGE_VERSION.to_string(),
        }
    }

    pub(super) fn is_expired(&self, now_ms: i64, retention_ms: i64) -> bool {
        now_ms - self.timestamp > retention_ms
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub metrics_bytes: usize,
    pub config_bytes: usize,
    pub alerts_bytes: usize,
    pub last_updated_bytes: usize,
}

impl StorageStats {
    pub fn total_bytes(&self) -> usize {
        self.metrics_bytes + self.config_bytes + self.alerts_bytes + self.last_updated_bytes
    }
}
