use super::schema::{AlertThresholds, MonitorSection, SourceConfig, SourceMode, StorageConfig};

pub(super) fn default_refresh_interval_ms() -> u64 {
    5000
}

pub(super) fn default_max_history() -> usize {
    100
}

pub(super) fn default_source_mode() -> SourceMode {
    SourceMode::Synthetic
}

pub(super) fn default_source_endpoint() -> String {
    "http://127.0.0.1:3000/api/system/metrics".to_string()
}

pub(super) fn default_source_timeout_secs() -> u64 {
    10
}

pub(super) fn default_storage_enabled() -> bool {
    true
}

pub(super) fn default_storage_path() -> String {
    "data/monitoring".to_string()
}

pub(super) fn default_maintenance_interval_secs() -> u64 {
    3600
}

pub(super) fn default_cpu_warning() -> f64 {
    70.0
}

pub(super) fn default_cpu_critical() -> f64 {
    85.0
}

pub(super) fn default_memory_warning() -> f64 {
    75.0
}

pub(super) fn default_memory_critical() -> f64 {
    90.0
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            max_history: default_max_history(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: default_source_mode(),
            endpoint: default_source_endpoint(),
            auth_token: None,
            timeout_secs: default_source_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_storage_enabled(),
            path: default_storage_path(),
            maintenance_interval_secs: default_maintenance_interval_secs(),
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu_warning: default_cpu_warning(),
            cpu_critical: default_cpu_critical(),
            memory_warning: default_memory_warning(),
            memory_critical: default_memory_critical(),
        }
    }
}
