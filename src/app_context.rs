use crate::{
    config::Config,
    monitor::{ActiveMetricsProvider, MonitorController, MonitorError, MonitorSettings},
    storage::MetricsStorage,
};

/// Everything a running daemon shares: configuration, the durable store and
/// the monitor controller that owns the live state.
pub struct AppContext {
    pub config: Config,
    pub storage: Option<MetricsStorage>,
    pub monitor: MonitorController,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, MonitorError> {
        let storage = open_storage(&config);
        let provider = ActiveMetricsProvider::from_source(&config.source)?;
        let settings = MonitorSettings::from_config(&config);
        let monitor = MonitorController::new(provider, storage.clone(), settings);

        Ok(Self {
            config,
            storage,
            monitor,
        })
    }
}

fn open_storage(config: &Config) -> Option<MetricsStorage> {
    if !config.storage.enabled {
        tracing::info!(target: "storage", "storage_disabled");
        return None;
    }

    let storage = match MetricsStorage::open(&config.storage.path) {
        Ok(storage) => storage,
        Err(error) => {
            tracing::warn!(
                target: "storage",
                path = %config.storage.path,
                error = %error,
                "storage_open_failed running without persistence"
            );
            return None;
        }
    };

    if !storage.is_available() {
        tracing::warn!(
            target: "storage",
            path = %config.storage.path,
            "storage_probe_failed running without persistence"
        );
        return None;
    }

    Some(storage)
}
