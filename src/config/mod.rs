mod defaults;
mod io;
mod schema;
mod validate;

pub use io::load_config;
pub use schema::{AlertThresholds, Config, MonitorSection, SourceConfig, SourceMode, StorageConfig};
pub use validate::ConfigError;
