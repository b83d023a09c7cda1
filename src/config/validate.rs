use thiserror::Error;

use super::schema::{Config, SourceMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.refresh_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "monitor.refresh_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.monitor.max_history == 0 {
            return Err(ConfigError::Validation(
                "monitor.max_history must be greater than 0".to_string(),
            ));
        }

        if self.source.mode == SourceMode::Live && self.source.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source.endpoint must not be empty when source.mode is live".to_string(),
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "source.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.storage.enabled && self.storage.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.path must not be empty when storage.enabled is true".to_string(),
            ));
        }
        if self.storage.maintenance_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "storage.maintenance_interval_secs must be greater than 0".to_string(),
            ));
        }

        validate_percentage("alerts.cpu_warning", self.alerts.cpu_warning)?;
        validate_percentage("alerts.cpu_critical", self.alerts.cpu_critical)?;
        validate_percentage("alerts.memory_warning", self.alerts.memory_warning)?;
        validate_percentage("alerts.memory_critical", self.alerts.memory_critical)?;
        if self.alerts.cpu_warning >= self.alerts.cpu_critical {
            return Err(ConfigError::Validation(
                "alerts.cpu_warning must be lower than alerts.cpu_critical".to_string(),
            ));
        }
        if self.alerts.memory_warning >= self.alerts.memory_critical {
            return Err(ConfigError::Validation(
                "alerts.memory_warning must be lower than alerts.memory_critical".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_percentage(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, ConfigError, SourceMode};

    fn assert_invalid(config: &Config, field: &str) {
        match config.validate() {
            Err(ConfigError::Validation(message)) => assert!(
                message.contains(field),
                "expected message about {field}, got {message}"
            ),
            other => panic!("expected validation error for {field}, got {other:?}"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_intervals() {
        let mut config = Config::default();
        config.monitor.refresh_interval_ms = 0;
        assert_invalid(&config, "monitor.refresh_interval_ms");

        let mut config = Config::default();
        config.monitor.max_history = 0;
        assert_invalid(&config, "monitor.max_history");

        let mut config = Config::default();
        config.source.timeout_secs = 0;
        assert_invalid(&config, "source.timeout_secs");

        let mut config = Config::default();
        config.storage.maintenance_interval_secs = 0;
        assert_invalid(&config, "storage.maintenance_interval_secs");
    }

    #[test]
    fn live_mode_requires_endpoint() {
        let mut config = Config::default();
        config.source.mode = SourceMode::Live;
        config.source.endpoint = "  ".to_string();
        assert_invalid(&config, "source.endpoint");

        config.source.mode = SourceMode::Synthetic;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn enabled_storage_requires_path() {
        let mut config = Config::default();
        config.storage.path = String::new();
        assert_invalid(&config, "storage.path");

        config.storage.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn thresholds_must_be_ordered_percentages() {
        let mut config = Config::default();
        config.alerts.cpu_critical = 140.0;
        assert_invalid(&config, "alerts.cpu_critical");

        let mut config = Config::default();
        config.alerts.memory_warning = f64::NAN;
        assert_invalid(&config, "alerts.memory_warning");

        let mut config = Config::default();
        config.alerts.cpu_warning = 90.0;
        assert_invalid(&config, "alerts.cpu_warning");

        let mut config = Config::default();
        config.alerts.memory_warning = 90.0;
        assert_invalid(&config, "alerts.memory_warning");
    }
}
