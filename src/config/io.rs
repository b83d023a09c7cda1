use std::path::Path;

use super::{schema::Config, validate::ConfigError};

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    parse_config(&raw, path_str)
}

pub(super) fn parse_config(raw: &str, path: String) -> Result<Config, ConfigError> {
    let config: Config =
        toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::{ConfigError, SourceMode};

    use super::{load_config, parse_config};

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("", "inline".to_string()).expect("defaults should validate");

        assert_eq!(config.monitor.refresh_interval_ms, 5000);
        assert_eq!(config.monitor.max_history, 100);
        assert_eq!(config.source.mode, SourceMode::Synthetic);
        assert!(config.source.auth_token.is_none());
        assert!(config.storage.enabled);
        assert_eq!(config.alerts.cpu_critical, 85.0);
        assert_eq!(config.alerts.memory_warning, 75.0);
    }

    #[test]
    fn reads_sections_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
[monitor]
refresh_interval_ms = 1000
max_history = 20

[source]
mode = "live"
endpoint = "https://metrics.internal/api/system/metrics"
auth_token = "secret"

[storage]
enabled = false
"#
        )
        .expect("write config");

        let config = load_config(file.path()).expect("config should load");
        assert_eq!(config.monitor.refresh_interval_ms, 1000);
        assert_eq!(config.monitor.max_history, 20);
        assert_eq!(config.source.mode, SourceMode::Live);
        assert_eq!(config.source.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.source.timeout_secs, 10);
        assert!(!config.storage.enabled);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load_config(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn unknown_source_mode_is_parse_error() {
        let result = parse_config("[source]\nmode = \"carrier-pigeon\"\n", "inline".to_string());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
