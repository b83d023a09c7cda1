use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::METRIC_PATHS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartTimeRange {
    pub value: u32,
    pub unit: TimeUnit,
}

impl ChartTimeRange {
    pub fn as_duration(&self) -> ChronoDuration {
        let value = i64::from(self.value);
        match self.unit {
            TimeUnit::Minutes => ChronoDuration::minutes(value),
            TimeUnit::Hours => ChronoDuration::hours(value),
            TimeUnit::Days => ChronoDuration::days(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub metrics: Vec<String>,
    pub time_range: ChartTimeRange,
    pub refresh_interval: u64,
}

/// Partial update applied field by field over the current [`ChartConfig`].
#[derive(Debug, Clone, Default)]
pub struct ChartConfigPatch {
    pub chart_type: Option<ChartType>,
    pub metrics: Option<Vec<String>>,
    pub time_range: Option<ChartTimeRange>,
    pub refresh_interval: Option<u64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigUpdateError {
    #[error("refresh interval must be greater than 0")]
    ZeroRefreshInterval,
    #[error("time range value must be greater than 0")]
    ZeroTimeRange,
    #[error("at least one metric must be selected")]
    NoMetrics,
    #[error("unknown metric path: {0}")]
    UnknownMetric(String),
}

impl ChartConfig {
    pub fn with_refresh_interval(refresh_interval: u64) -> Self {
        Self {
            chart_type: ChartType::Line,
            metrics: vec!["cpu.usage".to_string(), "memory.usage".to_string()],
            time_range: ChartTimeRange {
                value: 1,
                unit: TimeUnit::Hours,
            },
            refresh_interval,
        }
    }

    pub fn merged(&self, patch: ChartConfigPatch) -> Result<Self, ConfigUpdateError> {
        let merged = Self {
            chart_type: patch.chart_type.unwrap_or(self.chart_type),
            metrics: patch.metrics.unwrap_or_else(|| self.metrics.clone()),
            time_range: patch.time_range.unwrap_or(self.time_range),
            refresh_interval: patch.refresh_interval.unwrap_or(self.refresh_interval),
        };
        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<(), ConfigUpdateError> {
        if self.refresh_interval == 0 {
            return Err(ConfigUpdateError::ZeroRefreshInterval);
        }
        if self.time_range.value == 0 {
            return Err(ConfigUpdateError::ZeroTimeRange);
        }
        if self.metrics.is_empty() {
            return Err(ConfigUpdateError::NoMetrics);
        }
        if let Some(unknown) = self
            .metrics
            .iter()
            .find(|path| !METRIC_PATHS.contains(&path.as_str()))
        {
            return Err(ConfigUpdateError::UnknownMetric(unknown.clone()));
        }
        Ok(())
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::with_refresh_interval(5000)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::{
        ChartConfig, ChartConfigPatch, ChartTimeRange, ChartType, ConfigUpdateError, TimeUnit,
    };

    #[test]
    fn merge_overwrites_only_given_fields() {
        let base = ChartConfig::default();
        let merged = base
            .merged(ChartConfigPatch {
                chart_type: Some(ChartType::Area),
                refresh_interval: Some(1000),
                ..Default::default()
            })
            .expect("patch should be valid");

        assert_eq!(merged.chart_type, ChartType::Area);
        assert_eq!(merged.refresh_interval, 1000);
        assert_eq!(merged.metrics, base.metrics);
        assert_eq!(merged.time_range, base.time_range);
    }

    #[test]
    fn merge_rejects_invalid_values() {
        let base = ChartConfig::default();

        let zero_interval = base.merged(ChartConfigPatch {
            refresh_interval: Some(0),
            ..Default::default()
        });
        assert_eq!(zero_interval, Err(ConfigUpdateError::ZeroRefreshInterval));

        let unknown = base.merged(ChartConfigPatch {
            metrics: Some(vec!["cpu.usage".to_string(), "gpu.usage".to_string()]),
            ..Default::default()
        });
        assert_eq!(
            unknown,
            Err(ConfigUpdateError::UnknownMetric("gpu.usage".to_string()))
        );

        let empty = base.merged(ChartConfigPatch {
            metrics: Some(Vec::new()),
            ..Default::default()
        });
        assert_eq!(empty, Err(ConfigUpdateError::NoMetrics));
    }

    #[test]
    fn serializes_with_type_key() {
        let json = serde_json::to_value(ChartConfig::default()).expect("serialize");
        assert_eq!(json["type"], "line");
        assert_eq!(json["timeRange"]["unit"], "hours");
        assert_eq!(json["refreshInterval"], 5000);
    }

    #[test]
    fn time_range_converts_to_duration() {
        let range = ChartTimeRange {
            value: 3,
            unit: TimeUnit::Days,
        };
        assert_eq!(range.as_duration(), ChronoDuration::days(3));
    }
}
