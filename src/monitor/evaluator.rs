use uuid::Uuid;

use crate::config::AlertThresholds;

use super::model::{AlertCondition, AlertSeverity, PerformanceAlert, SystemMetrics};

pub const MAX_ALERTS: usize = 10;

/// Applies the threshold policy to one sample. Each metric yields at most one
/// alert, critical taking precedence over warning.
pub fn evaluate_sample(
    metrics: &SystemMetrics,
    thresholds: &AlertThresholds,
    now_ms: i64,
) -> Vec<PerformanceAlert> {
    let mut alerts = Vec::new();

    if let Some((severity, threshold)) = classify(
        metrics.cpu.usage,
        thresholds.cpu_warning,
        thresholds.cpu_critical,
    ) {
        alerts.push(build_alert("cpu", "CPU", metrics.cpu.usage, threshold, severity, now_ms));
    }

    if let Some((severity, threshold)) = classify(
        metrics.memory.usage,
        thresholds.memory_warning,
        thresholds.memory_critical,
    ) {
        alerts.push(build_alert(
            "memory",
            "Memory",
            metrics.memory.usage,
            threshold,
            severity,
            now_ms,
        ));
    }

    alerts
}

/// Appends new alerts and drops the oldest beyond [`MAX_ALERTS`].
pub fn retain_recent(alerts: &mut Vec<PerformanceAlert>, new_alerts: Vec<PerformanceAlert>) {
    alerts.extend(new_alerts);
    if alerts.len() > MAX_ALERTS {
        let excess = alerts.len() - MAX_ALERTS;
        alerts.drain(..excess);
    }
}

fn classify(value: f64, warning: f64, critical: f64) -> Option<(AlertSeverity, f64)> {
    if value > critical {
        Some((AlertSeverity::Critical, critical))
    } else if value > warning {
        Some((AlertSeverity::Warning, warning))
    } else {
        None
    }
}

fn build_alert(
    metric: &str,
    label: &str,
    value: f64,
    threshold: f64,
    severity: AlertSeverity,
    now_ms: i64,
) -> PerformanceAlert {
    let message = match severity {
        AlertSeverity::Critical => format!("{label} usage is critically high ({value:.1}%)"),
        AlertSeverity::Warning => format!("{label} usage is high ({value:.1}%)"),
    };

    PerformanceAlert {
        id: Uuid::new_v4().to_string(),
        metric: metric.to_string(),
        threshold,
        condition: AlertCondition::Above,
        message,
        severity,
        triggered_at: now_ms,
    }
}
