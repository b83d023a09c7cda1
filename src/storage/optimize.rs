use crate::monitor::SystemMetrics;

pub const MAX_STORED_METRICS: usize = 1000;
pub const FULL_RESOLUTION_METRICS: usize = 500;
pub const DOWNSAMPLE_INTERVAL_MS: i64 = 60 * 60 * 1000;

/// Bounds a history for persistence. Lists up to [`MAX_STORED_METRICS`] pass
/// through untouched; longer ones keep the newest [`FULL_RESOLUTION_METRICS`]
/// samples and thin the older part to one sample per hour.
pub fn optimize_storage(metrics: Vec<SystemMetrics>) -> Vec<SystemMetrics> {
    if metrics.len() <= MAX_STORED_METRICS {
        return metrics;
    }

    let split = metrics.len() - FULL_RESOLUTION_METRICS;
    let mut metrics = metrics;
    let recent = metrics.split_off(split);

    let mut optimized: Vec<SystemMetrics> = Vec::with_capacity(MAX_STORED_METRICS);
    let mut last_kept: Option<i64> = None;
    for sample in metrics {
        let keep = match last_kept {
            None => true,
            Some(previous) => sample.timestamp - previous >= DOWNSAMPLE_INTERVAL_MS,
        };
        if keep {
            last_kept = Some(sample.timestamp);
            optimized.push(sample);
        }
    }

    optimized.extend(recent);
    if optimized.len() > MAX_STORED_METRICS {
        let excess = optimized.len() - MAX_STORED_METRICS;
        optimized.drain(..excess);
    }

    optimized
}
