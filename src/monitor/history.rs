use std::collections::VecDeque;

use chrono::Duration as ChronoDuration;

use super::model::{HistoricalData, SystemMetrics};

/// Rolling in-memory buffer of the most recent samples, oldest first.
#[derive(Debug)]
pub struct MetricHistory {
    samples: VecDeque<SystemMetrics>,
    capacity: usize,
}

impl MetricHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Seeds the buffer from persisted samples, keeping only the newest ones.
    pub fn restore(capacity: usize, persisted: Vec<SystemMetrics>) -> Self {
        let mut history = Self::with_capacity(capacity);
        let skip = persisted.len().saturating_sub(history.capacity);
        history.samples.extend(persisted.into_iter().skip(skip));
        history
    }

    pub fn push(&mut self, sample: SystemMetrics) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn to_vec(&self) -> Vec<SystemMetrics> {
        self.samples.iter().cloned().collect()
    }

    pub fn historical_data(&self) -> HistoricalData {
        HistoricalData::from_metrics(self.to_vec())
    }

    pub fn latest_window(&self, window: ChronoDuration, now_ms: i64) -> Vec<SystemMetrics> {
        let cutoff = now_ms - window.num_milliseconds().max(1);

        self.samples
            .iter()
            .filter(|sample| sample.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemMetrics> {
        self.samples.iter()
    }
}
