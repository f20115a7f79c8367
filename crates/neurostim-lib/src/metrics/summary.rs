use crate::signal::{ActiveInterval, AnnotatedSample, CurrentLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub none: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl LevelCounts {
    pub fn record(&mut self, level: CurrentLevel) {
        match level {
            CurrentLevel::None => self.none += 1,
            CurrentLevel::Low => self.low += 1,
            CurrentLevel::Medium => self.medium += 1,
            CurrentLevel::High => self.high += 1,
        }
    }

    pub fn active(&self) -> usize {
        self.low + self.medium + self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub sample_count: usize,
    pub level_counts: LevelCounts,
    pub active_interval_count: usize,
    /// Sum of emitted interval spans (seconds).
    pub active_time_s: f64,
    /// Highest level over all samples, including a dropped trailing run.
    pub peak_level: CurrentLevel,
}

pub fn summarize(samples: &[AnnotatedSample], intervals: &[ActiveInterval]) -> AnalysisSummary {
    let mut level_counts = LevelCounts::default();
    for sample in samples {
        level_counts.record(sample.level);
    }
    let peak_level = samples.iter().map(|s| s.level).max().unwrap_or_default();
    AnalysisSummary {
        sample_count: samples.len(),
        level_counts,
        active_interval_count: intervals.len(),
        active_time_s: intervals.iter().map(ActiveInterval::span).sum(),
        peak_level,
    }
}
