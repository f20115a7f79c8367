use crate::{
    detectors::{current::classify_samples, intervals::annotate_with, AnnotateOptions},
    metrics::summary::{summarize, AnalysisSummary},
    signal::{ActiveInterval, AnnotatedSample, Sample},
};
use serde::{Deserialize, Serialize};

/// Classified samples, their intervals, and a summary from one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub samples: Vec<AnnotatedSample>,
    pub intervals: Vec<ActiveInterval>,
    pub summary: AnalysisSummary,
}

impl Analysis {
    /// `[time, voltage]` points for the signal trace.
    pub fn voltage_points(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|s| [s.sample.time, s.sample.voltage])
            .collect()
    }

    /// `[time, mA]` points for the regulation trace.
    pub fn current_points(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|s| [s.sample.time, s.current_ma()])
            .collect()
    }
}

/// Classify, then coalesce, then summarize. Input must be time-ordered.
pub fn analyze(samples: &[Sample], options: AnnotateOptions) -> Analysis {
    let samples = classify_samples(samples);
    let intervals = annotate_with(&samples, options);
    let summary = summarize(&samples, &intervals);
    Analysis {
        samples,
        intervals,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::CurrentLevel;

    fn fixture() -> Vec<Sample> {
        vec![
            Sample::new(0.0, 10.0, 5.0, 0.1),
            Sample::new(0.1, 60.0, 5.0, 0.1),
            Sample::new(0.2, 150.0, 5.0, 0.1),
            Sample::new(0.3, -20.0, 5.0, 0.1),
            Sample::new(0.4, 220.0, 80.0, 0.1),
        ]
    }

    #[test]
    fn pipeline_matches_reference_scan() {
        let analysis = analyze(&fixture(), AnnotateOptions::default());
        assert_eq!(analysis.samples.len(), 5);
        assert_eq!(analysis.intervals.len(), 1);
        let interval = analysis.intervals[0];
        assert_eq!(interval.start_time, 0.1);
        assert_eq!(interval.end_time, 0.3);
        assert_eq!(interval.peak_level, CurrentLevel::Medium);
        assert_eq!(analysis.summary.peak_level, CurrentLevel::High);
        assert_eq!(analysis.summary.level_counts.high, 1);
    }

    #[test]
    fn aligned_series() {
        let analysis = analyze(&fixture(), AnnotateOptions::default());
        let v = analysis.voltage_points();
        let c = analysis.current_points();
        assert_eq!(v.len(), c.len());
        for (a, b) in v.iter().zip(&c) {
            assert_eq!(a[0], b[0]);
        }
        assert_eq!(c[2][1], 1.5);
        assert_eq!(c[4][1], 2.0);
    }

    #[test]
    fn flush_adds_trailing_interval() {
        let options = AnnotateOptions {
            flush_trailing: true,
        };
        let analysis = analyze(&fixture(), options);
        assert_eq!(analysis.intervals.len(), 2);
        assert_eq!(analysis.summary.active_interval_count, 2);
    }
}
