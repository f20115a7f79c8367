//! Coalesce consecutive active samples into shaded intervals.
//!
//! The scan keeps a single open run at a time. A run opens on the first
//! active sample, tracks the highest level seen, and closes on the next
//! `None` sample, whose time becomes the interval end. A run still open
//! when the input ends is dropped unless [`AnnotateOptions::flush_trailing`]
//! is set.

use crate::signal::{ActiveInterval, AnnotatedSample, CurrentLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateOptions {
    /// Emit a run that reaches the final sample, ending at that sample's time.
    pub flush_trailing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    Closed,
    Open { start: f64, peak: CurrentLevel },
}

/// Incremental interval builder; feed samples in time order.
#[derive(Debug, Clone)]
pub struct IntervalScanner {
    state: ScanState,
    last_time: Option<f64>,
    intervals: Vec<ActiveInterval>,
}

impl Default for IntervalScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Closed,
            last_time: None,
            intervals: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ScanState::Open { .. })
    }

    pub fn push(&mut self, time: f64, level: CurrentLevel) {
        self.state = match (self.state, level.is_active()) {
            (ScanState::Closed, true) => ScanState::Open {
                start: time,
                peak: level,
            },
            (ScanState::Open { start, peak }, true) => ScanState::Open {
                start,
                peak: peak.max(level),
            },
            (ScanState::Open { start, peak }, false) => {
                self.intervals.push(ActiveInterval {
                    start_time: start,
                    end_time: time,
                    peak_level: peak,
                });
                ScanState::Closed
            }
            (ScanState::Closed, false) => ScanState::Closed,
        };
        self.last_time = Some(time);
    }

    /// Finish the scan. An open run is emitted only with `flush_trailing`.
    pub fn finish(mut self, options: AnnotateOptions) -> Vec<ActiveInterval> {
        if let (ScanState::Open { start, peak }, Some(end)) = (self.state, self.last_time) {
            if options.flush_trailing {
                self.intervals.push(ActiveInterval {
                    start_time: start,
                    end_time: end,
                    peak_level: peak,
                });
            }
        }
        self.intervals
    }
}

/// Intervals over a time-ordered annotated sequence, trailing run dropped.
pub fn annotate(samples: &[AnnotatedSample]) -> Vec<ActiveInterval> {
    annotate_with(samples, AnnotateOptions::default())
}

pub fn annotate_with(
    samples: &[AnnotatedSample],
    options: AnnotateOptions,
) -> Vec<ActiveInterval> {
    let mut scanner = IntervalScanner::new();
    for sample in samples {
        scanner.push(sample.time(), sample.level);
    }
    scanner.finish(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Sample;
    use CurrentLevel::*;

    const FLUSH: AnnotateOptions = AnnotateOptions {
        flush_trailing: true,
    };

    fn seq(levels: &[CurrentLevel]) -> Vec<AnnotatedSample> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| AnnotatedSample {
                sample: Sample::new(i as f64, 0.0, 0.0, 0.0),
                level: *level,
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(annotate(&[]).is_empty());
        assert!(annotate_with(&[], FLUSH).is_empty());
    }

    #[test]
    fn trailing_run_is_dropped() {
        let samples = seq(&[None, Low, Medium, None, High]);
        let intervals = annotate(&samples);
        assert_eq!(
            intervals,
            vec![ActiveInterval {
                start_time: 1.0,
                end_time: 3.0,
                peak_level: Medium,
            }]
        );
    }

    #[test]
    fn flush_emits_trailing_run() {
        let samples = seq(&[None, Low, Medium, None, High]);
        let intervals = annotate_with(&samples, FLUSH);
        assert_eq!(intervals.len(), 2);
        assert_eq!(
            intervals[1],
            ActiveInterval {
                start_time: 4.0,
                end_time: 4.0,
                peak_level: High,
            }
        );
    }

    #[test]
    fn none_sample_never_inside_interval() {
        let samples = seq(&[Low, Low, None, High, Medium, None, None, Low, None]);
        let intervals = annotate(&samples);
        assert_eq!(intervals.len(), 3);
        for interval in &intervals {
            for s in samples
                .iter()
                .filter(|s| s.time() >= interval.start_time && s.time() < interval.end_time)
            {
                assert_ne!(s.level, None);
            }
        }
    }

    #[test]
    fn peak_is_max_inside_interval() {
        let samples = seq(&[Low, High, Medium, Low, None, Medium, Low, None]);
        let intervals = annotate(&samples);
        for interval in &intervals {
            let max = samples
                .iter()
                .filter(|s| s.time() >= interval.start_time && s.time() < interval.end_time)
                .map(|s| s.level)
                .max()
                .unwrap();
            assert_eq!(interval.peak_level, max);
        }
        assert_eq!(intervals[0].peak_level, High);
        assert_eq!(intervals[1].peak_level, Medium);
        assert_eq!(intervals[0].color().hex(), "#ff0000");
    }

    #[test]
    fn intervals_are_ordered_and_disjoint() {
        let samples = seq(&[Low, None, Medium, Medium, None, High, None, Low, None]);
        let intervals = annotate(&samples);
        for pair in intervals.windows(2) {
            assert!(pair[0].end_time <= pair[1].start_time);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let samples = seq(&[Low, Medium, None, High, None, Low]);
        assert_eq!(annotate(&samples), annotate(&samples));
    }

    #[test]
    fn scanner_reports_open_state() {
        let mut scanner = IntervalScanner::new();
        assert!(!scanner.is_open());
        scanner.push(0.0, Low);
        assert!(scanner.is_open());
        scanner.push(0.5, None);
        assert!(!scanner.is_open());
        assert_eq!(scanner.finish(AnnotateOptions::default()).len(), 1);
    }
}
