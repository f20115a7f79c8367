pub mod summary;

pub use summary::{summarize, AnalysisSummary, LevelCounts};
