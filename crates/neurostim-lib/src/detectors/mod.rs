pub mod current;
pub mod intervals;
pub mod pipeline;

pub use current::{classify, classify_sample, classify_samples};
pub use intervals::{annotate, annotate_with, AnnotateOptions, IntervalScanner};
pub use pipeline::{analyze, Analysis};
