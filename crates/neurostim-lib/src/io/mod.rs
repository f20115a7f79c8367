pub mod csv;
pub mod reference;
pub mod samples;

pub use reference::ReferenceTable;
pub use samples::{
    parse_sample_table, parse_samples_csv, read_sample_table, read_samples_csv,
    write_analysis_csv, IngestError, SampleColumn, SampleTable,
};
