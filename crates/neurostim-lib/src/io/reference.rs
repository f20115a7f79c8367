use crate::{
    io::samples::{read_sample_table, IngestError, SampleTable},
    signal::Sample,
};
use once_cell::unsync::OnceCell;
use std::path::{Path, PathBuf};

/// Owned handle to the reference sample table showing the expected layout.
///
/// The file is read on first access and kept for the lifetime of the
/// handle; a failed read is not cached, so a later call retries.
#[derive(Debug)]
pub struct ReferenceTable {
    path: PathBuf,
    table: OnceCell<SampleTable>,
}

impl ReferenceTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn table(&self) -> Result<&SampleTable, IngestError> {
        self.table.get_or_try_init(|| read_sample_table(&self.path))
    }

    pub fn headers(&self) -> Result<&[String], IngestError> {
        Ok(&self.table()?.headers)
    }

    /// First `rows` samples, or all of them when the table is shorter.
    pub fn head(&self, rows: usize) -> Result<&[Sample], IngestError> {
        let samples = &self.table()?.samples;
        Ok(&samples[..rows.min(samples.len())])
    }
}
