use crate::{detectors::Analysis, signal::Sample};
use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rejections raised while turning a table into a sample sequence.
///
/// Rows are 1-based and count data rows only (the header is not a row).
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing {0} column")]
    MissingColumn(SampleColumn),
    #[error("row {row}: {column} value {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        column: SampleColumn,
        value: String,
    },
    #[error("row {row}: time {time} is not finite")]
    NonFiniteTime { row: usize, time: f64 },
    #[error("row {row}: time {time} does not increase past {previous}")]
    NonIncreasingTime { row: usize, previous: f64, time: f64 },
    #[error("table contains no samples")]
    Empty,
}

/// The four measured columns of a sample table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleColumn {
    Time,
    Voltage,
    Frequency,
    Duration,
}

impl SampleColumn {
    pub const ALL: [SampleColumn; 4] = [
        SampleColumn::Time,
        SampleColumn::Voltage,
        SampleColumn::Frequency,
        SampleColumn::Duration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SampleColumn::Time => "time",
            SampleColumn::Voltage => "voltage",
            SampleColumn::Frequency => "frequency",
            SampleColumn::Duration => "duration",
        }
    }

    /// Accepted header spellings, including the clinic spreadsheet headers.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            SampleColumn::Time => &["time", "time_s", "时间（秒）"],
            SampleColumn::Voltage => &["voltage", "voltage_uv", "电压（μV）", "电压（µV）"],
            SampleColumn::Frequency => &["frequency", "frequency_hz", "freq", "频率（Hz）"],
            SampleColumn::Duration => &["duration", "duration_s", "持续时间（秒）"],
        }
    }

    pub fn matches(self, header: &str) -> bool {
        let header = header.trim();
        self.aliases()
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(header))
    }
}

impl std::fmt::Display for SampleColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Header row plus validated samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleTable {
    pub headers: Vec<String>,
    pub samples: Vec<Sample>,
}

pub fn parse_sample_table<R: Read>(input: R) -> Result<SampleTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let idx = [
        locate_column(&headers, SampleColumn::Time)?,
        locate_column(&headers, SampleColumn::Voltage)?,
        locate_column(&headers, SampleColumn::Frequency)?,
        locate_column(&headers, SampleColumn::Duration)?,
    ];

    let mut samples = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let mut values = [0.0; 4];
        for (slot, (column, col_idx)) in SampleColumn::ALL.iter().zip(idx).enumerate() {
            values[slot] = parse_cell(&record, col_idx, *column, row)?;
        }
        samples.push(Sample::new(values[0], values[1], values[2], values[3]));
    }
    validate_order(&samples)?;

    Ok(SampleTable {
        headers: headers.iter().map(str::to_string).collect(),
        samples,
    })
}

pub fn parse_samples_csv<R: Read>(input: R) -> Result<Vec<Sample>, IngestError> {
    Ok(parse_sample_table(input)?.samples)
}

pub fn read_sample_table(path: &Path) -> Result<SampleTable, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sample_table(file)
}

/// Read and validate a sample CSV from disk.
pub fn read_samples_csv(path: &Path) -> Result<Vec<Sample>, IngestError> {
    Ok(read_sample_table(path)?.samples)
}

/// Reject empty sequences, non-finite times, and any time that fails to increase.
pub fn validate_order(samples: &[Sample]) -> Result<(), IngestError> {
    if samples.is_empty() {
        return Err(IngestError::Empty);
    }
    if let Some((i, sample)) = samples
        .iter()
        .enumerate()
        .find(|(_, sample)| !sample.time.is_finite())
    {
        return Err(IngestError::NonFiniteTime {
            row: i + 1,
            time: sample.time,
        });
    }
    for (i, pair) in samples.windows(2).enumerate() {
        if pair[1].time <= pair[0].time {
            return Err(IngestError::NonIncreasingTime {
                row: i + 2,
                previous: pair[0].time,
                time: pair[1].time,
            });
        }
    }
    Ok(())
}

/// Write the analysis table: the input columns plus the selected current.
pub fn write_analysis_csv<W: Write>(output: W, analysis: &Analysis) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(output);
    writer.write_record([
        "time",
        "voltage",
        "frequency",
        "duration",
        "current_ma",
    ])?;
    for annotated in &analysis.samples {
        let s = annotated.sample;
        writer.write_record(&[
            s.time.to_string(),
            s.voltage.to_string(),
            s.frequency.to_string(),
            s.duration.to_string(),
            annotated.current_ma().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn locate_column(headers: &StringRecord, column: SampleColumn) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|name| column.matches(name))
        .ok_or(IngestError::MissingColumn(column))
}

fn parse_cell(
    record: &StringRecord,
    idx: usize,
    column: SampleColumn,
    row: usize,
) -> Result<f64, IngestError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>().map_err(|_| IngestError::InvalidNumber {
        row,
        column,
        value: raw.to_string(),
    })
}
