#[cfg(feature = "polars")]
pub mod polars_io {
    use crate::{
        io::samples::{validate_order, SampleColumn},
        signal::Sample,
    };
    use anyhow::{anyhow, Result};
    use polars::prelude::*;

    fn column_values(df: &DataFrame, column: SampleColumn) -> Result<Vec<f64>> {
        let name = df
            .get_column_names()
            .into_iter()
            .find(|name| column.matches(name.as_str()))
            .ok_or_else(|| anyhow!("missing {} column", column))?
            .to_string();
        let series = df.column(&name)?.cast(&DataType::Float64)?;
        series
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(i, v)| v.ok_or_else(|| anyhow!("row {}: empty {} cell", i + 1, column)))
            .collect()
    }

    /// Load the four sample columns of a CSV through a polars DataFrame.
    pub fn load_samples(path: &str) -> Result<Vec<Sample>> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?;
        let time = column_values(&df, SampleColumn::Time)?;
        let voltage = column_values(&df, SampleColumn::Voltage)?;
        let frequency = column_values(&df, SampleColumn::Frequency)?;
        let duration = column_values(&df, SampleColumn::Duration)?;
        let samples: Vec<Sample> = time
            .iter()
            .zip(&voltage)
            .zip(&frequency)
            .zip(&duration)
            .map(|(((t, v), f), d)| Sample::new(*t, *v, *f, *d))
            .collect();
        validate_order(&samples)?;
        Ok(samples)
    }
}
