use anyhow::{ensure, Context, Result};
use csv::WriterBuilder;
use neurostim_lib::signal::Sample;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Synthetic recording layout, usually loaded from a TOML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationDesign {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_points")]
    pub points: usize,
    #[serde(default = "default_time_span")]
    pub time_span_s: f64,
    /// Half-open integer range in µV.
    #[serde(default = "default_voltage_range")]
    pub voltage_range: [i64; 2],
    /// Half-open integer range in Hz.
    #[serde(default = "default_frequency_range")]
    pub frequency_range: [i64; 2],
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_name() -> String {
    "simulated".into()
}
fn default_points() -> usize {
    21
}
fn default_time_span() -> f64 {
    2.0
}
fn default_voltage_range() -> [i64; 2] {
    [-250, 250]
}
fn default_frequency_range() -> [i64; 2] {
    [0, 100]
}

impl Default for SimulationDesign {
    fn default() -> Self {
        Self {
            name: default_name(),
            points: default_points(),
            time_span_s: default_time_span(),
            voltage_range: default_voltage_range(),
            frequency_range: default_frequency_range(),
            seed: None,
        }
    }
}

impl SimulationDesign {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.voltage_range[0] < self.voltage_range[1],
            "voltage_range must be increasing, got {:?}",
            self.voltage_range
        );
        ensure!(
            self.frequency_range[0] < self.frequency_range[1],
            "frequency_range must be increasing, got {:?}",
            self.frequency_range
        );
        ensure!(
            self.time_span_s.is_finite() && self.time_span_s > 0.0,
            "time_span_s must be positive, got {}",
            self.time_span_s
        );
        Ok(())
    }
}

pub fn read_design(path: &Path) -> Result<SimulationDesign> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read design {}", path.display()))?;
    let design: SimulationDesign =
        toml::from_str(&contents).with_context(|| format!("parsing design {}", path.display()))?;
    design.validate()?;
    Ok(design)
}

/// `points` evenly spaced values over `[0, span]`, endpoints included.
pub fn linspace(span: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = span / (n - 1) as f64;
            (0..n).map(|i| i as f64 * step).collect()
        }
    }
}

/// Generate samples for a design. Without a seed the output is random per call.
pub fn simulate(design: &SimulationDesign) -> Result<Vec<Sample>> {
    design.validate()?;
    let mut rng = match design.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let [v_lo, v_hi] = design.voltage_range;
    let [f_lo, f_hi] = design.frequency_range;
    let samples: Vec<Sample> = linspace(design.time_span_s, design.points)
        .into_iter()
        .map(|time| {
            let voltage = rng.gen_range(v_lo..v_hi) as f64;
            let frequency = rng.gen_range(f_lo..f_hi) as f64;
            let duration: f64 = rng.gen();
            Sample::new(time, voltage, frequency, duration)
        })
        .collect();
    log::debug!(
        "simulated {} samples for design {} (seed {:?})",
        samples.len(),
        design.name,
        design.seed
    );
    Ok(samples)
}

pub fn write_samples_csv(path: &Path, samples: &[Sample]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("creating samples {}", path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record(["time", "voltage", "frequency", "duration"])?;
    for sample in samples {
        writer.write_record(&[
            sample.time.to_string(),
            sample.voltage.to_string(),
            sample.frequency.to_string(),
            sample.duration.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
