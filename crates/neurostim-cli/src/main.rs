use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use neurostim_lib::{
    detectors::{analyze, classify, Analysis, AnnotateOptions},
    io::{parse_samples_csv, read_samples_csv, write_analysis_csv, ReferenceTable, SampleColumn},
    plot::{figure_from_analysis, Figure, PlotBackend, Style, YAxis},
    signal::{CurrentLevel, Sample},
};
use neurostim_sim::{read_design, simulate, write_samples_csv, SimulationDesign};
use plotters::prelude::*;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter},
    ops::Range,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "neurostim",
    version,
    about = "EEG current-regulation analysis tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the current level for a single measurement
    Classify {
        #[arg(long, allow_negative_numbers = true)]
        voltage: f64,
        #[arg(long, allow_negative_numbers = true)]
        frequency: f64,
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,
    },
    /// Classify a sample CSV (stdin or --input) and print intervals + summary as JSON
    Analyze {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Also report an active run that reaches the last sample
        #[arg(long)]
        flush_trailing: bool,
    },
    /// Write the sample table with its current column appended
    Export {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        flush_trailing: bool,
    },
    /// Render voltage, current and shaded intervals to a PNG via plotters
    Plot {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        flush_trailing: bool,
        #[arg(long, default_value_t = 4096)]
        max_points: usize,
    },
    /// Generate a synthetic sample table
    Simulate {
        /// TOML design; defaults apply when omitted
        #[arg(long)]
        design: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        points: Option<usize>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Show the expected upload layout from a reference table
    Format {
        #[arg(long)]
        reference: PathBuf,
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
}

#[derive(Serialize)]
struct ClassifyOutput {
    level: CurrentLevel,
    current_ma: f64,
    color: String,
}

#[derive(Serialize)]
struct FormatOutput<'a> {
    reference: &'a Path,
    expected_columns: Vec<&'static str>,
    headers: &'a [String],
    rows: &'a [Sample],
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Classify {
            voltage,
            frequency,
            duration,
        } => cmd_classify(voltage, frequency, duration)?,
        Commands::Analyze {
            input,
            flush_trailing,
        } => cmd_analyze(input.as_deref(), options(flush_trailing))?,
        Commands::Export {
            input,
            out,
            flush_trailing,
        } => cmd_export(&input, &out, options(flush_trailing))?,
        Commands::Plot {
            input,
            out,
            flush_trailing,
            max_points,
        } => cmd_plot(&input, &out, options(flush_trailing), max_points)?,
        Commands::Simulate {
            design,
            seed,
            points,
            out,
        } => cmd_simulate(design.as_deref(), seed, points, &out)?,
        Commands::Format { reference, rows } => cmd_format(&reference, rows)?,
    }
    Ok(())
}

fn options(flush_trailing: bool) -> AnnotateOptions {
    AnnotateOptions { flush_trailing }
}

fn read_samples(input: Option<&Path>) -> Result<Vec<Sample>> {
    match input {
        Some(path) => read_samples_csv(path).with_context(|| format!("loading {}", path.display())),
        None => parse_samples_csv(io::stdin().lock()).context("loading samples from stdin"),
    }
}

fn run_analysis(input: Option<&Path>, options: AnnotateOptions) -> Result<Analysis> {
    let samples = read_samples(input)?;
    let analysis = analyze(&samples, options);
    log::info!(
        "{} samples, {} active intervals, peak {:?}",
        analysis.summary.sample_count,
        analysis.summary.active_interval_count,
        analysis.summary.peak_level
    );
    Ok(analysis)
}

fn cmd_classify(voltage: f64, frequency: f64, duration: f64) -> Result<()> {
    let level = classify(voltage, frequency, duration);
    let out = ClassifyOutput {
        level,
        current_ma: level.milliamps(),
        color: level.color().hex(),
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn cmd_analyze(input: Option<&Path>, options: AnnotateOptions) -> Result<()> {
    let analysis = run_analysis(input, options)?;
    println!("{}", serde_json::to_string(&analysis)?);
    Ok(())
}

fn cmd_export(input: &Path, out: &Path, options: AnnotateOptions) -> Result<()> {
    let analysis = run_analysis(Some(input), options)?;
    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    write_analysis_csv(BufWriter::new(file), &analysis)?;
    log::info!("wrote analysis table to {}", out.display());
    Ok(())
}

fn cmd_plot(input: &Path, out: &Path, options: AnnotateOptions, max_points: usize) -> Result<()> {
    let analysis = run_analysis(Some(input), options)?;
    let fig = figure_from_analysis(&analysis, max_points.max(2));
    PngBackend::new(out).draw(&fig)?;
    log::info!("wrote figure to {}", out.display());
    Ok(())
}

fn cmd_simulate(
    design: Option<&Path>,
    seed: Option<u64>,
    points: Option<usize>,
    out: &Path,
) -> Result<()> {
    let mut design = match design {
        Some(path) => read_design(path)?,
        None => SimulationDesign::default(),
    };
    if seed.is_some() {
        design.seed = seed;
    }
    if let Some(points) = points {
        design.points = points;
    }
    let samples = simulate(&design)?;
    write_samples_csv(out, &samples)?;
    log::info!("wrote {} simulated samples to {}", samples.len(), out.display());
    Ok(())
}

fn cmd_format(reference: &Path, rows: usize) -> Result<()> {
    let table = ReferenceTable::new(reference);
    let headers = table
        .headers()
        .with_context(|| format!("reading reference {}", reference.display()))?;
    let out = FormatOutput {
        reference: table.path(),
        expected_columns: SampleColumn::ALL.iter().map(|c| c.name()).collect(),
        headers,
        rows: table.head(rows)?,
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>, fallback: Range<f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return fallback;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    min..max
}

/// Bitmap output through plotters.
struct PngBackend<'a> {
    path: &'a Path,
    size: (u32, u32),
}

impl<'a> PngBackend<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            size: (1000, 600),
        }
    }
}

impl PlotBackend for PngBackend<'_> {
    fn draw(&mut self, fig: &Figure) -> Result<()> {
        draw_plotters_figure(self.path, self.size, fig)
    }
}

fn rgb(color: neurostim_lib::signal::Rgb) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

fn line_style(style: &Style) -> ShapeStyle {
    rgb(style.color).stroke_width(style.width.max(1))
}

fn draw_plotters_figure(path: &Path, size: (u32, u32), fig: &Figure) -> Result<()> {
    let backend = BitMapBackend::new(path, size);
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let (chart_area, note_area) = root.split_vertically(size.1.saturating_sub(40));

    let x_range = padded_range(
        fig.lines().flat_map(|line| line.points.iter().map(|p| p[0])),
        0.0..1.0,
    );
    let y_range = padded_range(
        fig.lines()
            .filter(|line| line.axis == YAxis::Primary)
            .flat_map(|line| line.points.iter().map(|p| p[1])),
        0.0..1.0,
    );
    let y2_max = CurrentLevel::High.milliamps() + 0.5;

    let mut chart = ChartBuilder::on(&chart_area)
        .margin(10)
        .caption(
            fig.title.clone().unwrap_or_else(|| "Plot".into()),
            ("sans-serif", 24),
        )
        .x_label_area_size(30)
        .y_label_area_size(50)
        .right_y_label_area_size(50)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?
        .set_secondary_coord(x_range, 0.0..y2_max);
    chart
        .configure_mesh()
        .x_desc(fig.x.label.clone().unwrap_or_default())
        .y_desc(fig.y.label.clone().unwrap_or_default())
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc(fig.y2.label.clone().unwrap_or_default())
        .draw()?;

    for band in fig.bands() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(band.x0, y_range.start), (band.x1, y_range.end)],
            rgb(band.color).mix(band.opacity as f64).filled(),
        )))?;
    }
    for line in fig.lines() {
        let style = line_style(&line.style);
        let points = line.points.iter().map(|p| (p[0], p[1]));
        match line.axis {
            YAxis::Primary => {
                chart
                    .draw_series(LineSeries::new(points, style))?
                    .label(line.name.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
            YAxis::Secondary => {
                chart
                    .draw_secondary_series(LineSeries::new(points, style))?
                    .label(line.name.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    if let Some(note) = &fig.note {
        note_area.draw(&Text::new(
            note.clone(),
            (20, 10),
            ("sans-serif", 16).into_font(),
        ))?;
    }
    root.present()?;
    Ok(())
}
