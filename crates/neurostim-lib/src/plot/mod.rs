use crate::detectors::Analysis;
use crate::signal::Rgb;
use serde::{Deserialize, Serialize};

pub const SIGNAL_COLOR: Rgb = Rgb(0x1F77B4);
pub const CURRENT_COLOR: Rgb = Rgb(0xFF7F0E);
pub const BAND_OPACITY: f32 = 0.2;
pub const LEGEND_NOTE: &str = "Color legend: red = 2 mA | orange = 1.5 mA | yellow = 1 mA";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    /// Stroke width in pixels.
    pub width: u32,
    pub color: Rgb,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum YAxis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
    pub axis: YAxis,
}

/// Vertical shaded region spanning the full plot height, drawn below lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Band {
    pub x0: f64,
    pub x1: f64,
    pub color: Rgb,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
    Band(Band),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub y2: Axis,
    pub note: Option<String>,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            y2: Axis { label: None },
            note: None,
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSeries> {
        self.series.iter().filter_map(|series| match series {
            Series::Line(line) => Some(line),
            Series::Band(_) => None,
        })
    }

    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.series.iter().filter_map(|series| match series {
            Series::Band(band) => Some(band),
            Series::Line(_) => None,
        })
    }
}

pub trait PlotBackend {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()>;
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        let sample = points[start];
        result.push(sample);
    }
    result
}

/// Voltage and current traces with one shaded band per active interval.
pub fn figure_from_analysis(analysis: &Analysis, max_points: usize) -> Figure {
    let mut fig = Figure::new(Some("EEG and current regulation analysis".into()));
    fig.x.label = Some("Time (s)".into());
    fig.y.label = Some("Voltage (µV)".into());
    fig.y2.label = Some("Current (mA)".into());
    fig.note = Some(LEGEND_NOTE.into());

    for interval in &analysis.intervals {
        fig.add_series(Series::Band(Band {
            x0: interval.start_time,
            x1: interval.end_time,
            color: interval.color(),
            opacity: BAND_OPACITY,
        }));
    }
    fig.add_series(Series::Line(LineSeries {
        name: "EEG Signal".into(),
        points: decimate_points(&analysis.voltage_points(), max_points),
        style: Style {
            width: 1,
            color: SIGNAL_COLOR,
        },
        axis: YAxis::Primary,
    }));
    fig.add_series(Series::Line(LineSeries {
        name: "Current".into(),
        points: decimate_points(&analysis.current_points(), max_points),
        style: Style {
            width: 2,
            color: CURRENT_COLOR,
        },
        axis: YAxis::Secondary,
    }));
    fig
}
