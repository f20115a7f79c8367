use serde::{Deserialize, Serialize};

/// One time-indexed EEG measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds; strictly increasing within a sequence.
    pub time: f64,
    /// Microvolts, signed.
    pub voltage: f64,
    /// Hz
    pub frequency: f64,
    /// Seconds
    pub duration: f64,
}

impl Sample {
    pub fn new(time: f64, voltage: f64, frequency: f64, duration: f64) -> Self {
        Self {
            time,
            voltage,
            frequency,
            duration,
        }
    }
}

/// Packed `0xRRGGBB` display color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const RED: Rgb = Rgb(0xFF0000);
    pub const ORANGE: Rgb = Rgb(0xFFA500);
    pub const YELLOW: Rgb = Rgb(0xFFFF00);
    pub const NEUTRAL: Rgb = Rgb(0xFFFFFF);

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }
    pub fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// `#rrggbb`
    pub fn hex(self) -> String {
        format!("#{:06x}", self.0 & 0xFF_FFFF)
    }
}

/// Stimulation intensity selected by the classifier.
///
/// Variants are declared in ascending order so the derived `Ord` matches the
/// milliamp ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CurrentLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl CurrentLevel {
    pub const ALL: [CurrentLevel; 4] = [
        CurrentLevel::None,
        CurrentLevel::Low,
        CurrentLevel::Medium,
        CurrentLevel::High,
    ];

    /// Output current in mA.
    pub fn milliamps(self) -> f64 {
        match self {
            CurrentLevel::None => 0.0,
            CurrentLevel::Low => 1.0,
            CurrentLevel::Medium => 1.5,
            CurrentLevel::High => 2.0,
        }
    }

    pub fn is_active(self) -> bool {
        self != CurrentLevel::None
    }

    /// Shading color for an interval peaking at this level.
    pub fn color(self) -> Rgb {
        match self {
            CurrentLevel::High => Rgb::RED,
            CurrentLevel::Medium => Rgb::ORANGE,
            CurrentLevel::Low => Rgb::YELLOW,
            CurrentLevel::None => Rgb::NEUTRAL,
        }
    }
}

/// A sample together with its classified level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSample {
    #[serde(flatten)]
    pub sample: Sample,
    pub level: CurrentLevel,
}

impl AnnotatedSample {
    pub fn time(&self) -> f64 {
        self.sample.time
    }

    pub fn current_ma(&self) -> f64 {
        self.level.milliamps()
    }
}

/// Maximal run of consecutive active samples, `[start_time, end_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveInterval {
    pub start_time: f64,
    pub end_time: f64,
    pub peak_level: CurrentLevel,
}

impl ActiveInterval {
    pub fn color(&self) -> Rgb {
        self.peak_level.color()
    }

    pub fn span(&self) -> f64 {
        self.end_time - self.start_time
    }
}
