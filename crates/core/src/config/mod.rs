use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Color, Pacing, Result, SortVizError, VisualState};

/// Milliseconds held after each event at speed `1.0`.
pub const BASE_TICKS: f64 = 800.0;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub array: ArrayConfig,
    pub playback: PlaybackConfig,
    pub palette: Palette,
}

impl AppConfig {
    /// Parses a JSON document. Missing sections fall back to their defaults.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.array.validate()?;
        self.playback.validate()
    }
}

/// Shape of the generated canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayConfig {
    pub size: usize,
    pub low_bound: i64,
    pub high_bound: i64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            size: 20,
            low_bound: 10,
            high_bound: 50,
        }
    }
}

impl ArrayConfig {
    pub fn validate(&self) -> Result<()> {
        validate_range(self.size, self.low_bound, self.high_bound)
    }
}

/// Checks the parameters a container is created from.
pub(crate) fn validate_range(len: usize, low: i64, high: i64) -> Result<()> {
    if len == 0 || low >= high {
        return Err(SortVizError::invalid_range(len, low, high));
    }
    Ok(())
}

/// Pacing and reproducibility settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub speed: f64,
    /// Seeds value generation and quick-sort pivots when present.
    pub seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            seed: None,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<()> {
        validate_speed(self.speed)
    }

    /// Base pacing derived from the speed setting, `BASE_TICKS / speed`.
    pub fn pacing(&self) -> Result<Pacing> {
        pacing_for(self.speed)
    }
}

/// Speeds so small that the hold overflows a `Duration` are rejected along
/// with non-positive ones.
fn pacing_for(speed: f64) -> Result<Pacing> {
    let millis = BASE_TICKS / speed;
    let pacing = Pacing::from_millis(millis);
    if speed.is_finite() && speed > 0.0 && millis.is_finite() && pacing.try_duration().is_some() {
        Ok(pacing)
    } else {
        Err(SortVizError::InvalidSpeed(speed))
    }
}

pub(crate) fn validate_speed(speed: f64) -> Result<()> {
    pacing_for(speed).map(|_| ())
}

/// Colour tokens used for every highlight and ripple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub neutral: Color,
    pub compare: Color,
    pub settled: Color,
    pub sorted: Color,
    /// Insertion-sort key being placed.
    pub key: Color,
    /// Quick-sort pivot.
    pub pivot: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            neutral: Color::new("#61AFEF"),
            compare: Color::new("#E06C75"),
            settled: Color::new("#C678DD"),
            sorted: Color::new("#98C379"),
            key: Color::new("#FF9966"),
            pivot: Color::new("purple"),
        }
    }
}

impl Palette {
    pub fn color_for(&self, state: VisualState) -> &Color {
        match state {
            VisualState::Neutral => &self.neutral,
            VisualState::Compare => &self.compare,
            VisualState::Settled => &self.settled,
            VisualState::Sorted => &self.sorted,
        }
    }

    /// Every token the palette can hand out.
    pub fn colors(&self) -> [&Color; 6] {
        [
            &self.neutral,
            &self.compare,
            &self.settled,
            &self.sorted,
            &self.key,
            &self.pivot,
        ]
    }
}
