use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// CSS-style colour token handed to the renderer, e.g. `"#61AFEF"` or `"lime"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

const NAMED_COLORS: &[&str] = &[
    "black", "white", "red", "green", "blue", "cyan", "magenta", "yellow", "orange", "purple",
    "lime", "pink", "gray", "grey", "teal", "navy", "maroon", "olive", "silver", "aqua",
    "fuchsia", "violet", "indigo", "gold", "coral", "tomato", "salmon", "crimson", "orchid",
    "turquoise",
];

impl Color {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and the basic named colours.
    pub fn is_recognised(&self) -> bool {
        match self.0.strip_prefix('#') {
            Some(hex) => {
                matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => NAMED_COLORS
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&self.0)),
        }
    }

    /// Parses the token into an RGB triple when it is a hex colour.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#').filter(|hex| hex.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(hex[i..=i].repeat(2).as_str());
                Some((expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drawing surface for one canvas. Slots are addressed by index only.
pub trait Renderer {
    fn supports_color(&self, color: &Color) -> bool {
        color.is_recognised()
    }

    /// Redraws the canvas from scratch after its container was replaced.
    fn populate(&mut self, heights: &[i64]);

    fn highlight(&mut self, index: usize, color: &Color);

    fn set_value(&mut self, index: usize, value: i64);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn supports_color(&self, color: &Color) -> bool {
        (**self).supports_color(color)
    }

    fn populate(&mut self, heights: &[i64]) {
        (**self).populate(heights);
    }

    fn highlight(&mut self, index: usize, color: &Color) {
        (**self).highlight(index, color);
    }

    fn set_value(&mut self, index: usize, value: i64) {
        (**self).set_value(index, value);
    }
}

/// Operation received by a [`RenderLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    Populate(Vec<i64>),
    Highlight { index: usize, color: Color },
    SetValue { index: usize, value: i64 },
}

#[derive(Debug, Clone)]
pub struct RenderRecord {
    pub at: Instant,
    pub op: RenderOp,
}

/// Headless renderer that keeps the current canvas and every operation it
/// received, stamped with the (possibly virtual) tokio clock.
#[derive(Debug, Default)]
pub struct RenderLog {
    heights: Vec<i64>,
    colors: Vec<Option<Color>>,
    records: Vec<RenderRecord>,
    supported: Option<HashSet<String>>,
}

impl RenderLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the accepted colours to exactly `tokens`.
    pub fn with_supported_colors<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: Some(tokens.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn heights(&self) -> &[i64] {
        &self.heights
    }

    pub fn color_at(&self, index: usize) -> Option<&Color> {
        self.colors.get(index).and_then(Option::as_ref)
    }

    pub fn records(&self) -> &[RenderRecord] {
        &self.records
    }

    pub fn set_value_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches!(record.op, RenderOp::SetValue { .. }))
            .count()
    }

    pub fn clear_records(&mut self) {
        self.records.clear();
    }

    fn record(&mut self, op: RenderOp) {
        self.records.push(RenderRecord {
            at: Instant::now(),
            op,
        });
    }
}

impl Renderer for RenderLog {
    fn supports_color(&self, color: &Color) -> bool {
        match &self.supported {
            Some(tokens) => tokens.contains(color.as_str()),
            None => color.is_recognised(),
        }
    }

    fn populate(&mut self, heights: &[i64]) {
        self.heights = heights.to_vec();
        self.colors = vec![None; heights.len()];
        self.record(RenderOp::Populate(heights.to_vec()));
    }

    fn highlight(&mut self, index: usize, color: &Color) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = Some(color.clone());
        }
        self.record(RenderOp::Highlight {
            index,
            color: color.clone(),
        });
    }

    fn set_value(&mut self, index: usize, value: i64) {
        if let Some(slot) = self.heights.get_mut(index) {
            *slot = value;
        }
        self.record(RenderOp::SetValue { index, value });
    }
}
