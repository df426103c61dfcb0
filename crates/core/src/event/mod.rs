use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Color, Renderer, Result, SortVizError, VisualState};

/// How long to hold after an event before the next one is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Pacing {
    millis: f64,
}

impl Pacing {
    pub const ZERO: Self = Self { millis: 0.0 };

    /// Negative or non-finite inputs collapse to [`Pacing::ZERO`].
    pub fn from_millis(millis: f64) -> Self {
        if millis.is_finite() && millis > 0.0 {
            Self { millis }
        } else {
            Self::ZERO
        }
    }

    pub fn millis(&self) -> f64 {
        self.millis
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0.0
    }

    pub fn times(&self, factor: f64) -> Self {
        Self::from_millis(self.millis * factor)
    }

    pub fn divided_by(&self, divisor: f64) -> Self {
        Self::from_millis(self.millis / divisor)
    }

    /// `None` when the hold is too long for a [`Duration`].
    pub fn try_duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.millis / 1000.0).ok()
    }

    /// Saturates at [`Duration::MAX`].
    pub fn duration(&self) -> Duration {
        self.try_duration().unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Recolour the targets and tag them with the given state.
    Highlight(VisualState),
    /// Draw the single target at a new height.
    SetValue(i64),
    /// Recolour the targets one by one, holding the pacing before each.
    Ripple(VisualState),
}

/// A single observable change plus the hold that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEvent {
    pub targets: Vec<usize>,
    pub kind: EventKind,
    pub color: Option<Color>,
    pub pacing: Pacing,
}

impl VisualEvent {
    pub fn highlight(targets: Vec<usize>, state: VisualState, color: Color, pacing: Pacing) -> Self {
        Self {
            targets,
            kind: EventKind::Highlight(state),
            color: Some(color),
            pacing,
        }
    }

    pub fn set_value(index: usize, height: i64, pacing: Pacing) -> Self {
        Self {
            targets: vec![index],
            kind: EventKind::SetValue(height),
            color: None,
            pacing,
        }
    }

    pub fn ripple(targets: Vec<usize>, state: VisualState, color: Color, pacing: Pacing) -> Self {
        Self {
            targets,
            kind: EventKind::Ripple(state),
            color: Some(color),
            pacing,
        }
    }

    /// Total time the event occupies once applied.
    pub fn hold(&self) -> Duration {
        match self.kind {
            EventKind::Ripple(_) => {
                let per_slot = self.pacing.duration();
                if per_slot.is_zero() {
                    return Duration::ZERO;
                }
                u32::try_from(self.targets.len())
                    .ok()
                    .and_then(|slots| per_slot.checked_mul(slots))
                    .unwrap_or(Duration::MAX)
            }
            _ => self.pacing.duration(),
        }
    }
}

/// Suspends the current lane for `pacing`. Zero pacing does not yield.
pub async fn hold(pacing: Pacing) {
    if !pacing.is_zero() {
        tokio::time::sleep(pacing.duration()).await;
    }
}

/// The only path from emitted events to a renderer.
#[derive(Debug)]
pub struct VisualChannel<'a, R: ?Sized> {
    renderer: &'a mut R,
}

impl<'a, R: Renderer + ?Sized> VisualChannel<'a, R> {
    pub fn new(renderer: &'a mut R) -> Self {
        Self { renderer }
    }

    pub fn ensure_supported(&self, color: &Color) -> Result<()> {
        if self.renderer.supports_color(color) {
            Ok(())
        } else {
            Err(SortVizError::UnsupportedColor(color.to_string()))
        }
    }

    pub fn apply_highlight(&mut self, indices: &[usize], color: &Color) -> Result<()> {
        self.ensure_supported(color)?;
        for &index in indices {
            self.renderer.highlight(index, color);
        }
        Ok(())
    }

    pub fn apply_set_value(&mut self, index: usize, value: i64) {
        self.renderer.set_value(index, value);
    }

    /// Sweeps `color` across `indices`, holding `pacing` before each slot.
    /// The colour is checked before the first slot is touched.
    pub async fn apply_ripple(&mut self, indices: &[usize], color: &Color, pacing: Pacing) -> Result<()> {
        self.ensure_supported(color)?;
        for &index in indices {
            hold(pacing).await;
            self.renderer.highlight(index, color);
        }
        Ok(())
    }

    /// Applies one event and then holds for its pacing.
    pub async fn apply(&mut self, event: &VisualEvent) -> Result<()> {
        match (event.kind, event.color.as_ref()) {
            (EventKind::Ripple(_), Some(color)) => {
                return self.apply_ripple(&event.targets, color, event.pacing).await;
            }
            (EventKind::Highlight(_), Some(color)) => self.apply_highlight(&event.targets, color)?,
            (EventKind::SetValue(value), _) => {
                for &index in &event.targets {
                    self.apply_set_value(index, value);
                }
            }
            // Colourless highlights and ripples only retag slots.
            (EventKind::Highlight(_) | EventKind::Ripple(_), None) => {}
        }
        hold(event.pacing).await;
        Ok(())
    }
}
