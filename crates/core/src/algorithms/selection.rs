use super::{Algorithm, Frame, Progress, SortEngine};
use crate::{BarValue, Pacing, VisualState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Outer { i: usize },
    Scan { i: usize, j: usize, min: usize },
    Swap { i: usize, min: usize },
    Finish,
    Done,
}

/// Moves the leftmost minimum of the unsorted suffix into place, one
/// position at a time.
#[derive(Debug, Clone)]
pub struct SelectionSort {
    len: usize,
    phase: Phase,
}

impl SelectionSort {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            phase: Phase::Outer { i: 0 },
        }
    }

    /// The inner scan runs faster on longer arrays.
    fn scan_pacing(&self, base: Pacing) -> Pacing {
        base.times(5.0 / self.len.max(1) as f64)
    }
}

impl<V: BarValue> SortEngine<V> for SelectionSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Selection
    }

    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress {
        let base = frame.base();
        self.phase = match self.phase {
            Phase::Outer { i } if i + 1 >= self.len => Phase::Finish,
            Phase::Outer { i } => {
                frame.highlight(&[i], VisualState::Settled, base);
                Phase::Scan { i, j: i + 1, min: i }
            }
            Phase::Scan { i, min, j } if j >= self.len => Phase::Swap { i, min },
            Phase::Scan { i, j, min } => {
                frame.highlight(&[j], VisualState::Compare, self.scan_pacing(base));
                let min = if frame.value(j) < frame.value(min) { j } else { min };
                frame.highlight(&[j], VisualState::Neutral, Pacing::ZERO);
                Phase::Scan { i, j: j + 1, min }
            }
            Phase::Swap { i, min } => {
                frame.highlight(&[i, min], VisualState::Settled, base);
                frame.exchange(i, min, Pacing::ZERO);
                frame.highlight(&[i, min], VisualState::Neutral, Pacing::ZERO);
                Phase::Outer { i: i + 1 }
            }
            Phase::Finish => {
                frame.completion_ripple(base.divided_by(2.0));
                Phase::Done
            }
            Phase::Done => Phase::Done,
        };

        if self.phase == Phase::Done {
            Progress::Done
        } else {
            Progress::Continue
        }
    }
}
