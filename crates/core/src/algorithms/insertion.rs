use super::{Algorithm, Frame, Progress, SortEngine};
use crate::{BarValue, Pacing, VisualState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase<V> {
    Key { i: usize },
    /// `hole` is where the key lands if the next comparison stops.
    Shift { i: usize, hole: usize, key: V },
    Finish,
    Done,
}

/// Shifts larger predecessors right and drops each key into the gap.
#[derive(Debug, Clone)]
pub struct InsertionSort<V> {
    len: usize,
    phase: Phase<V>,
}

impl<V: BarValue> InsertionSort<V> {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            phase: Phase::Key { i: 0 },
        }
    }
}

impl<V: BarValue> SortEngine<V> for InsertionSort<V> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Insertion
    }

    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress {
        let base = frame.base();
        self.phase = match self.phase {
            Phase::Key { i } if i >= self.len => Phase::Finish,
            Phase::Key { i } => {
                let color = frame.palette().key.clone();
                frame.highlight_with(&[i], VisualState::Compare, color, base);
                Phase::Shift {
                    i,
                    hole: i,
                    key: frame.value(i),
                }
            }
            Phase::Shift { i, hole, key } if hole > 0 && frame.value(hole - 1) > key => {
                let left = hole - 1;
                frame.highlight(&[left], VisualState::Compare, base);
                frame.highlight(&[left], VisualState::Neutral, Pacing::ZERO);
                let shifted = frame.value(left);
                frame.write(hole, shifted, Pacing::ZERO);
                Phase::Shift { i, hole: left, key }
            }
            Phase::Shift { i, hole, key } => {
                if hole != i {
                    frame.write(hole, key, Pacing::ZERO);
                }
                frame.highlight(&[i], VisualState::Neutral, Pacing::ZERO);
                Phase::Key { i: i + 1 }
            }
            Phase::Finish => {
                frame.completion_ripple(base.divided_by(4.0));
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
