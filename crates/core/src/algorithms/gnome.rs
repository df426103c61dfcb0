use super::{Algorithm, Frame, Progress, SortEngine};
use crate::{BarValue, Pacing, VisualState};

/// Single cursor walk: step forward while in order, otherwise swap with the
/// left neighbour and step back.
#[derive(Debug, Clone)]
pub struct GnomeSort {
    len: usize,
    pos: usize,
    done: bool,
}

impl GnomeSort {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            pos: 0,
            done: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }
}

impl<V: BarValue> SortEngine<V> for GnomeSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Gnome
    }

    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress {
        if self.done {
            return Progress::Done;
        }

        let base = frame.base();
        let pos = self.pos;
        if pos >= self.len {
            frame.completion_ripple(base.divided_by(4.0));
            self.done = true;
            return Progress::Done;
        }

        let in_order = pos == 0 || frame.value(pos) >= frame.value(pos - 1);
        if !in_order {
            frame.exchange(pos, pos - 1, Pacing::ZERO);
        }
        frame.highlight(&[pos], VisualState::Compare, base);
        frame.highlight(&[pos], VisualState::Neutral, Pacing::ZERO);
        self.pos = if in_order { pos + 1 } else { pos - 1 };
        Progress::Continue
    }
}
