use rand::{rngs::SmallRng, Rng};

use super::{Algorithm, Frame, Progress, SortEngine};
use crate::{BarValue, Pacing, VisualState};

/// Lomuto partition of `[left, right]` around the value parked at `right`.
#[derive(Debug, Clone, Copy)]
struct Partition<V> {
    left: usize,
    right: usize,
    /// Next slot that receives a value `<=` the pivot.
    store: usize,
    scan: usize,
    pivot: V,
}

/// Quick sort with a uniformly random pivot per partition. Pending ranges
/// live on an explicit stack.
#[derive(Debug, Clone)]
pub struct QuickSort<V> {
    ranges: Vec<(usize, usize)>,
    partition: Option<Partition<V>>,
    rng: SmallRng,
    done: bool,
}

impl<V: BarValue> QuickSort<V> {
    pub fn new(len: usize, rng: SmallRng) -> Self {
        let ranges = if len > 1 { vec![(0, len - 1)] } else { Vec::new() };
        Self {
            ranges,
            partition: None,
            rng,
            done: false,
        }
    }

    fn begin(&mut self, left: usize, right: usize, frame: &mut Frame<'_, V>) {
        let base = frame.base();
        let pivot_color = frame.palette().pivot.clone();
        let chosen = self.rng.random_range(left..=right);

        frame.highlight_with(&[chosen], VisualState::Settled, pivot_color.clone(), Pacing::ZERO);
        frame.exchange(chosen, right, Pacing::ZERO);
        frame.highlight_with(&[right], VisualState::Settled, pivot_color, base);

        self.partition = Some(Partition {
            left,
            right,
            store: left,
            scan: left,
            pivot: frame.value(right),
        });
    }

    fn advance(&mut self, mut part: Partition<V>, frame: &mut Frame<'_, V>) {
        let base = frame.base();
        if part.scan < part.right {
            let scan = part.scan;
            frame.highlight(&[scan], VisualState::Compare, base.divided_by(8.0));
            if frame.value(scan) <= part.pivot {
                frame.exchange(part.store, scan, Pacing::ZERO);
                part.store += 1;
            }
            frame.highlight(&[scan], VisualState::Neutral, Pacing::ZERO);
            part.scan += 1;
            self.partition = Some(part);
            return;
        }

        let Partition {
            left, right, store, ..
        } = part;
        frame.exchange(store, right, base);
        let pivot_color = frame.palette().pivot.clone();
        frame.highlight_with(&[store], VisualState::Settled, pivot_color, Pacing::ZERO);
        frame.ripple(left..right + 1, VisualState::Neutral, base.divided_by(10.0));

        if store + 1 < right {
            self.ranges.push((store + 1, right));
        }
        if store > left + 1 {
            self.ranges.push((left, store - 1));
        }
        self.partition = None;
    }
}

impl<V: BarValue> SortEngine<V> for QuickSort<V> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Quick
    }

    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress {
        if self.done {
            return Progress::Done;
        }
        if let Some(part) = self.partition {
            self.advance(part, frame);
            return Progress::Continue;
        }

        match self.ranges.pop() {
            Some((left, right)) => {
                self.begin(left, right, frame);
                Progress::Continue
            }
            None => {
                frame.completion_ripple(frame.base().divided_by(2.0));
                self.done = true;
                Progress::Done
            }
        }
    }
}
