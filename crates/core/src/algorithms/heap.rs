use super::{Algorithm, Frame, Progress, SortEngine};
use crate::{BarValue, Pacing, VisualState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Heapify nodes `remaining - 1` down to `0`.
    Build { remaining: usize },
    BuildDone,
    /// Move the root behind the heap that ends at `end`.
    Extract { end: usize },
    Finish,
    Done,
}

/// A sift-down still in flight: `node` within a heap of `size` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sift {
    node: usize,
    size: usize,
}

/// In-place heap sort. Sift-downs run one level per step, so the re-heapify
/// after each extraction is paced the same way as the initial build.
#[derive(Debug, Clone)]
pub struct HeapSort {
    len: usize,
    phase: Phase,
    sift: Option<Sift>,
}

impl HeapSort {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            phase: Phase::Build { remaining: len / 2 },
            sift: None,
        }
    }

    fn sift_level<V: BarValue>(&mut self, Sift { node, size }: Sift, frame: &mut Frame<'_, V>) {
        let base = frame.base();
        let mut largest = node;
        let children: Vec<usize> = [2 * node + 1, 2 * node + 2]
            .into_iter()
            .filter(|&child| child < size)
            .collect();
        for &child in &children {
            if frame.value(child) > frame.value(largest) {
                largest = child;
            }
        }

        if !children.is_empty() {
            frame.highlight(&children, VisualState::Compare, base.divided_by(4.0));
            frame.highlight(&children, VisualState::Neutral, Pacing::ZERO);
        }

        self.sift = if largest == node {
            None
        } else {
            frame.exchange(node, largest, base);
            Some(Sift {
                node: largest,
                size,
            })
        };
    }
}

impl<V: BarValue> SortEngine<V> for HeapSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Heap
    }

    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress {
        if let Some(sift) = self.sift {
            self.sift_level(sift, frame);
            return Progress::Continue;
        }

        let base = frame.base();
        self.phase = match self.phase {
            Phase::Build { remaining: 0 } => Phase::BuildDone,
            Phase::Build { remaining } => {
                self.sift = Some(Sift {
                    node: remaining - 1,
                    size: self.len,
                });
                Phase::Build {
                    remaining: remaining - 1,
                }
            }
            Phase::BuildDone => {
                frame.ripple(0..self.len, VisualState::Settled, base.divided_by(4.0));
                Phase::Extract {
                    end: self.len.saturating_sub(1),
                }
            }
            Phase::Extract { end: 0 } => Phase::Finish,
            Phase::Extract { end } => {
                frame.highlight(&[0, end], VisualState::Compare, base.times(2.0));
                frame.exchange(0, end, Pacing::ZERO);
                frame.highlight(&[0], VisualState::Neutral, Pacing::ZERO);
                frame.highlight(&[end], VisualState::Sorted, Pacing::ZERO);
                self.sift = Some(Sift { node: 0, size: end });
                Phase::Extract { end: end - 1 }
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

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::EventKind;

    #[test]
    fn all_equal_values_survive() {
        let (container, _) = run(Algorithm::Heap, vec![4_i64, 4, 4]);
        assert_eq!(container.to_sequence(), vec![4, 4, 4]);
    }

    #[test]
    fn ties_keep_the_parent() {
        // Heap build on equal children performs no exchange.
        let (_, events) = run(Algorithm::Heap, vec![4_i64, 4, 4]);
        let first_write = events
            .iter()
            .position(|event| matches!(event.kind, EventKind::SetValue(_)));
        let build_ripple = events
            .iter()
            .position(|event| event.kind == EventKind::Ripple(VisualState::Settled));
        assert!(build_ripple < first_write);
    }

    #[test]
    fn every_sift_exchange_is_paced() {
        let (_, events) = run(Algorithm::Heap, vec![1_i64, 2, 3, 4, 5, 6, 7]);
        let mut writes = events
            .iter()
            .filter(|event| matches!(event.kind, EventKind::SetValue(_)));
        // Exchanges come in pairs; the second write of a sift exchange holds
        // the base pacing, the extraction exchange holds none.
        while let (Some(first), Some(second)) = (writes.next(), writes.next()) {
            assert!(first.pacing.is_zero());
            assert!(second.pacing.is_zero() || second.pacing == Pacing::from_millis(BASE));
        }
        let paced = events
            .iter()
            .filter(|event| {
                matches!(event.kind, EventKind::SetValue(_))
                    && event.pacing == Pacing::from_millis(BASE)
            })
            .count();
        assert!(paced > 0);
    }
}
