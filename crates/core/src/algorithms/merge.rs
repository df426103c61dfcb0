use super::{Algorithm, Frame, Progress, SortEngine};
use crate::{BarValue, Pacing, VisualState};

/// Pending work on the explicit recursion stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Split { left: usize, right: usize },
    Merge { left: usize, mid: usize, right: usize },
}

/// A merge of `[left, mid]` with `[mid + 1, right]`, one write per step.
#[derive(Debug, Clone)]
struct Merging<V> {
    mid: usize,
    right: usize,
    left_cursor: usize,
    right_cursor: usize,
    out: usize,
    range_start: usize,
    snapshot: Vec<V>,
}

impl<V: BarValue> Merging<V> {
    /// Value that sat at `index` when the merge started.
    fn held(&self, index: usize) -> V {
        self.snapshot[index - self.range_start]
    }
}

/// Top-down merge sort over inclusive ranges.
#[derive(Debug, Clone)]
pub struct MergeSort<V> {
    stack: Vec<Task>,
    merging: Option<Merging<V>>,
    done: bool,
}

impl<V: BarValue> MergeSort<V> {
    pub fn new(len: usize) -> Self {
        let stack = if len > 0 {
            vec![Task::Split {
                left: 0,
                right: len - 1,
            }]
        } else {
            Vec::new()
        };
        Self {
            stack,
            merging: None,
            done: false,
        }
    }

    fn write_next(&mut self, frame: &mut Frame<'_, V>) {
        let Some(merge) = self.merging.as_mut() else {
            return;
        };
        let base = frame.base();
        let left_open = merge.left_cursor <= merge.mid;
        let right_open = merge.right_cursor <= merge.right;

        let (value, mut pacing) = if left_open && right_open {
            let a = merge.held(merge.left_cursor);
            let b = merge.held(merge.right_cursor);
            if a <= b {
                merge.left_cursor += 1;
                (a, base)
            } else {
                merge.right_cursor += 1;
                (b, base)
            }
        } else if left_open {
            merge.left_cursor += 1;
            (merge.held(merge.left_cursor - 1), Pacing::ZERO)
        } else {
            merge.right_cursor += 1;
            (merge.held(merge.right_cursor - 1), Pacing::ZERO)
        };

        let out = merge.out;
        let closing = out == merge.right;
        if closing {
            pacing = base;
        }
        merge.out += 1;

        frame.write(out, value, pacing);

        if closing {
            let targets: Vec<usize> = (merge.range_start..=merge.right).collect();
            frame.highlight(&targets, VisualState::Neutral, Pacing::ZERO);
            self.merging = None;
        }
    }
}

impl<V: BarValue> SortEngine<V> for MergeSort<V> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Merge
    }

    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress {
        if self.done {
            return Progress::Done;
        }
        if self.merging.is_some() {
            self.write_next(frame);
            return Progress::Continue;
        }

        match self.stack.pop() {
            Some(Task::Split { left, right }) if left < right => {
                let mid = left + (right - left) / 2;
                self.stack.push(Task::Merge { left, mid, right });
                self.stack.push(Task::Split {
                    left: mid + 1,
                    right,
                });
                self.stack.push(Task::Split { left, right: mid });
            }
            Some(Task::Split { .. }) => {}
            Some(Task::Merge { left, mid, right }) => {
                let targets: Vec<usize> = (left..=right).collect();
                frame.highlight(&targets, VisualState::Compare, Pacing::ZERO);
                self.merging = Some(Merging {
                    mid,
                    right,
                    left_cursor: left,
                    right_cursor: mid + 1,
                    out: left,
                    range_start: left,
                    snapshot: (left..=right).map(|index| frame.value(index)).collect(),
                });
            }
            None => {
                frame.completion_ripple(frame.base().divided_by(2.0));
                self.done = true;
                return Progress::Done;
            }
        }
        Progress::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::EventKind;

    fn writes(events: &[crate::VisualEvent]) -> Vec<(usize, i64)> {
        events
            .iter()
            .filter_map(|event| match event.kind {
                EventKind::SetValue(height) => Some((event.targets[0], height)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn two_elements_merge_in_one_step() {
        let (container, events) = run(Algorithm::Merge, vec![2_i64, 1]);
        assert_eq!(container.to_sequence(), vec![1, 2]);
        assert_eq!(writes(&events), vec![(0, 1), (1, 2)]);

        let merges = events
            .iter()
            .filter(|event| {
                event.kind == EventKind::Highlight(VisualState::Compare) && event.targets == [0, 1]
            })
            .count();
        assert_eq!(merges, 1);
    }

    #[test]
    fn tail_writes_are_unpaced_until_the_last() {
        let (_, events) = run(Algorithm::Merge, vec![3_i64, 4, 1, 2]);
        let paced: Vec<bool> = events
            .iter()
            .filter(|event| matches!(event.kind, EventKind::SetValue(_)))
            .map(|event| !event.pacing.is_zero())
            .collect();
        // Both two-slot merges compare then close. The final merge writes 1,2
        // from the right half under comparison, then 3 as tail, then 4 as closing.
        assert_eq!(paced, vec![true, true, true, true, true, true, false, true]);
    }

    #[test]
    fn deep_input_does_not_grow_the_call_stack() {
        let input: Vec<i64> = (0..4_096).rev().collect();
        let (container, _) = run(Algorithm::Merge, input);
        assert!(container.is_sorted());
    }
}
