//! Sorting engines expressed as resumable state machines.
//!
//! Every engine advances one visible step per call to [`SortEngine::step`],
//! mutating the container through [`Frame`] and queueing the resulting
//! [`VisualEvent`]s. Recursive algorithms keep their pending work on an
//! explicit stack, so depth never grows the call stack.

mod gnome;
mod heap;
mod insertion;
mod merge;
mod quick;
mod selection;

use std::{collections::VecDeque, fmt, ops::Range, str::FromStr};

use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{BarValue, Color, Container, Pacing, Palette, SortVizError, VisualEvent, VisualState};

pub use gnome::GnomeSort;
pub use heap::HeapSort;
pub use insertion::InsertionSort;
pub use merge::MergeSort;
pub use quick::QuickSort;
pub use selection::SelectionSort;

/// Closed registry of the available engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Selection,
    Insertion,
    Gnome,
    Heap,
    Merge,
    Quick,
}

impl Algorithm {
    pub const ALL: [Self; 6] = [
        Self::Selection,
        Self::Insertion,
        Self::Gnome,
        Self::Heap,
        Self::Merge,
        Self::Quick,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Selection => "selection sort",
            Self::Insertion => "insertion sort",
            Self::Gnome => "gnome sort",
            Self::Heap => "heap sort",
            Self::Merge => "merge sort",
            Self::Quick => "quick sort",
        }
    }

    /// Builds a fresh engine for a container of `len` slots. `seed` only
    /// affects engines that make random choices.
    pub fn engine<V: BarValue>(self, len: usize, seed: Option<u64>) -> AnyEngine<V> {
        match self {
            Self::Selection => AnyEngine::Selection(SelectionSort::new(len)),
            Self::Insertion => AnyEngine::Insertion(InsertionSort::new(len)),
            Self::Gnome => AnyEngine::Gnome(GnomeSort::new(len)),
            Self::Heap => AnyEngine::Heap(HeapSort::new(len)),
            Self::Merge => AnyEngine::Merge(MergeSort::new(len)),
            Self::Quick => {
                let rng = match seed {
                    Some(seed) => SmallRng::seed_from_u64(seed),
                    None => SmallRng::from_os_rng(),
                };
                AnyEngine::Quick(QuickSort::new(len, rng))
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == name)
            .ok_or_else(|| SortVizError::UnknownAlgorithm(name.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Done,
}

/// Mutable view handed to an engine for one step.
pub struct Frame<'a, V> {
    container: &'a mut Container<V>,
    events: &'a mut VecDeque<VisualEvent>,
    palette: &'a Palette,
    base: Pacing,
}

impl<'a, V: BarValue> Frame<'a, V> {
    pub fn new(
        container: &'a mut Container<V>,
        events: &'a mut VecDeque<VisualEvent>,
        palette: &'a Palette,
        base: Pacing,
    ) -> Self {
        Self {
            container,
            events,
            palette,
            base,
        }
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn value(&self, index: usize) -> V {
        self.container.value_at(index)
    }

    /// Caller-supplied pacing that engines scale for their sub-steps.
    pub fn base(&self) -> Pacing {
        self.base
    }

    pub fn palette(&self) -> &Palette {
        self.palette
    }

    pub fn container(&self) -> &Container<V> {
        &*self.container
    }

    pub fn highlight(&mut self, targets: &[usize], state: VisualState, pacing: Pacing) {
        let color = self.palette.color_for(state).clone();
        self.highlight_with(targets, state, color, pacing);
    }

    pub fn highlight_with(&mut self, targets: &[usize], state: VisualState, color: Color, pacing: Pacing) {
        for &index in targets {
            self.container.set_visual_state(index, state);
        }
        self.events
            .push_back(VisualEvent::highlight(targets.to_vec(), state, color, pacing));
    }

    pub fn write(&mut self, index: usize, value: V, pacing: Pacing) {
        self.container.set_value(index, value);
        self.events
            .push_back(VisualEvent::set_value(index, value.height(), pacing));
    }

    /// Swaps two slots and emits their new heights; the pacing follows the
    /// second write. Exchanging a slot with itself emits nothing.
    pub fn exchange(&mut self, a: usize, b: usize, pacing: Pacing) {
        if a == b {
            return;
        }
        self.container.exchange(a, b);
        self.events
            .push_back(VisualEvent::set_value(a, self.container.value_at(a).height(), Pacing::ZERO));
        self.events
            .push_back(VisualEvent::set_value(b, self.container.value_at(b).height(), pacing));
    }

    /// Queues a sweep over `range`. Empty ranges emit nothing.
    pub fn ripple(&mut self, range: Range<usize>, state: VisualState, pacing: Pacing) {
        if range.is_empty() {
            return;
        }
        let targets: Vec<usize> = range.collect();
        for &index in &targets {
            self.container.set_visual_state(index, state);
        }
        let color = self.palette.color_for(state).clone();
        self.events
            .push_back(VisualEvent::ripple(targets, state, color, pacing));
    }

    /// The sweep every engine finishes with.
    pub fn completion_ripple(&mut self, pacing: Pacing) {
        let len = self.len();
        self.ripple(0..len, VisualState::Sorted, pacing);
    }
}

/// One resumable sorting procedure.
pub trait SortEngine<V: BarValue> {
    fn algorithm(&self) -> Algorithm;

    /// Performs the next visible step. Returns [`Progress::Done`] once the
    /// container is sorted and the completion ripple was queued.
    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress;
}

/// Dispatch table over the six engine kinds.
#[derive(Debug)]
pub enum AnyEngine<V> {
    Selection(SelectionSort),
    Insertion(InsertionSort<V>),
    Gnome(GnomeSort),
    Heap(HeapSort),
    Merge(MergeSort<V>),
    Quick(QuickSort<V>),
}

impl<V: BarValue> SortEngine<V> for AnyEngine<V> {
    fn algorithm(&self) -> Algorithm {
        match self {
            Self::Selection(engine) => SortEngine::<V>::algorithm(engine),
            Self::Insertion(engine) => engine.algorithm(),
            Self::Gnome(engine) => SortEngine::<V>::algorithm(engine),
            Self::Heap(engine) => SortEngine::<V>::algorithm(engine),
            Self::Merge(engine) => engine.algorithm(),
            Self::Quick(engine) => engine.algorithm(),
        }
    }

    fn step(&mut self, frame: &mut Frame<'_, V>) -> Progress {
        match self {
            Self::Selection(engine) => engine.step(frame),
            Self::Insertion(engine) => engine.step(frame),
            Self::Gnome(engine) => engine.step(frame),
            Self::Heap(engine) => engine.step(frame),
            Self::Merge(engine) => engine.step(frame),
            Self::Quick(engine) => engine.step(frame),
        }
    }
}

/// Lazy, finite, non-restartable sequence of events for one run.
#[derive(Debug)]
pub struct EventStream<V> {
    engine: AnyEngine<V>,
    pending: VecDeque<VisualEvent>,
    palette: Palette,
    base: Pacing,
    finished: bool,
}

impl<V: BarValue> EventStream<V> {
    pub fn new(engine: AnyEngine<V>, palette: Palette, base: Pacing) -> Self {
        Self {
            engine,
            pending: VecDeque::new(),
            palette,
            base,
            finished: false,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.engine.algorithm()
    }

    /// Advances the engine until it yields an event or finishes.
    pub fn next_event(&mut self, container: &mut Container<V>) -> Option<VisualEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            let mut frame = Frame::new(container, &mut self.pending, &self.palette, self.base);
            if self.engine.step(&mut frame) == Progress::Done {
                self.finished = true;
            }
        }
    }

    /// Runs the engine to completion without pacing, returning every event.
    pub fn drain(mut self, container: &mut Container<V>) -> Vec<VisualEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event(container) {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const BASE: f64 = 80.0;

    pub fn run<V: BarValue>(algorithm: Algorithm, values: Vec<V>) -> (Container<V>, Vec<VisualEvent>) {
        let mut container = Container::from_values(values);
        let engine = algorithm.engine(container.len(), Some(11));
        let events = EventStream::new(engine, Palette::default(), Pacing::from_millis(BASE))
            .drain(&mut container);
        (container, events)
    }

    /// Slot value whose order ignores where it started.
    #[derive(Debug, Clone, Copy)]
    pub struct Tagged {
        pub key: i64,
        pub origin: usize,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    impl Eq for Tagged {}

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.key.cmp(&other.key)
        }
    }

    impl BarValue for Tagged {
        fn height(&self) -> i64 {
            self.key
        }
    }

    pub fn tagged(keys: &[i64]) -> Vec<Tagged> {
        keys.iter()
            .enumerate()
            .map(|(origin, &key)| Tagged { key, origin })
            .collect()
    }

    /// Deterministic pseudo-random inputs, mixing duplicates and runs.
    pub fn inputs() -> Vec<Vec<i64>> {
        let mut state = 0x2545_f491_u64;
        let mut next = move |modulo: u64| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % modulo) as i64
        };
        let mut cases = vec![
            vec![],
            vec![1],
            vec![2, 1],
            vec![4, 4, 4],
            vec![5, 3, 8, 1],
            (0..32).collect(),
            (0..32).rev().collect(),
        ];
        for len in [7_u64, 16, 33, 64] {
            cases.push((0..len).map(|_| next(10)).collect());
            cases.push((0..len).map(|_| next(1_000) - 500).collect());
        }
        cases
    }

    pub fn sorted_copy(values: &[i64]) -> Vec<i64> {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::EventKind;

    #[test]
    fn registry_round_trips_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        let err = "bubble sort".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, SortVizError::UnknownAlgorithm(ref name) if name == "bubble sort"));
    }

    #[test]
    fn every_engine_sorts_by_permutation() {
        for algorithm in Algorithm::ALL {
            for input in inputs() {
                let (container, _) = run(algorithm, input.clone());
                assert_eq!(
                    container.to_sequence(),
                    sorted_copy(&input),
                    "{algorithm} on {input:?}"
                );
                assert!(container.is_sorted(), "{algorithm} left {input:?} unsorted");
            }
        }
    }

    #[test]
    fn every_engine_replays_onto_a_renderer_copy() {
        for algorithm in Algorithm::ALL {
            for input in inputs() {
                let mut canvas = input.clone();
                let (container, events) = run(algorithm, input);
                for event in &events {
                    if let EventKind::SetValue(height) = event.kind {
                        canvas[event.targets[0]] = height;
                    }
                }
                assert_eq!(canvas, container.to_sequence(), "{algorithm}");
            }
        }
    }

    #[test]
    fn sorted_input_is_left_unchanged() {
        let sorted: Vec<i64> = vec![1, 2, 2, 3, 5, 8, 8, 13];
        for algorithm in Algorithm::ALL {
            let (container, events) = run(algorithm, sorted.clone());
            assert_eq!(container.to_sequence(), sorted, "{algorithm}");
            assert!(!events.is_empty(), "{algorithm} should still animate");
        }

        for algorithm in [
            Algorithm::Selection,
            Algorithm::Insertion,
            Algorithm::Gnome,
            Algorithm::Merge,
        ] {
            let (_, events) = run(algorithm, sorted.clone());
            let changed = events.iter().any(|event| match event.kind {
                EventKind::SetValue(height) => sorted[event.targets[0]] != height,
                _ => false,
            });
            assert!(!changed, "{algorithm} moved a value on sorted input");
        }
    }

    #[test]
    fn stable_engines_keep_equal_keys_in_origin_order() {
        let keys = [3, 1, 3, 2, 1, 3, 2, 2, 1, 0, 3];
        for algorithm in [Algorithm::Insertion, Algorithm::Merge] {
            let (container, _) = run(algorithm, tagged(&keys));
            let sorted = container.to_sequence();
            for pair in sorted.windows(2) {
                if pair[0].key == pair[1].key {
                    assert!(pair[0].origin < pair[1].origin, "{algorithm}: {pair:?}");
                }
            }
        }
    }

    #[test]
    fn every_run_ends_with_one_full_sorted_ripple() {
        for algorithm in Algorithm::ALL {
            let (_, events) = run(algorithm, vec![9, 2, 7, 4]);
            let last = events.last().expect("events should be emitted");
            assert_eq!(last.kind, EventKind::Ripple(VisualState::Sorted), "{algorithm}");
            assert_eq!(last.targets, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn empty_container_emits_nothing() {
        for algorithm in Algorithm::ALL {
            let (container, events) = run::<i64>(algorithm, vec![]);
            assert!(container.is_empty());
            assert!(events.is_empty(), "{algorithm} emitted {events:?}");
        }
    }

    #[test]
    fn highlights_carry_palette_colours() {
        let palette = Palette::default();
        for algorithm in Algorithm::ALL {
            let (_, events) = run(algorithm, vec![6, 1, 5, 2, 4, 3]);
            for event in events {
                if let Some(color) = &event.color {
                    assert!(palette.colors().contains(&color), "{algorithm}: {color}");
                }
            }
        }
    }
}
