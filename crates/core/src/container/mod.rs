use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{config::validate_range, Result};

/// Transient highlight tag carried by each slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualState {
    #[default]
    Neutral,
    Compare,
    Settled,
    Sorted,
}

/// A value that can occupy a slot and be drawn as a bar.
///
/// Engines only ever order values through [`Ord`]; the renderer only ever
/// sees [`BarValue::height`].
pub trait BarValue: Copy + Ord + fmt::Debug {
    fn height(&self) -> i64;
}

impl BarValue for i64 {
    fn height(&self) -> i64 {
        *self
    }
}

/// One position on the canvas. The slot itself never moves, only its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<V = i64> {
    pub value: V,
    pub visual_state: VisualState,
}

impl<V> Slot<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            visual_state: VisualState::Neutral,
        }
    }
}

/// Fixed-length sequence of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<V = i64> {
    slots: Vec<Slot<V>>,
}

impl Container<i64> {
    /// Creates `len` slots whose values are drawn uniformly from `[low, high]`.
    pub fn create<R: Rng + ?Sized>(len: usize, low: i64, high: i64, rng: &mut R) -> Result<Self> {
        validate_range(len, low, high)?;
        let values = (0..len).map(|_| rng.random_range(low..=high)).collect();
        Ok(Self::from_values(values))
    }
}

impl<V: BarValue> Container<V> {
    /// Builds a container holding exactly `values`, in order.
    pub fn from_values(values: Vec<V>) -> Self {
        Self {
            slots: values.into_iter().map(Slot::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn value_at(&self, index: usize) -> V {
        self.slots[index].value
    }

    pub fn set_value(&mut self, index: usize, value: V) {
        self.slots[index].value = value;
    }

    /// Swaps the values held by two slots. Visual state stays where it was.
    pub fn exchange(&mut self, a: usize, b: usize) {
        let held = self.slots[a].value;
        self.slots[a].value = self.slots[b].value;
        self.slots[b].value = held;
    }

    pub fn visual_state(&self, index: usize) -> VisualState {
        self.slots[index].visual_state
    }

    pub fn set_visual_state(&mut self, index: usize, state: VisualState) {
        self.slots[index].visual_state = state;
    }

    pub fn reset_visual_state(&mut self) {
        for slot in &mut self.slots {
            slot.visual_state = VisualState::Neutral;
        }
    }

    /// Current value order, front to back.
    pub fn to_sequence(&self) -> Vec<V> {
        self.slots.iter().map(|slot| slot.value).collect()
    }

    pub fn heights(&self) -> Vec<i64> {
        self.slots.iter().map(|slot| slot.value.height()).collect()
    }

    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    /// True when every value is `<=` its right-hand neighbour.
    pub fn is_sorted(&self) -> bool {
        self.slots.windows(2).all(|pair| pair[0].value <= pair[1].value)
    }
}
