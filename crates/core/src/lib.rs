//! Core library for the Sort Visualiser application.
//!
//! Sorting algorithms are turned into paced sequences of visual events that a
//! renderer draws as bars. Each module owns one layer: the slot container,
//! the event protocol, the sorting engines, the per-lane scheduler and the
//! dual-lane coordinator, with a caller-owned session on top.

pub mod algorithms;
pub mod config;
pub mod container;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod lane;
pub mod render;
pub mod session;
pub mod timeline;

pub use algorithms::{Algorithm, AnyEngine, EventStream, Frame, Progress, SortEngine};
pub use config::{AppConfig, ArrayConfig, Palette, PlaybackConfig, BASE_TICKS};
pub use container::{BarValue, Container, Slot, VisualState};
pub use coordinator::{Coordinator, DualReport};
pub use error::{Result, SortVizError};
pub use event::{hold, EventKind, Pacing, VisualChannel, VisualEvent};
pub use lane::{Lane, LaneStatus};
pub use render::{Color, RenderLog, RenderOp, RenderRecord, Renderer};
pub use session::{InputGuard, InputLock, LaneId, LaneMode, PlayReport, Session};
pub use timeline::{RunReport, Scheduler};
