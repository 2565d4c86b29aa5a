//! The fill engine: semantic field resolution, widget classification,
//! option scoring, and the ordered fill pipeline.
//!
//! All decision logic lives here as pure functions over probe metadata;
//! the only side effects go through a [`crate::driver::PageDriver`].

pub mod classify;
pub mod dropdown;
pub mod fields;
pub mod locator;
pub mod normalize;
pub mod pipeline;
pub mod scorer;
pub mod setter;

pub use classify::{Candidate, ControlKind, ControlMeta};
pub use dropdown::Timings;
pub use fields::{SemanticField, ValueKind};
pub use pipeline::{FillEngine, FillOutcome, FillReport};
