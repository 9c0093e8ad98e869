//! Frame-indexed timeline construction and per-frame queries.
//!
//! A [`Timeline`] is the resolved, gapless sequence of phase/segment
//! spans for one composition. It is built once, never mutated afterwards
//! (truncation happens during the build), and queried once per rendered
//! frame through [`Timeline::sample`].

mod builder;
mod query;
mod types;

pub use builder::TimelineBuilder;
pub(crate) use builder::clamp_to_ceiling;
pub use query::FrameSample;
pub use types::{FadeWindows, PhaseSpec, Timeline, TimelineEntry, TimelineError};
