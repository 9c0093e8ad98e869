//! Composition assembly.
//!
//! A [`Composition`] is the complete, immutable timing and audio plan
//! for one rendered video: frame rate, total duration bound, timeline,
//! and scheduled audio tracks. It is built once per video from the
//! upstream script and audio metadata; any change requires rebuilding.
//!
//! Construction is a one-shot, deterministic, side-effect-free
//! computation. Once built, a composition is only read, so frame
//! queries may run concurrently on a parallel renderer.

mod builder;
mod types;

pub use builder::{BuildOutput, CompositionBuilder};
pub use types::{Composition, CompositionError, FormatProfile, VideoFormat};
