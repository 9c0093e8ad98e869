//! Audio track scheduling.
//!
//! Assigns every narration clip a starting frame and span derived from
//! the timeline, plus optional ambient audio anchored to a named phase.
//! Narration tracks never overlap by construction because the timeline
//! itself is non-overlapping; ambient tracks may overlap freely.

mod scheduler;
mod types;

pub use scheduler::{legacy_track, schedule_ambient, schedule_narration, verify_narration_layout};
pub use types::{AudioChannel, AudioTrack};
