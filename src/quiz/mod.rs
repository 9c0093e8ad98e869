//! Quiz phase state machine.
//!
//! Layers a fixed phase sequence (OPENING → QUESTION → THINKING →
//! REVEAL → CLOSING) on top of the timeline, with per-phase frame
//! thresholds computed once at build time and a derived countdown value
//! during the thinking phase.

mod phases;

pub use phases::{QuizClock, QuizPlan, QuizState, QuizThresholds, QuizTimingConfig};
