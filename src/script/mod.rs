//! Upstream script data model.
//!
//! These structures mirror the JSON document the content/TTS pipeline
//! hands the renderer: per-format scripts whose segments carry primary
//! text, optional translated text, and an optional reference to a
//! rendered audio clip with its measured duration.
//!
//! The engine never mutates a script; it only reads it while building a
//! composition.

mod types;

pub use types::{
    AudioClip, ExplainerScript, FlashcardPart, FlashcardScript, NewsScript, QuizAudio, QuizScript,
    Segment,
};
