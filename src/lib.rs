//! Reel Core - Audio-synchronized timeline composition engine.
//!
//! This crate contains the timing logic shared by all video formats with
//! zero rendering dependencies. Given a script and measured narration
//! audio, it produces a frame-indexed [`composition::Composition`] that a
//! frame-by-frame renderer walks to decide what to draw and which audio
//! to mix at each frame.

pub mod audio;
pub mod composition;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod quiz;
pub mod resolver;
pub mod script;
pub mod timeline;
pub mod timing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
