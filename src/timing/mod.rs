//! Frame/time conversion functions.
//!
//! Pure functions for converting between seconds and frame counts.
//! All functions are deterministic and have no side effects.
//!
//! # Rounding Policy
//!
//! Durations are converted with CEILING so a visual segment never ends
//! before its narration audio does. Because ceiling is applied per
//! segment, a timeline's total may exceed the nominal target by up to
//! `num_segments - 1` frames; callers accept this rather than risk
//! cutting speech off.

/// Small epsilon for floating-point comparisons.
const EPSILON: f64 = 1e-6;

/// Convert a duration in seconds to a frame count using CEILING.
///
/// Epsilon protection keeps values that are a hair above an exact frame
/// boundary (e.g. `2.0 * 30.0 = 60.000000001`) from ceiling up to an
/// extra frame.
///
/// # Arguments
/// * `seconds` - Duration in seconds
/// * `fps` - Frame rate (e.g., 30.0)
///
/// # Examples
/// ```
/// use reel_core::timing::seconds_to_frames;
///
/// assert_eq!(seconds_to_frames(2.0, 30.0), 60);
/// assert_eq!(seconds_to_frames(2.01, 30.0), 61); // Partial frame rounds up
/// assert_eq!(seconds_to_frames(0.0, 30.0), 0);
/// ```
pub fn seconds_to_frames(seconds: f64, fps: f64) -> u32 {
    if seconds <= 0.0 {
        return 0;
    }
    (seconds * fps - EPSILON).ceil().max(0.0) as u32
}

/// Convert a frame count to its duration in seconds (exact, no rounding).
///
/// # Arguments
/// * `frames` - Number of frames
/// * `fps` - Frame rate (e.g., 30.0)
pub fn frames_to_seconds(frames: u32, fps: f64) -> f64 {
    frames as f64 / fps
}

/// Calculate the duration of a single frame in seconds.
#[inline]
pub fn frame_duration_seconds(fps: f64) -> f64 {
    1.0 / fps
}

/// Linear progress of `frame` through a span of `duration_frames`,
/// clamped to `[0, 1]`.
///
/// `frame` is relative to the span start (0-based). A zero-length span
/// reports full progress.
pub fn span_progress(frame: u32, duration_frames: u32) -> f64 {
    if duration_frames == 0 {
        return 1.0;
    }
    (frame as f64 / duration_frames as f64).clamp(0.0, 1.0)
}
