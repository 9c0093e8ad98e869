//! Timeline data structures and invariant validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from timeline validation.
#[derive(Error, Debug)]
pub enum TimelineError {
    /// An entry does not start where its predecessor ended.
    #[error("Timeline has a gap or overlap at entry {index} ('{id}'): starts at {start_frame}, previous ended at {expected}")]
    NotContiguous {
        index: usize,
        id: String,
        start_frame: u32,
        expected: u32,
    },

    /// The entry durations do not sum to the declared total.
    #[error("Timeline duration mismatch: entries sum to {sum} frames, total is {total}")]
    TotalMismatch { sum: u32, total: u32 },

    /// The first entry does not start at frame 0.
    #[error("Timeline must start at frame 0, first entry starts at {0}")]
    NonZeroStart(u32),
}

/// Desired playback order input to the builder: one named phase or
/// content segment with its resolved duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSpec {
    /// Phase/segment identifier (e.g. "opening", "segment_2", "thinking").
    pub id: String,
    /// Resolved duration in frames. Zero-duration phases are omitted
    /// from the built timeline.
    pub duration_frames: u32,
}

impl PhaseSpec {
    /// Create a phase spec.
    pub fn new(id: impl Into<String>, duration_frames: u32) -> Self {
        Self {
            id: id.into(),
            duration_frames,
        }
    }
}

/// One resolved span of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Phase/segment identifier this span belongs to.
    pub id: String,
    /// First frame of the span (inclusive).
    pub start_frame: u32,
    /// Span length in frames.
    pub duration_frames: u32,
    /// One past the last frame of the span (`start_frame + duration_frames`).
    pub end_frame: u32,
}

impl TimelineEntry {
    /// Whether `frame` falls inside `[start_frame, end_frame)`.
    pub fn contains(&self, frame: u32) -> bool {
        frame >= self.start_frame && frame < self.end_frame
    }
}

/// Fade-in/fade-out window lengths applied by the query surface.
///
/// Fades are the one piece of visual logic the engine computes, because
/// they are timing-dependent, not style-dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeWindows {
    /// Frames over which an entry fades in.
    pub fade_in_frames: u32,
    /// Frames over which an entry fades out.
    pub fade_out_frames: u32,
}

impl Default for FadeWindows {
    fn default() -> Self {
        Self {
            fade_in_frames: 15,
            fade_out_frames: 10,
        }
    }
}

/// The resolved, frame-indexed, gapless sequence of spans for one
/// composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Ordered, non-overlapping entries.
    pub entries: Vec<TimelineEntry>,
    /// Total length in frames (exactly the sum of entry durations).
    pub total_frames: u32,
    /// Frame rate the frame counts were derived at.
    pub fps: f64,
    /// Fade windows used by the query surface.
    pub fades: FadeWindows,
}

impl Timeline {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the timeline has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by id.
    pub fn entry(&self, id: &str) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Check the structural invariants: starts at frame 0, no gaps, no
    /// overlaps, durations sum to `total_frames`.
    pub fn validate(&self) -> Result<(), TimelineError> {
        if self.entries.is_empty() {
            if self.total_frames != 0 {
                return Err(TimelineError::TotalMismatch {
                    sum: 0,
                    total: self.total_frames,
                });
            }
            return Ok(());
        }

        if self.entries[0].start_frame != 0 {
            return Err(TimelineError::NonZeroStart(self.entries[0].start_frame));
        }

        let mut expected = 0u32;
        let mut sum = 0u32;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.start_frame != expected {
                return Err(TimelineError::NotContiguous {
                    index,
                    id: entry.id.clone(),
                    start_frame: entry.start_frame,
                    expected,
                });
            }
            expected = entry.end_frame;
            sum += entry.duration_frames;
        }

        if sum != self.total_frames {
            return Err(TimelineError::TotalMismatch {
                sum,
                total: self.total_frames,
            });
        }

        Ok(())
    }
}
