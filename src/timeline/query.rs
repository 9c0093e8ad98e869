//! Per-frame query surface.
//!
//! This is the only part of the engine the rendering layer touches: one
//! call per rendered frame, answering "which span is active, how far
//! through it are we, and what fade multiplier applies". Lookups are
//! O(log n) over the cumulative start offsets and the timeline is never
//! re-derived.
//!
//! Queries are pure functions of `(timeline, frame)` with no mutable
//! state, so a parallel renderer may call them concurrently and
//! out-of-order without synchronization.

use crate::timing::span_progress;

use super::types::{Timeline, TimelineEntry};

/// Result of sampling the timeline at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample<'a> {
    /// Index of the active entry.
    pub active_index: usize,
    /// The active entry.
    pub entry: &'a TimelineEntry,
    /// Linear fraction of the entry elapsed at this frame, in `[0, 1]`.
    pub local_progress: f64,
    /// Combined fade-in/fade-out multiplier in `[0, 1]`.
    pub fade_opacity: f64,
}

impl Timeline {
    /// Index of the entry whose `[start_frame, end_frame)` contains
    /// `frame`, clamped to the last entry for out-of-range frames.
    ///
    /// Returns `None` only for an empty timeline.
    pub fn entry_index_at(&self, frame: u32) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        // First entry starting after `frame`, minus one, is the active
        // entry. Also clamps frames past the end to the last entry.
        let idx = self.entries.partition_point(|e| e.start_frame <= frame);
        Some(idx.saturating_sub(1))
    }

    /// Sample the timeline at `frame`.
    ///
    /// Frames at or beyond `total_frames` clamp to the final entry so an
    /// off-by-one frame count in the host renderer never crashes a
    /// render.
    ///
    /// # Examples
    /// ```
    /// use reel_core::timeline::{PhaseSpec, TimelineBuilder};
    ///
    /// let timeline = TimelineBuilder::new(30.0).build(&[
    ///     PhaseSpec::new("a", 60),
    ///     PhaseSpec::new("b", 60),
    /// ]);
    ///
    /// let sample = timeline.sample(75).unwrap();
    /// assert_eq!(sample.entry.id, "b");
    /// assert!((sample.local_progress - 0.25).abs() < 1e-9);
    /// ```
    pub fn sample(&self, frame: u32) -> Option<FrameSample<'_>> {
        let active_index = self.entry_index_at(frame)?;
        let entry = &self.entries[active_index];

        // Clamp so out-of-range frames report the last entry at full
        // progress instead of running past it.
        let local_frame = frame.saturating_sub(entry.start_frame).min(
            entry.duration_frames.saturating_sub(1),
        );

        let local_progress = span_progress(local_frame, entry.duration_frames);
        let fade_opacity = fade_opacity(local_frame, entry.duration_frames, self);

        Some(FrameSample {
            active_index,
            entry,
            local_progress,
            fade_opacity,
        })
    }
}

/// Fade multiplier for a local frame within an entry.
///
/// The fade-in ramp rises over the first `fade_in_frames`, the fade-out
/// ramp falls over the last `fade_out_frames`; the result is the lower
/// of the two. Entries shorter than both windows peak below 1.0 rather
/// than popping.
fn fade_opacity(local_frame: u32, duration_frames: u32, timeline: &Timeline) -> f64 {
    let fade_in = timeline.fades.fade_in_frames;
    let fade_out = timeline.fades.fade_out_frames;

    let ramp_in = if fade_in == 0 {
        1.0
    } else {
        ((local_frame + 1) as f64 / fade_in as f64).min(1.0)
    };

    let remaining = duration_frames.saturating_sub(local_frame);
    let ramp_out = if fade_out == 0 {
        1.0
    } else {
        (remaining as f64 / fade_out as f64).min(1.0)
    };

    ramp_in.min(ramp_out).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{FadeWindows, PhaseSpec, TimelineBuilder};

    fn three_entry_timeline() -> Timeline {
        TimelineBuilder::new(30.0).build(&[
            PhaseSpec::new("opening", 45),
            PhaseSpec::new("segment_0", 90),
            PhaseSpec::new("closing", 30),
        ])
    }

    #[test]
    fn sample_finds_containing_entry() {
        let timeline = three_entry_timeline();

        assert_eq!(timeline.sample(0).unwrap().entry.id, "opening");
        assert_eq!(timeline.sample(44).unwrap().entry.id, "opening");
        assert_eq!(timeline.sample(45).unwrap().entry.id, "segment_0");
        assert_eq!(timeline.sample(134).unwrap().entry.id, "segment_0");
        assert_eq!(timeline.sample(135).unwrap().entry.id, "closing");
    }

    #[test]
    fn sample_clamps_out_of_range_frames() {
        let timeline = three_entry_timeline();

        let last_valid = timeline.sample(timeline.total_frames - 1).unwrap();
        let way_past = timeline.sample(timeline.total_frames + 1000).unwrap();

        assert_eq!(way_past.entry, last_valid.entry);
        assert_eq!(way_past.active_index, last_valid.active_index);
        assert!((way_past.local_progress - last_valid.local_progress).abs() < 1e-9);
    }

    #[test]
    fn sample_is_idempotent() {
        let timeline = three_entry_timeline();
        let a = timeline.sample(77).unwrap();
        let b = timeline.sample(77).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn local_progress_is_linear_within_entry() {
        let timeline = three_entry_timeline();

        // Frame 90 is 45 frames into the 90-frame segment_0.
        let sample = timeline.sample(90).unwrap();
        assert!((sample.local_progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn fade_ramps_in_and_out() {
        let timeline = TimelineBuilder::new(30.0)
            .with_fades(FadeWindows {
                fade_in_frames: 10,
                fade_out_frames: 5,
            })
            .build(&[PhaseSpec::new("only", 100)]);

        // First frame: 1/10 into the fade-in.
        let first = timeline.sample(0).unwrap();
        assert!((first.fade_opacity - 0.1).abs() < 1e-9);

        // Middle: fully opaque.
        let mid = timeline.sample(50).unwrap();
        assert!((mid.fade_opacity - 1.0).abs() < 1e-9);

        // Last frame: 1 frame remaining of a 5-frame fade-out.
        let last = timeline.sample(99).unwrap();
        assert!((last.fade_opacity - 0.2).abs() < 1e-9);
    }

    #[test]
    fn short_entry_never_reaches_full_opacity() {
        let timeline = TimelineBuilder::new(30.0)
            .with_fades(FadeWindows {
                fade_in_frames: 15,
                fade_out_frames: 10,
            })
            .build(&[PhaseSpec::new("blip", 8)]);

        for frame in 0..8 {
            let sample = timeline.sample(frame).unwrap();
            assert!(sample.fade_opacity < 1.0);
            assert!(sample.fade_opacity > 0.0);
        }
    }

    #[test]
    fn empty_timeline_returns_none() {
        let timeline = TimelineBuilder::new(30.0).build(&[]);
        assert!(timeline.sample(0).is_none());
    }
}
