//! Timeline construction from ordered phase specs.

use crate::diagnostics::{Diagnostics, WarningKind};

use super::types::{FadeWindows, PhaseSpec, Timeline, TimelineEntry};

/// Builds a gapless [`Timeline`] from phases in playback order.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    fps: f64,
    fades: FadeWindows,
}

impl TimelineBuilder {
    /// Create a builder for the given frame rate.
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            fades: FadeWindows::default(),
        }
    }

    /// Override the fade windows stored on the built timeline.
    pub fn with_fades(mut self, fades: FadeWindows) -> Self {
        self.fades = fades;
        self
    }

    /// Build the timeline.
    ///
    /// Each phase's `start_frame` is the running sum of prior durations;
    /// zero-duration phases are omitted. The first entry starts at frame
    /// 0 and there are no gaps by construction.
    pub fn build(&self, phases: &[PhaseSpec]) -> Timeline {
        let mut entries = Vec::with_capacity(phases.len());
        let mut cursor = 0u32;

        for phase in phases {
            if phase.duration_frames == 0 {
                continue;
            }
            entries.push(TimelineEntry {
                id: phase.id.clone(),
                start_frame: cursor,
                duration_frames: phase.duration_frames,
                end_frame: cursor + phase.duration_frames,
            });
            cursor += phase.duration_frames;
        }

        Timeline {
            entries,
            total_frames: cursor,
            fps: self.fps,
            fades: self.fades,
        }
    }

    /// Build and clamp to a hard duration ceiling.
    ///
    /// If the computed total exceeds `ceiling_frames`, the excess is
    /// truncated from the trailing phases (typically the closing), never
    /// from leading or content phases, and an over-capacity warning is
    /// recorded. Entries that are consumed entirely are removed.
    pub fn build_clamped(
        &self,
        phases: &[PhaseSpec],
        ceiling_frames: u32,
        diag: &mut Diagnostics,
    ) -> Timeline {
        let mut timeline = self.build(phases);
        clamp_to_ceiling(&mut timeline, ceiling_frames, diag);
        timeline
    }
}

/// Truncate a timeline that exceeds a hard duration ceiling.
///
/// Excess comes off the trailing entries only; fully consumed entries
/// are removed. Records an over-capacity warning when anything was cut.
pub(crate) fn clamp_to_ceiling(timeline: &mut Timeline, ceiling_frames: u32, diag: &mut Diagnostics) {
    if timeline.total_frames <= ceiling_frames {
        return;
    }

    let excess = timeline.total_frames - ceiling_frames;
    diag.warn(
        WarningKind::OverCapacity,
        format!(
            "Timeline runs {} frames over the {}-frame ceiling; truncating trailing content",
            excess, ceiling_frames
        ),
    );

    while let Some(last) = timeline.entries.last_mut() {
        if timeline.total_frames <= ceiling_frames {
            break;
        }
        let over = timeline.total_frames - ceiling_frames;
        if last.duration_frames > over {
            last.duration_frames -= over;
            last.end_frame -= over;
            timeline.total_frames -= over;
        } else {
            timeline.total_frames -= last.duration_frames;
            timeline.entries.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_computes_cumulative_offsets() {
        let builder = TimelineBuilder::new(30.0);
        let timeline = builder.build(&[
            PhaseSpec::new("opening", 45),
            PhaseSpec::new("segment_0", 90),
            PhaseSpec::new("closing", 30),
        ]);

        assert_eq!(timeline.total_frames, 165);
        assert_eq!(timeline.entries[0].start_frame, 0);
        assert_eq!(timeline.entries[1].start_frame, 45);
        assert_eq!(timeline.entries[2].start_frame, 135);
        assert_eq!(timeline.entries[2].end_frame, 165);
        timeline.validate().unwrap();
    }

    #[test]
    fn build_omits_zero_duration_phases() {
        let builder = TimelineBuilder::new(30.0);
        let timeline = builder.build(&[
            PhaseSpec::new("opening", 0),
            PhaseSpec::new("segment_0", 90),
        ]);

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.entries[0].id, "segment_0");
        assert_eq!(timeline.entries[0].start_frame, 0);
    }

    #[test]
    fn clamp_truncates_trailing_phase_only() {
        let builder = TimelineBuilder::new(30.0);
        let mut diag = Diagnostics::new();
        let timeline = builder.build_clamped(
            &[
                PhaseSpec::new("segment_0", 100),
                PhaseSpec::new("closing", 60),
            ],
            120,
            &mut diag,
        );

        assert_eq!(timeline.total_frames, 120);
        assert_eq!(timeline.entries[0].duration_frames, 100);
        assert_eq!(timeline.entries[1].duration_frames, 20);
        assert!(diag.has(WarningKind::OverCapacity));
        timeline.validate().unwrap();
    }

    #[test]
    fn clamp_removes_fully_consumed_trailing_entries() {
        let builder = TimelineBuilder::new(30.0);
        let mut diag = Diagnostics::new();
        let timeline = builder.build_clamped(
            &[
                PhaseSpec::new("segment_0", 100),
                PhaseSpec::new("segment_1", 50),
                PhaseSpec::new("closing", 30),
            ],
            130,
            &mut diag,
        );

        // Closing removed entirely, segment_1 shortened.
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.entries[1].id, "segment_1");
        assert_eq!(timeline.total_frames, 130);
        timeline.validate().unwrap();
    }

    #[test]
    fn clamp_is_noop_under_ceiling() {
        let builder = TimelineBuilder::new(30.0);
        let mut diag = Diagnostics::new();
        let timeline =
            builder.build_clamped(&[PhaseSpec::new("segment_0", 100)], 1770, &mut diag);

        assert_eq!(timeline.total_frames, 100);
        assert!(diag.is_empty());
    }
}
