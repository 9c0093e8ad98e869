//! Duration resolution for narration segments.
//!
//! Produces an authoritative frame count for every segment of a script:
//!
//! - **Explicit mode**: every segment carries a measured clip duration.
//!   Measurements are authoritative and are converted to frames directly,
//!   never rescaled.
//! - **Fallback mode**: no segment is measured. Durations are estimated
//!   proportionally from character counts, clamped to a minimum, then
//!   rescaled so the integer frame counts sum to the target exactly
//!   (rounding is absorbed by the final segment).
//! - **Mixed mode**: measured segments are honored as-is; the remaining
//!   budget is distributed proportionally among only the unmeasured
//!   segments, each of which gets a missing-measurement warning.

use thiserror::Error;

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::script::Segment;
use crate::timing::seconds_to_frames;

/// Errors from duration resolution.
///
/// Only structurally invalid input is fatal; missing measurements and
/// empty text degrade with warnings instead.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The script contained no segments at all.
    #[error("Cannot resolve durations for an empty segment list")]
    EmptySegmentList,

    /// The target total duration was zero frames.
    #[error("Target duration must be at least one frame")]
    ZeroTotalDuration,
}

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolves per-segment frame durations for one composition.
#[derive(Debug, Clone)]
pub struct DurationResolver {
    /// Target frame rate.
    fps: f64,
    /// Floor applied to every estimated duration (never to measurements).
    min_duration_frames: u32,
    /// Count whitespace characters when estimating proportions.
    count_whitespace: bool,
}

impl DurationResolver {
    /// Create a resolver.
    ///
    /// # Arguments
    /// * `fps` - Target frame rate
    /// * `min_duration_frames` - Minimum estimated segment length
    ///   (typically one second of frames)
    pub fn new(fps: f64, min_duration_frames: u32) -> Self {
        Self {
            fps,
            min_duration_frames: min_duration_frames.max(1),
            count_whitespace: false,
        }
    }

    /// Include whitespace in character counts (default: excluded).
    pub fn count_whitespace(mut self, yes: bool) -> Self {
        self.count_whitespace = yes;
        self
    }

    /// Resolve a frame duration for every segment.
    ///
    /// `total_duration_frames` is the distribution target for estimated
    /// durations. In explicit mode it is ignored: measured audio is never
    /// rescaled, so the returned sum may differ from the target.
    ///
    /// # Returns
    /// One frame count per segment, in input order. In fallback and mixed
    /// modes the counts sum to `total_duration_frames` exactly.
    pub fn resolve(
        &self,
        segments: &[&Segment],
        total_duration_frames: u32,
        diag: &mut Diagnostics,
    ) -> ResolveResult<Vec<u32>> {
        if segments.is_empty() {
            return Err(ResolveError::EmptySegmentList);
        }
        if total_duration_frames == 0 {
            return Err(ResolveError::ZeroTotalDuration);
        }

        let measured: Vec<Option<f64>> = segments.iter().map(|s| s.measured_seconds()).collect();
        let num_measured = measured.iter().filter(|m| m.is_some()).count();

        // Explicit mode: exact audio measurement is authoritative.
        if num_measured == segments.len() {
            return Ok(measured
                .iter()
                .map(|m| seconds_to_frames(m.unwrap_or(0.0), self.fps))
                .collect());
        }

        // Full fallback: estimate everything from text.
        if num_measured == 0 {
            diag.warn(
                WarningKind::MissingMeasurement,
                format!(
                    "No measured audio durations for {} segments; estimating from character counts",
                    segments.len()
                ),
            );
            return Ok(self.distribute(segments, total_duration_frames, diag));
        }

        // Mixed mode: honor measurements, distribute the remainder.
        self.resolve_mixed(segments, &measured, total_duration_frames, diag)
    }

    /// Mixed-mode resolution: measured segments keep their exact frame
    /// counts; the rest of the budget is split proportionally among the
    /// unmeasured segments.
    fn resolve_mixed(
        &self,
        segments: &[&Segment],
        measured: &[Option<f64>],
        total_duration_frames: u32,
        diag: &mut Diagnostics,
    ) -> ResolveResult<Vec<u32>> {
        let mut result: Vec<u32> = vec![0; segments.len()];
        let mut explicit_total: u32 = 0;
        let mut unmeasured: Vec<(usize, &Segment)> = Vec::new();

        for (i, seg) in segments.iter().enumerate() {
            match measured[i] {
                Some(secs) => {
                    let frames = seconds_to_frames(secs, self.fps);
                    result[i] = frames;
                    explicit_total += frames;
                }
                None => {
                    diag.warn(
                        WarningKind::MissingMeasurement,
                        format!(
                            "Segment {} ('{}') has no measured duration; estimating",
                            i,
                            truncate_for_log(&seg.text)
                        ),
                    );
                    unmeasured.push((i, *seg));
                }
            }
        }

        let remaining = total_duration_frames.saturating_sub(explicit_total);
        let floor = self.min_duration_frames * unmeasured.len() as u32;
        let budget = if remaining < floor {
            // Measured audio already fills the target; give the rest the
            // minimum rather than zero-length spans.
            diag.warn(
                WarningKind::MissingMeasurement,
                format!(
                    "Measured durations leave only {} frames for {} unmeasured segments; \
                     using minimum of {} frames each",
                    remaining,
                    unmeasured.len(),
                    self.min_duration_frames
                ),
            );
            floor
        } else {
            remaining
        };

        let refs: Vec<&Segment> = unmeasured.iter().map(|(_, s)| *s).collect();
        let estimated = self.distribute(&refs, budget, diag);
        for ((i, _), frames) in unmeasured.iter().zip(estimated) {
            result[*i] = frames;
        }

        Ok(result)
    }

    /// Distribute `budget` frames across segments proportionally to their
    /// character counts.
    ///
    /// Two passes: clamp each proportional share to the minimum, then
    /// rescale all shares uniformly so the total is preserved. Integer
    /// rounding is absorbed by the final segment.
    fn distribute(&self, segments: &[&Segment], budget: u32, diag: &mut Diagnostics) -> Vec<u32> {
        if segments.is_empty() {
            return Vec::new();
        }
        // Single segment spans the whole budget; no distribution math.
        if segments.len() == 1 {
            return vec![budget];
        }

        let counts: Vec<usize> = segments
            .iter()
            .map(|s| s.char_count(self.count_whitespace))
            .collect();
        let total_chars: usize = counts.iter().sum();

        if total_chars == 0 {
            diag.warn(
                WarningKind::EmptyInput,
                "All segments have empty text; dividing duration equally",
            );
            return equal_division(segments.len(), budget);
        }

        // Pass 1: proportional shares, clamped to the minimum.
        let min = self.min_duration_frames as f64;
        let clamped: Vec<f64> = counts
            .iter()
            .map(|&c| (c as f64 / total_chars as f64 * budget as f64).max(min))
            .collect();

        // Pass 2: uniform rescale so the sum is exactly the budget.
        let clamped_sum: f64 = clamped.iter().sum();
        let scale = budget as f64 / clamped_sum;

        let mut result: Vec<u32> = Vec::with_capacity(segments.len());
        let mut allocated: u32 = 0;
        for share in clamped.iter().take(segments.len() - 1) {
            let frames = ((share * scale).round() as u32).min(budget.saturating_sub(allocated));
            result.push(frames);
            allocated += frames;
        }
        // Final segment absorbs all rounding drift.
        let mut last = budget.saturating_sub(allocated);
        if last == 0 {
            // Rounding ate the whole tail; reclaim a frame from the
            // largest earlier segment.
            if let Some(donor) = result
                .iter()
                .enumerate()
                .max_by_key(|(_, f)| **f)
                .map(|(i, _)| i)
            {
                if result[donor] > 1 {
                    result[donor] -= 1;
                    last = 1;
                }
            }
        }
        result.push(last);
        result
    }
}

/// Divide `budget` equally among `n` segments, remainder to the last.
fn equal_division(n: usize, budget: u32) -> Vec<u32> {
    let base = budget / n as u32;
    let mut result = vec![base; n];
    if let Some(last) = result.last_mut() {
        *last = budget - base * (n as u32 - 1);
    }
    result
}

/// Shorten text for warning messages.
fn truncate_for_log(text: &str) -> String {
    let truncated: String = text.chars().take(24).collect();
    if truncated.len() < text.len() {
        format!("{}…", truncated)
    } else {
        truncated
    }
}
