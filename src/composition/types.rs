//! Composition data structures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{verify_narration_layout, AudioTrack};
use crate::config::FormatSettings;
use crate::quiz::QuizClock;
use crate::resolver::ResolveError;
use crate::timeline::{Timeline, TimelineError};
use crate::timing::seconds_to_frames;

/// Errors from composition construction and validation.
#[derive(Error, Debug)]
pub enum CompositionError {
    /// The script contained no narratable content.
    #[error("Script for '{0}' has no segments")]
    EmptyScript(VideoFormat),

    /// The configured frame rate is unusable.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// Duration resolution failed on structurally invalid input.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A built timeline violated its structural invariants.
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// Two narration tracks overlap.
    #[error("Narration tracks overlap")]
    OverlappingNarration,

    /// A track extends past the composition's declared duration.
    #[error("Audio track '{clip}' ends at frame {end_frame}, past the {total_frames}-frame bound")]
    TrackOutOfBounds {
        clip: String,
        end_frame: u32,
        total_frames: u32,
    },
}

/// The video format a composition was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoFormat {
    /// News-style talking segment reel.
    News,
    /// Multi-part writing-coach flashcard reel.
    Flashcards,
    /// Multiple-choice quiz reel.
    Quiz,
    /// Long-form chaptered explainer.
    Explainer,
}

impl std::fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoFormat::News => write!(f, "news"),
            VideoFormat::Flashcards => write!(f, "flashcards"),
            VideoFormat::Quiz => write!(f, "quiz"),
            VideoFormat::Explainer => write!(f, "explainer"),
        }
    }
}

/// Per-format duration bounds, derived from [`FormatSettings`].
#[derive(Debug, Clone, Copy)]
pub struct FormatProfile {
    /// Hard platform ceiling in seconds.
    pub max_seconds: f64,
    /// Distribution target when no audio measurement exists at all.
    pub fallback_total_seconds: f64,
}

impl FormatProfile {
    /// Profile for a format under the given settings.
    pub fn for_format(format: VideoFormat, settings: &FormatSettings) -> Self {
        match format {
            VideoFormat::News | VideoFormat::Flashcards | VideoFormat::Quiz => Self {
                max_seconds: settings.short_max_seconds,
                fallback_total_seconds: settings.short_fallback_seconds,
            },
            VideoFormat::Explainer => Self {
                max_seconds: settings.long_max_seconds,
                fallback_total_seconds: settings.long_fallback_seconds,
            },
        }
    }

    /// Ceiling in frames at the given rate.
    pub fn ceiling_frames(&self, fps: f64) -> u32 {
        seconds_to_frames(self.max_seconds, fps)
    }

    /// Fallback distribution target in frames at the given rate.
    pub fn fallback_frames(&self, fps: f64) -> u32 {
        seconds_to_frames(self.fallback_total_seconds, fps)
    }
}

/// The complete, immutable timing and audio plan for one rendered video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    /// Format this composition was built for.
    pub format: VideoFormat,
    /// Target frame rate.
    pub fps: f64,
    /// Declared duration bound used to size the rendered clip. Always at
    /// least the timeline's total.
    pub total_frames: u32,
    /// The resolved visual timeline.
    pub timeline: Timeline,
    /// Scheduled audio tracks.
    pub audio: Vec<AudioTrack>,
    /// Quiz phase state machine (quiz format only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizClock>,
}

impl Composition {
    /// Check the composition's structural invariants.
    ///
    /// Holds by construction for built compositions; exposed so callers
    /// can assert it before handing the plan to a renderer.
    pub fn validate(&self) -> Result<(), CompositionError> {
        self.timeline.validate()?;

        if self.total_frames < self.timeline.total_frames {
            return Err(CompositionError::Timeline(TimelineError::TotalMismatch {
                sum: self.timeline.total_frames,
                total: self.total_frames,
            }));
        }

        if !verify_narration_layout(&self.audio) {
            return Err(CompositionError::OverlappingNarration);
        }

        for track in &self.audio {
            if track.end_frame() > self.total_frames {
                return Err(CompositionError::TrackOutOfBounds {
                    clip: track.clip.clone(),
                    end_frame: track.end_frame(),
                    total_frames: self.total_frames,
                });
            }
        }

        Ok(())
    }

    /// Total duration in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.total_frames as f64 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioChannel, AudioTrack};
    use crate::timeline::{PhaseSpec, TimelineBuilder};

    fn composition() -> Composition {
        let timeline = TimelineBuilder::new(30.0).build(&[
            PhaseSpec::new("a", 60),
            PhaseSpec::new("b", 90),
        ]);
        Composition {
            format: VideoFormat::News,
            fps: 30.0,
            total_frames: 180,
            timeline,
            audio: vec![AudioTrack {
                clip: "a.mp3".to_string(),
                start_frame: 0,
                duration_frames: 60,
                channel: AudioChannel::Narration,
            }],
            quiz: None,
        }
    }

    #[test]
    fn validate_accepts_consistent_composition() {
        composition().validate().unwrap();
    }

    #[test]
    fn validate_rejects_underdeclared_total() {
        let mut comp = composition();
        comp.total_frames = 100;
        assert!(comp.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_bounds_track() {
        let mut comp = composition();
        comp.audio.push(AudioTrack {
            clip: "tail.mp3".to_string(),
            start_frame: 150,
            duration_frames: 100,
            channel: AudioChannel::Narration,
        });
        assert!(matches!(
            comp.validate(),
            Err(CompositionError::TrackOutOfBounds { .. })
        ));
    }

    #[test]
    fn profile_selects_bounds_by_format() {
        let settings = FormatSettings::default();
        let short = FormatProfile::for_format(VideoFormat::News, &settings);
        let long = FormatProfile::for_format(VideoFormat::Explainer, &settings);

        assert_eq!(short.ceiling_frames(30.0), 1770);
        assert!(long.max_seconds > short.max_seconds);
    }
}
