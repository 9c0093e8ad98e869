//! Per-format composition construction.
//!
//! One entry point per video format. Each walks the same path: resolve
//! segment durations, lay out the timeline, clamp to the format's
//! ceiling, schedule audio, then settle the declared total. Everything
//! a renderer needs afterwards is on the returned [`Composition`].

use std::collections::HashMap;

use crate::audio::{legacy_track, schedule_ambient, schedule_narration, AudioTrack};
use crate::config::EngineSettings;
use crate::diagnostics::Diagnostics;
use crate::logging::RenderLogger;
use crate::quiz::{QuizClock, QuizPlan};
use crate::resolver::DurationResolver;
use crate::script::{
    AudioClip, ExplainerScript, FlashcardScript, NewsScript, QuizScript, Segment,
};
use crate::timeline::{clamp_to_ceiling, PhaseSpec, TimelineBuilder};
use crate::timing::seconds_to_frames;

use super::types::{Composition, CompositionError, FormatProfile, VideoFormat};

/// A built composition together with the warnings accumulated while
/// building it. Warnings never abort a build; callers decide whether to
/// surface them.
#[derive(Debug)]
pub struct BuildOutput {
    pub composition: Composition,
    pub diagnostics: Diagnostics,
}

/// Builds [`Composition`]s from parsed scripts under one settings set.
pub struct CompositionBuilder<'a> {
    settings: &'a EngineSettings,
    logger: Option<&'a RenderLogger>,
}

impl<'a> CompositionBuilder<'a> {
    /// Create a builder over the given settings.
    pub fn new(settings: &'a EngineSettings) -> Self {
        Self {
            settings,
            logger: None,
        }
    }

    /// Attach a per-render logger; phases and warnings are mirrored to it.
    pub fn with_logger(mut self, logger: &'a RenderLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build a news reel composition.
    pub fn build_news(&self, script: &NewsScript) -> Result<BuildOutput, CompositionError> {
        let mut parts: Vec<(String, &Segment)> = Vec::new();
        if let Some(opening) = &script.opening {
            parts.push(("opening".to_string(), opening));
        }
        for (i, seg) in script.segments.iter().enumerate() {
            let id = seg.id.clone().unwrap_or_else(|| format!("segment_{}", i));
            parts.push((id, seg));
        }
        if let Some(closing) = &script.closing {
            parts.push(("closing".to_string(), closing));
        }

        self.build_narrative(VideoFormat::News, parts, script.combined_audio.as_ref())
    }

    /// Build a writing-coach flashcard composition. Part roles become
    /// the timeline entry ids.
    pub fn build_flashcards(
        &self,
        script: &FlashcardScript,
    ) -> Result<BuildOutput, CompositionError> {
        let parts: Vec<(String, &Segment)> = script
            .parts
            .iter()
            .map(|p| (p.role.clone(), &p.segment))
            .collect();

        self.build_narrative(
            VideoFormat::Flashcards,
            parts,
            script.combined_audio.as_ref(),
        )
    }

    /// Build a long-form explainer composition.
    pub fn build_explainer(
        &self,
        script: &ExplainerScript,
    ) -> Result<BuildOutput, CompositionError> {
        let parts: Vec<(String, &Segment)> = script
            .segments
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                let id = seg.id.clone().unwrap_or_else(|| format!("chapter_{}", i));
                (id, seg)
            })
            .collect();

        self.build_narrative(VideoFormat::Explainer, parts, None)
    }

    /// Build a quiz composition through the phase state machine.
    pub fn build_quiz(&self, script: &QuizScript) -> Result<BuildOutput, CompositionError> {
        let fps = self.checked_fps()?;
        let format = VideoFormat::Quiz;
        let profile = FormatProfile::for_format(format, &self.settings.formats);
        let ceiling = profile.ceiling_frames(fps);
        let mut diag = Diagnostics::new();

        self.log_phase(&format!("Building {} composition", format));

        let config = self.settings.quiz.timing_config(fps);
        let mut plan = QuizPlan::build(
            &script.audio,
            &config,
            self.settings.fades.windows(),
            &mut diag,
        );
        clamp_to_ceiling(&mut plan.timeline, ceiling, &mut diag);
        // Truncation can move or drop phase boundaries.
        let clock =
            QuizClock::from_timeline(&plan.timeline, plan.clock.silence_seconds, plan.clock.legacy);

        let timeline = plan.timeline;
        let total_frames = self.declared_total(timeline.total_frames, ceiling, false);

        let mut audio: Vec<AudioTrack> = if clock.legacy {
            script
                .combined_audio
                .as_ref()
                .map(|clip| vec![legacy_track(&clip.path, total_frames)])
                .unwrap_or_default()
        } else {
            let mut clips: HashMap<String, String> = HashMap::new();
            let mapping = [
                ("opening", &script.audio.opening),
                ("question", &script.audio.question),
                ("reveal", &script.audio.answer),
                ("closing", &script.audio.closing),
            ];
            for (id, clip) in mapping {
                if let Some(c) = clip {
                    clips.insert(id.to_string(), c.path.clone());
                }
            }
            schedule_narration(&timeline, &clips)
        };

        if !self.settings.quiz.countdown_music.is_empty() {
            if let Some(track) =
                schedule_ambient(&timeline, "thinking", &self.settings.quiz.countdown_music)
            {
                audio.push(track);
            }
        }

        let composition = Composition {
            format,
            fps,
            total_frames,
            timeline,
            audio,
            quiz: Some(clock),
        };
        composition.validate()?;

        self.finish(&composition, &diag);
        Ok(BuildOutput {
            composition,
            diagnostics: diag,
        })
    }

    /// Shared path for the narrative formats (news, flashcards,
    /// explainer): resolve per-part durations, lay out the timeline,
    /// schedule narration.
    fn build_narrative(
        &self,
        format: VideoFormat,
        parts: Vec<(String, &Segment)>,
        combined_audio: Option<&AudioClip>,
    ) -> Result<BuildOutput, CompositionError> {
        let fps = self.checked_fps()?;
        if parts.is_empty() {
            return Err(CompositionError::EmptyScript(format));
        }

        let profile = FormatProfile::for_format(format, &self.settings.formats);
        let ceiling = profile.ceiling_frames(fps);
        let mut diag = Diagnostics::new();

        self.log_phase(&format!("Building {} composition", format));
        tracing::debug!(
            format = %format,
            parts = parts.len(),
            ceiling_frames = ceiling,
            "resolving segment durations"
        );

        // Distribution target for estimated durations: the combined
        // track's measured length when one exists, the per-format
        // fallback otherwise. Ignored in explicit mode.
        let combined_frames = combined_audio
            .and_then(|c| c.duration_seconds)
            .map(|secs| seconds_to_frames(secs, fps));
        let target = combined_frames.unwrap_or_else(|| profile.fallback_frames(fps));
        let any_measured = parts.iter().any(|(_, s)| s.measured_seconds().is_some());
        let fully_estimated = !any_measured && combined_frames.is_none();

        let segments: Vec<&Segment> = parts.iter().map(|(_, s)| *s).collect();
        let resolver = DurationResolver::new(fps, self.settings.timing.min_segment_frames())
            .count_whitespace(self.settings.timing.count_whitespace);
        let durations = resolver.resolve(&segments, target, &mut diag)?;

        let phases: Vec<PhaseSpec> = parts
            .iter()
            .zip(&durations)
            .map(|((id, _), frames)| PhaseSpec::new(id.clone(), *frames))
            .collect();
        let timeline = TimelineBuilder::new(fps)
            .with_fades(self.settings.fades.windows())
            .build_clamped(&phases, ceiling, &mut diag);

        let total_frames = self.declared_total(timeline.total_frames, ceiling, fully_estimated);

        let mut clips: HashMap<String, String> = HashMap::new();
        for (id, seg) in &parts {
            if let Some(clip) = &seg.audio {
                clips.insert(id.clone(), clip.path.clone());
            }
        }
        let audio: Vec<AudioTrack> = if !clips.is_empty() {
            schedule_narration(&timeline, &clips)
        } else if let Some(clip) = combined_audio {
            vec![legacy_track(&clip.path, total_frames)]
        } else {
            Vec::new()
        };

        let composition = Composition {
            format,
            fps,
            total_frames,
            timeline,
            audio,
            quiz: None,
        };
        composition.validate()?;

        self.finish(&composition, &diag);
        Ok(BuildOutput {
            composition,
            diagnostics: diag,
        })
    }

    /// Validate the configured frame rate.
    fn checked_fps(&self) -> Result<f64, CompositionError> {
        let fps = self.settings.timing.fps;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CompositionError::InvalidFrameRate(fps));
        }
        Ok(fps)
    }

    /// Settle the declared total for a built timeline.
    ///
    /// A fully estimated timeline already sums to its distribution
    /// target, so it is declared as-is. Otherwise the safety buffer is
    /// appended so trailing fade-out animation is never truncated,
    /// capped at the ceiling and never below the timeline itself.
    fn declared_total(&self, timeline_total: u32, ceiling: u32, fully_estimated: bool) -> u32 {
        if fully_estimated {
            return timeline_total;
        }
        (timeline_total + self.settings.timing.safety_buffer_frames())
            .min(ceiling)
            .max(timeline_total)
    }

    fn log_phase(&self, message: &str) {
        if let Some(logger) = self.logger {
            logger.phase(message);
        }
    }

    fn finish(&self, composition: &Composition, diag: &Diagnostics) {
        tracing::info!(
            format = %composition.format,
            total_frames = composition.total_frames,
            entries = composition.timeline.len(),
            tracks = composition.audio.len(),
            warnings = diag.len(),
            "composition built"
        );
        if let Some(logger) = self.logger {
            logger.diagnostics(diag);
            logger.success(&format!(
                "{} composition: {} entries, {} frames ({:.1}s)",
                composition.format,
                composition.timeline.len(),
                composition.total_frames,
                composition.total_seconds()
            ));
        }
    }
}
