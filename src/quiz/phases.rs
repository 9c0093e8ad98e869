//! Quiz phase thresholds, state lookup, and countdown derivation.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::script::{AudioClip, QuizAudio};
use crate::timeline::{FadeWindows, PhaseSpec, Timeline, TimelineBuilder};
use crate::timing::seconds_to_frames;

/// Phase of a quiz composition.
///
/// Phases occur in this fixed order, each entered exactly once, with no
/// backward transitions. OPENING and CLOSING are optional; QUESTION,
/// THINKING, and REVEAL are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizState {
    Opening,
    Question,
    Thinking,
    Reveal,
    Closing,
}

impl std::fmt::Display for QuizState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizState::Opening => write!(f, "opening"),
            QuizState::Question => write!(f, "question"),
            QuizState::Thinking => write!(f, "thinking"),
            QuizState::Reveal => write!(f, "reveal"),
            QuizState::Closing => write!(f, "closing"),
        }
    }
}

/// Timing defaults for quiz phase construction.
#[derive(Debug, Clone)]
pub struct QuizTimingConfig {
    /// Target frame rate.
    pub fps: f64,
    /// Thinking-countdown duration when the script does not override it.
    pub thinking_seconds: f64,
    /// Substitute duration for a mandatory speech phase whose clip is
    /// missing or unmeasured.
    pub fallback_speech_seconds: f64,
    /// Total duration of the legacy two-phase timeline.
    pub legacy_total_seconds: f64,
    /// Thinking span of the legacy timeline.
    pub legacy_thinking_seconds: f64,
    /// Reveal buffer of the legacy timeline.
    pub legacy_reveal_seconds: f64,
}

impl Default for QuizTimingConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            thinking_seconds: 4.0,
            fallback_speech_seconds: 5.0,
            legacy_total_seconds: 20.0,
            legacy_thinking_seconds: 4.0,
            legacy_reveal_seconds: 2.0,
        }
    }
}

/// Transition points between quiz phases, in absolute frames.
///
/// A phase with no content has a threshold equal to its predecessor's
/// (zero-length span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizThresholds {
    pub opening_end: u32,
    pub question_end: u32,
    pub thinking_end: u32,
    pub reveal_end: u32,
    pub closing_end: u32,
}

/// The queryable quiz state machine: frame thresholds plus countdown
/// parameters, computed once at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizClock {
    /// Absolute frame thresholds between phases.
    pub thresholds: QuizThresholds,
    /// Thinking-countdown duration in seconds.
    pub silence_seconds: f64,
    /// True when built from the legacy single-track fallback.
    pub legacy: bool,
}

impl QuizClock {
    /// Derive thresholds from a built phase timeline.
    ///
    /// Also used to re-derive the clock after a timeline has been
    /// truncated to a duration ceiling, so thresholds never point past
    /// the timeline's end.
    pub fn from_timeline(timeline: &Timeline, silence_seconds: f64, legacy: bool) -> Self {
        let end_of = |id: &str, fallback: u32| -> u32 {
            timeline.entry(id).map(|e| e.end_frame).unwrap_or(fallback)
        };

        let opening_end = end_of("opening", 0);
        let question_end = end_of("question", opening_end);
        let thinking_end = end_of("thinking", question_end);
        let reveal_end = end_of("reveal", thinking_end);
        let closing_end = end_of("closing", reveal_end);

        Self {
            thresholds: QuizThresholds {
                opening_end,
                question_end,
                thinking_end,
                reveal_end,
                closing_end,
            },
            silence_seconds,
            legacy,
        }
    }

    /// Active phase at `frame`, clamped to the final phase for
    /// out-of-range frames.
    pub fn state_at(&self, frame: u32) -> QuizState {
        let t = &self.thresholds;
        if frame < t.opening_end {
            QuizState::Opening
        } else if frame < t.question_end {
            QuizState::Question
        } else if frame < t.thinking_end {
            QuizState::Thinking
        } else if frame < t.reveal_end {
            QuizState::Reveal
        } else if t.closing_end > t.reveal_end {
            QuizState::Closing
        } else {
            QuizState::Reveal
        }
    }

    /// Countdown value shown during THINKING ("3…2…1"), `None` outside
    /// the thinking phase.
    ///
    /// Reaches exactly 0 on the last thinking frame and is never
    /// negative.
    pub fn seconds_left(&self, frame: u32) -> Option<u32> {
        if self.state_at(frame) != QuizState::Thinking {
            return None;
        }
        let start = self.thresholds.question_end;
        let span = self.thresholds.thinking_end - start;
        let elapsed = (frame - start + 1).min(span);
        let progress = elapsed as f64 / span as f64;
        Some((self.silence_seconds * (1.0 - progress)).ceil().max(0.0) as u32)
    }
}

/// The resolved quiz timing plan: phase timeline plus its state machine.
#[derive(Debug, Clone)]
pub struct QuizPlan {
    /// Phase timeline (entry ids: "opening", "question", "thinking",
    /// "reveal", "closing"; optional phases absent).
    pub timeline: Timeline,
    /// Queryable phase state machine.
    pub clock: QuizClock,
}

impl QuizPlan {
    /// Build the phase plan from per-phase audio metadata.
    ///
    /// Missing QUESTION or REVEAL measurements substitute
    /// `fallback_speech_seconds` with a warning; a missing thinking
    /// duration defaults silently (expected, common case). When no
    /// per-phase clip exists at all, collapses to the legacy two-phase
    /// layout: THINKING occupies the configured window before a short
    /// REVEAL buffer at the end of a fixed total duration.
    pub fn build(
        audio: &QuizAudio,
        config: &QuizTimingConfig,
        fades: FadeWindows,
        diag: &mut Diagnostics,
    ) -> QuizPlan {
        if audio.is_empty() {
            return Self::build_legacy(config, fades);
        }

        let silence_seconds = audio.silence_seconds.unwrap_or(config.thinking_seconds);

        let opening = optional_phase_frames(&audio.opening, "opening", config, diag);
        let question = mandatory_phase_frames(&audio.question, "question", config, diag);
        let thinking = seconds_to_frames(silence_seconds, config.fps);
        let reveal = mandatory_phase_frames(&audio.answer, "answer", config, diag);
        let closing = optional_phase_frames(&audio.closing, "closing", config, diag);

        let timeline = TimelineBuilder::new(config.fps).with_fades(fades).build(&[
            PhaseSpec::new("opening", opening),
            PhaseSpec::new("question", question),
            PhaseSpec::new("thinking", thinking),
            PhaseSpec::new("reveal", reveal),
            PhaseSpec::new("closing", closing),
        ]);

        let clock = QuizClock::from_timeline(&timeline, silence_seconds, false);
        QuizPlan { timeline, clock }
    }

    /// Legacy two-phase layout for content with only a single combined
    /// audio track: question up front, thinking window, short reveal
    /// buffer at the end.
    fn build_legacy(config: &QuizTimingConfig, fades: FadeWindows) -> QuizPlan {
        let total = seconds_to_frames(config.legacy_total_seconds, config.fps);
        let thinking = seconds_to_frames(config.legacy_thinking_seconds, config.fps);
        let reveal = seconds_to_frames(config.legacy_reveal_seconds, config.fps);
        let question = total.saturating_sub(thinking + reveal);

        let timeline = TimelineBuilder::new(config.fps).with_fades(fades).build(&[
            PhaseSpec::new("question", question),
            PhaseSpec::new("thinking", thinking),
            PhaseSpec::new("reveal", reveal),
        ]);

        let clock = QuizClock::from_timeline(&timeline, config.legacy_thinking_seconds, true);
        QuizPlan { timeline, clock }
    }

    /// Total plan length in frames.
    pub fn total_frames(&self) -> u32 {
        self.timeline.total_frames
    }
}

/// Frame span for an optional phase: zero (skipped) when the clip is
/// absent; a warned fallback when the clip exists but was not measured.
fn optional_phase_frames(
    clip: &Option<AudioClip>,
    name: &str,
    config: &QuizTimingConfig,
    diag: &mut Diagnostics,
) -> u32 {
    match clip {
        None => 0,
        Some(c) => match c.duration_seconds {
            Some(secs) => seconds_to_frames(secs, config.fps),
            None => {
                diag.warn(
                    WarningKind::MissingMeasurement,
                    format!(
                        "Quiz {} clip '{}' has no measured duration; using {}s",
                        name, c.path, config.fallback_speech_seconds
                    ),
                );
                seconds_to_frames(config.fallback_speech_seconds, config.fps)
            }
        },
    }
}

/// Frame span for a mandatory phase: a warned fixed default when the
/// clip is missing or unmeasured.
fn mandatory_phase_frames(
    clip: &Option<AudioClip>,
    name: &str,
    config: &QuizTimingConfig,
    diag: &mut Diagnostics,
) -> u32 {
    match clip.as_ref().and_then(|c| c.duration_seconds) {
        Some(secs) => seconds_to_frames(secs, config.fps),
        None => {
            diag.warn(
                WarningKind::MissingMeasurement,
                format!(
                    "Quiz {} duration missing; substituting {}s default",
                    name, config.fallback_speech_seconds
                ),
            );
            seconds_to_frames(config.fallback_speech_seconds, config.fps)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::AudioClip;
    use crate::timeline::FadeWindows;

    fn full_audio() -> QuizAudio {
        QuizAudio {
            opening: Some(AudioClip::measured("opening.mp3", 2.0)),
            question: Some(AudioClip::measured("question.mp3", 5.0)),
            answer: Some(AudioClip::measured("answer.mp3", 6.0)),
            closing: Some(AudioClip::measured("closing.mp3", 3.0)),
            silence_seconds: Some(4.0),
        }
    }

    fn build(audio: &QuizAudio) -> (QuizPlan, Diagnostics) {
        let mut diag = Diagnostics::new();
        let plan = QuizPlan::build(
            audio,
            &QuizTimingConfig::default(),
            FadeWindows::default(),
            &mut diag,
        );
        (plan, diag)
    }

    #[test]
    fn thresholds_are_cumulative() {
        let (plan, diag) = build(&full_audio());

        // 30 fps: 2s/5s/4s/6s/3s -> 60/150/120/180/90 frames.
        let t = &plan.clock.thresholds;
        assert_eq!(t.opening_end, 60);
        assert_eq!(t.question_end, 210);
        assert_eq!(t.thinking_end, 330);
        assert_eq!(t.reveal_end, 510);
        assert_eq!(t.closing_end, 600);
        assert_eq!(plan.total_frames(), 600);
        assert!(diag.is_empty());
        plan.timeline.validate().unwrap();
    }

    #[test]
    fn states_follow_fixed_order() {
        let (plan, _) = build(&full_audio());
        let clock = &plan.clock;

        assert_eq!(clock.state_at(0), QuizState::Opening);
        assert_eq!(clock.state_at(60), QuizState::Question);
        assert_eq!(clock.state_at(209), QuizState::Question);
        assert_eq!(clock.state_at(210), QuizState::Thinking);
        assert_eq!(clock.state_at(329), QuizState::Thinking);
        assert_eq!(clock.state_at(330), QuizState::Reveal);
        assert_eq!(clock.state_at(510), QuizState::Closing);
        // Out-of-range clamps to the final phase.
        assert_eq!(clock.state_at(10_000), QuizState::Closing);
    }

    #[test]
    fn countdown_reaches_zero_on_last_thinking_frame() {
        let (plan, _) = build(&full_audio());
        let clock = &plan.clock;
        let start = clock.thresholds.question_end;
        let end = clock.thresholds.thinking_end;

        assert_eq!(clock.seconds_left(start), Some(4));
        assert_eq!(clock.seconds_left(end - 1), Some(0));
        assert_eq!(clock.seconds_left(start - 1), None);
        assert_eq!(clock.seconds_left(end), None);

        // Monotonically non-increasing across the span.
        let mut prev = u32::MAX;
        for frame in start..end {
            let left = clock.seconds_left(frame).unwrap();
            assert!(left <= prev);
            prev = left;
        }
    }

    #[test]
    fn missing_optional_phases_are_skipped_silently() {
        let audio = QuizAudio {
            opening: None,
            closing: None,
            ..full_audio()
        };
        let (plan, diag) = build(&audio);
        let clock = &plan.clock;

        assert_eq!(clock.thresholds.opening_end, 0);
        assert_eq!(clock.state_at(0), QuizState::Question);
        assert_eq!(clock.thresholds.closing_end, clock.thresholds.reveal_end);
        assert_eq!(clock.state_at(plan.total_frames()), QuizState::Reveal);
        assert!(diag.is_empty());
    }

    #[test]
    fn missing_mandatory_phases_default_with_warning() {
        let audio = QuizAudio {
            question: None,
            answer: Some(AudioClip::unmeasured("answer.mp3")),
            ..full_audio()
        };
        let (plan, diag) = build(&audio);
        let t = &plan.clock.thresholds;

        // Both default to 5s = 150 frames.
        assert_eq!(t.question_end - t.opening_end, 150);
        assert_eq!(t.reveal_end - t.thinking_end, 150);
        assert_eq!(
            diag.warnings()
                .iter()
                .filter(|w| w.kind == WarningKind::MissingMeasurement)
                .count(),
            2
        );
    }

    #[test]
    fn missing_silence_defaults_without_warning() {
        let audio = QuizAudio {
            silence_seconds: None,
            ..full_audio()
        };
        let (plan, diag) = build(&audio);

        assert!((plan.clock.silence_seconds - 4.0).abs() < 1e-9);
        let t = &plan.clock.thresholds;
        assert_eq!(t.thinking_end - t.question_end, 120);
        assert!(diag.is_empty());
    }

    #[test]
    fn no_audio_collapses_to_legacy_layout() {
        let (plan, _) = build(&QuizAudio::default());

        assert!(plan.clock.legacy);
        // 20s total at 30fps: question 14s, thinking 4s, reveal 2s.
        assert_eq!(plan.total_frames(), 600);
        assert_eq!(plan.clock.state_at(0), QuizState::Question);
        assert_eq!(plan.clock.state_at(420), QuizState::Thinking);
        assert_eq!(plan.clock.state_at(540), QuizState::Reveal);
        plan.timeline.validate().unwrap();
    }

    #[test]
    fn clock_rederives_from_truncated_timeline() {
        let (mut plan, _) = build(&full_audio());

        // Drop the closing entry as a ceiling truncation would.
        plan.timeline.entries.pop();
        plan.timeline.total_frames = 510;
        let clock = QuizClock::from_timeline(&plan.timeline, 4.0, false);

        assert_eq!(clock.thresholds.reveal_end, 510);
        assert_eq!(clock.thresholds.closing_end, 510);
        assert_eq!(clock.state_at(509), QuizState::Reveal);
        assert_eq!(clock.state_at(9_999), QuizState::Reveal);
    }
}
