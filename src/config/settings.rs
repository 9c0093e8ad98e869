//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::quiz::QuizTimingConfig;
use crate::timeline::FadeWindows;
use crate::timing::seconds_to_frames;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Frame rate and duration defaults.
    #[serde(default)]
    pub timing: TimingSettings,

    /// Fade window lengths.
    #[serde(default)]
    pub fades: FadeSettings,

    /// Quiz phase defaults.
    #[serde(default)]
    pub quiz: QuizSettings,

    /// Per-format duration bounds.
    #[serde(default)]
    pub formats: FormatSettings,

    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Frame rate and duration defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Target frame rate for every composition.
    #[serde(default = "default_fps")]
    pub fps: f64,

    /// Minimum on-screen duration for an estimated segment, in seconds.
    #[serde(default = "default_min_segment_seconds")]
    pub min_segment_seconds: f64,

    /// Buffer appended when upstream under-declares the total duration,
    /// so trailing fade-out animation is never truncated.
    #[serde(default = "default_safety_buffer_seconds")]
    pub safety_buffer_seconds: f64,

    /// Count whitespace when estimating proportional durations.
    #[serde(default)]
    pub count_whitespace: bool,
}

fn default_fps() -> f64 {
    30.0
}

fn default_min_segment_seconds() -> f64 {
    1.5
}

fn default_safety_buffer_seconds() -> f64 {
    1.0
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            min_segment_seconds: default_min_segment_seconds(),
            safety_buffer_seconds: default_safety_buffer_seconds(),
            count_whitespace: false,
        }
    }
}

impl TimingSettings {
    /// Minimum segment duration in frames.
    pub fn min_segment_frames(&self) -> u32 {
        seconds_to_frames(self.min_segment_seconds, self.fps).max(1)
    }

    /// Safety buffer in frames.
    pub fn safety_buffer_frames(&self) -> u32 {
        seconds_to_frames(self.safety_buffer_seconds, self.fps)
    }
}

/// Fade window lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeSettings {
    /// Frames over which an entry fades in.
    #[serde(default = "default_fade_in")]
    pub fade_in_frames: u32,

    /// Frames over which an entry fades out.
    #[serde(default = "default_fade_out")]
    pub fade_out_frames: u32,
}

fn default_fade_in() -> u32 {
    15
}

fn default_fade_out() -> u32 {
    10
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            fade_in_frames: default_fade_in(),
            fade_out_frames: default_fade_out(),
        }
    }
}

impl FadeSettings {
    /// Convert to the timeline's fade window type.
    pub fn windows(&self) -> FadeWindows {
        FadeWindows {
            fade_in_frames: self.fade_in_frames,
            fade_out_frames: self.fade_out_frames,
        }
    }
}

/// Quiz phase defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Thinking-countdown duration when the script has no override.
    #[serde(default = "default_thinking_seconds")]
    pub thinking_seconds: f64,

    /// Substitute duration for a missing question/answer measurement.
    #[serde(default = "default_fallback_speech_seconds")]
    pub fallback_speech_seconds: f64,

    /// Total duration of the legacy two-phase timeline.
    #[serde(default = "default_legacy_total_seconds")]
    pub legacy_total_seconds: f64,

    /// Thinking span of the legacy timeline.
    #[serde(default = "default_thinking_seconds")]
    pub legacy_thinking_seconds: f64,

    /// Reveal buffer of the legacy timeline.
    #[serde(default = "default_legacy_reveal_seconds")]
    pub legacy_reveal_seconds: f64,

    /// Background clip scheduled under the thinking phase. Empty
    /// disables countdown music.
    #[serde(default)]
    pub countdown_music: String,
}

fn default_thinking_seconds() -> f64 {
    4.0
}

fn default_fallback_speech_seconds() -> f64 {
    5.0
}

fn default_legacy_total_seconds() -> f64 {
    20.0
}

fn default_legacy_reveal_seconds() -> f64 {
    2.0
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            thinking_seconds: default_thinking_seconds(),
            fallback_speech_seconds: default_fallback_speech_seconds(),
            legacy_total_seconds: default_legacy_total_seconds(),
            legacy_thinking_seconds: default_thinking_seconds(),
            legacy_reveal_seconds: default_legacy_reveal_seconds(),
            countdown_music: String::new(),
        }
    }
}

impl QuizSettings {
    /// Assemble the quiz timing config for the given frame rate.
    pub fn timing_config(&self, fps: f64) -> QuizTimingConfig {
        QuizTimingConfig {
            fps,
            thinking_seconds: self.thinking_seconds,
            fallback_speech_seconds: self.fallback_speech_seconds,
            legacy_total_seconds: self.legacy_total_seconds,
            legacy_thinking_seconds: self.legacy_thinking_seconds,
            legacy_reveal_seconds: self.legacy_reveal_seconds,
        }
    }
}

/// Per-format duration bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSettings {
    /// Hard platform ceiling for short-form reels, in seconds.
    #[serde(default = "default_short_max_seconds")]
    pub short_max_seconds: f64,

    /// Hard ceiling for long-form videos, in seconds.
    #[serde(default = "default_long_max_seconds")]
    pub long_max_seconds: f64,

    /// Distribution target for a short-form script with no measured
    /// audio at all.
    #[serde(default = "default_short_fallback_seconds")]
    pub short_fallback_seconds: f64,

    /// Distribution target for a long-form script with no measured
    /// audio at all.
    #[serde(default = "default_long_fallback_seconds")]
    pub long_fallback_seconds: f64,
}

fn default_short_max_seconds() -> f64 {
    59.0
}

fn default_long_max_seconds() -> f64 {
    1800.0
}

fn default_short_fallback_seconds() -> f64 {
    45.0
}

fn default_long_fallback_seconds() -> f64 {
    600.0
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            short_max_seconds: default_short_max_seconds(),
            long_max_seconds: default_long_max_seconds(),
            short_fallback_seconds: default_short_fallback_seconds(),
            long_fallback_seconds: default_long_fallback_seconds(),
        }
    }
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for per-render log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for render log output.
    #[serde(default)]
    pub level: LogLevel,

    /// Show timestamps in render log lines.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            show_timestamps: true,
        }
    }
}

/// Identifies one settings section for atomic section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Timing,
    Fades,
    Quiz,
    Formats,
    Paths,
    Logging,
}

impl ConfigSection {
    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Timing => "timing",
            ConfigSection::Fades => "fades",
            ConfigSection::Quiz => "quiz",
            ConfigSection::Formats => "formats",
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
        }
    }

    /// All sections in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Timing,
            ConfigSection::Fades,
            ConfigSection::Quiz,
            ConfigSection::Formats,
            ConfigSection::Paths,
            ConfigSection::Logging,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = EngineSettings::default();
        assert!((settings.timing.fps - 30.0).abs() < 1e-9);
        assert_eq!(settings.timing.min_segment_frames(), 45);
        assert_eq!(settings.fades.fade_in_frames, 15);
        assert_eq!(settings.fades.fade_out_frames, 10);
        assert!((settings.quiz.thinking_seconds - 4.0).abs() < 1e-9);
        assert!((settings.formats.short_max_seconds - 59.0).abs() < 1e-9);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: EngineSettings = toml::from_str("[timing]\nfps = 24.0\n").unwrap();
        assert!((settings.timing.fps - 24.0).abs() < 1e-9);
        // Untouched sections get defaults.
        assert_eq!(settings.fades.fade_in_frames, 15);
        assert!((settings.quiz.legacy_total_seconds - 20.0).abs() < 1e-9);
    }

    #[test]
    fn quiz_timing_config_carries_fps() {
        let settings = EngineSettings::default();
        let config = settings.quiz.timing_config(settings.timing.fps);
        assert!((config.fps - 30.0).abs() < 1e-9);
        assert!((config.legacy_reveal_seconds - 2.0).abs() < 1e-9);
    }
}
