//! Script and audio-metadata structures (serde models of upstream JSON).

use serde::{Deserialize, Serialize};

/// Reference to a rendered narration clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    /// Path of the rendered clip, relative to the renderer's asset root.
    pub path: String,
    /// Measured clip duration in seconds.
    ///
    /// Absent when the TTS step was skipped or failed; the engine then
    /// falls back to character-proportional estimation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl AudioClip {
    /// Create a clip reference with a measured duration.
    pub fn measured(path: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            path: path.into(),
            duration_seconds: Some(duration_seconds),
        }
    }

    /// Create a clip reference without a measurement.
    pub fn unmeasured(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            duration_seconds: None,
        }
    }
}

/// One narrated content unit (a sentence, flashcard part, or chapter chunk).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Stable identifier within the script. Used as the timeline entry id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Primary on-screen/narrated text.
    pub text: String,
    /// Optional translated/subtitle text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Rendered narration clip, if the TTS step produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioClip>,
}

impl Segment {
    /// Create a text-only segment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            translation: None,
            audio: None,
        }
    }

    /// Attach an id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach a narration clip.
    pub fn with_audio(mut self, audio: AudioClip) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Measured duration in seconds, if the clip was measured.
    pub fn measured_seconds(&self) -> Option<f64> {
        self.audio.as_ref().and_then(|a| a.duration_seconds)
    }

    /// Character count of the primary text.
    ///
    /// Counts Unicode scalar values, optionally excluding whitespace, so
    /// CJK scripts weigh the same as Latin text.
    pub fn char_count(&self, count_whitespace: bool) -> usize {
        if count_whitespace {
            self.text.chars().count()
        } else {
            self.text.chars().filter(|c| !c.is_whitespace()).count()
        }
    }
}

/// News-style talking segment reel: optional opening and closing around
/// an ordered list of content segments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening: Option<Segment>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<Segment>,
    /// Single combined narration track, present only in legacy content
    /// that predates per-segment audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_audio: Option<AudioClip>,
}

/// One part of a writing-coach flashcard reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardPart {
    /// Role of this part within the card sequence (e.g. "intro",
    /// "outline_1", "conclusion"). Becomes the timeline entry id.
    pub role: String,
    #[serde(flatten)]
    pub segment: Segment,
}

/// Multi-part writing-coach flashcard reel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardScript {
    #[serde(default)]
    pub parts: Vec<FlashcardPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_audio: Option<AudioClip>,
}

/// Per-phase narration clips for a quiz reel.
///
/// Any clip may be absent; the phase machine substitutes defaults and
/// records warnings for the mandatory phases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizAudio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening: Option<AudioClip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<AudioClip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AudioClip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<AudioClip>,
    /// Thinking-countdown duration override in seconds. Defaulting this
    /// is expected and silent (no warning).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silence_seconds: Option<f64>,
}

impl QuizAudio {
    /// True if no per-phase clip exists at all (legacy single-track
    /// content, or TTS skipped entirely).
    pub fn is_empty(&self) -> bool {
        self.opening.is_none()
            && self.question.is_none()
            && self.answer.is_none()
            && self.closing.is_none()
    }
}

/// Multiple-choice quiz reel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizScript {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Index of the correct option.
    #[serde(default)]
    pub answer_index: usize,
    /// Explanation read during the reveal.
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub audio: QuizAudio,
    /// Single combined narration track for legacy content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_audio: Option<AudioClip>,
}

/// Long-form chaptered explainer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplainerScript {
    #[serde(default)]
    pub title: String,
    /// Chapter chunks in playback order. Each segment's `id` carries its
    /// section label (e.g. "hook", "example_2", "recap").
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_char_count_excludes_whitespace() {
        let seg = Segment::new("오늘의 뉴스");
        assert_eq!(seg.char_count(true), 6);
        assert_eq!(seg.char_count(false), 5);
    }

    #[test]
    fn measured_seconds_requires_measurement() {
        let seg = Segment::new("hello").with_audio(AudioClip::unmeasured("a.mp3"));
        assert_eq!(seg.measured_seconds(), None);

        let seg = Segment::new("hello").with_audio(AudioClip::measured("a.mp3", 2.5));
        assert_eq!(seg.measured_seconds(), Some(2.5));
    }

    #[test]
    fn news_script_deserializes_from_pipeline_json() {
        let json = r#"{
            "opening": {"text": "안녕하세요", "audio": {"path": "opening.mp3", "duration_seconds": 2.1}},
            "segments": [
                {"text": "첫 번째 문장", "translation": "Câu đầu tiên",
                 "audio": {"path": "seg_0.mp3", "duration_seconds": 3.4}}
            ],
            "closing": {"text": "내일 만나요"}
        }"#;

        let script: NewsScript = serde_json::from_str(json).unwrap();
        assert_eq!(script.segments.len(), 1);
        assert_eq!(script.segments[0].measured_seconds(), Some(3.4));
        assert!(script.closing.as_ref().unwrap().audio.is_none());
    }

    #[test]
    fn quiz_audio_empty_detection() {
        let audio = QuizAudio::default();
        assert!(audio.is_empty());

        let audio = QuizAudio {
            question: Some(AudioClip::measured("q.mp3", 4.0)),
            ..Default::default()
        };
        assert!(!audio.is_empty());
    }

    #[test]
    fn flashcard_part_flattens_segment() {
        let json = r#"{"role": "intro", "text": "주제 소개", "translation": "Giới thiệu"}"#;
        let part: FlashcardPart = serde_json::from_str(json).unwrap();
        assert_eq!(part.role, "intro");
        assert_eq!(part.segment.text, "주제 소개");
    }
}
