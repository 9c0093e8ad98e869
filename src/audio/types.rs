//! Audio track data structures.

use serde::{Deserialize, Serialize};

/// Mixing channel a track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioChannel {
    /// Speech. Tracks on this channel must not overlap each other.
    Narration,
    /// Background audio (e.g. countdown music). May overlap narration.
    Ambient,
}

impl std::fmt::Display for AudioChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioChannel::Narration => write!(f, "narration"),
            AudioChannel::Ambient => write!(f, "ambient"),
        }
    }
}

/// One scheduled audio clip placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Path of the rendered clip.
    pub clip: String,
    /// Frame at which playback starts.
    pub start_frame: u32,
    /// Playback span in frames.
    pub duration_frames: u32,
    /// Mixing channel.
    pub channel: AudioChannel,
}

impl AudioTrack {
    /// One past the last frame of the track.
    pub fn end_frame(&self) -> u32 {
        self.start_frame + self.duration_frames
    }
}
