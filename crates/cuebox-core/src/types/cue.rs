//! Cue and clip identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Name of a logical sound, decoupled from any file path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AudioCue(String);

impl AudioCue {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AudioCue {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identity of a clip as known to the host playback primitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Opaque clip reference handed to channels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClipHandle {
    /// Host clip identity.
    pub id: ClipId,
    /// Clip length in milliseconds.
    pub length_ms: u64,
}

impl ClipHandle {
    pub fn new(id: impl Into<String>, length: Duration) -> Self {
        Self {
            id: ClipId::new(id),
            length_ms: length.as_millis() as u64,
        }
    }

    /// Playback length of the clip.
    pub const fn length(&self) -> Duration {
        Duration::from_millis(self.length_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_length_round_trips_millis() {
        let clip = ClipHandle::new("pick.wav", Duration::from_millis(1250));
        assert_eq!(clip.length_ms, 1250);
        assert_eq!(clip.length(), Duration::from_millis(1250));
    }

    #[test]
    fn test_cue_serializes_as_plain_string() {
        let cue = AudioCue::new("correct_slot");
        assert_eq!(serde_json::to_string(&cue).ok().as_deref(), Some("\"correct_slot\""));
    }
}
