//! Catalog entry describing one playable cue.

use serde::{Deserialize, Serialize};

use super::{AudioCue, ClipHandle};

fn default_entry_volume() -> f32 {
    1.0
}

/// A single catalog entry. Immutable once loaded into a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackEntry {
    /// Logical cue this entry answers to.
    pub cue: AudioCue,
    /// Clip to load onto a channel.
    pub clip: ClipHandle,
    /// Relative volume in [0, 1], multiplied with the bus volume.
    #[serde(default = "default_entry_volume")]
    pub volume: f32,
    /// Eviction priority. Only meaningful in the effects catalog.
    #[serde(default)]
    pub priority: i32,
}

impl TrackEntry {
    pub fn new(cue: impl Into<AudioCue>, clip: ClipHandle) -> Self {
        Self {
            cue: cue.into(),
            clip,
            volume: 1.0,
            priority: 0,
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}
