//! Common types shared across the scheduler.

use serde::{Deserialize, Serialize};

/// Volume level (0.0 to 1.0).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(from = "f32", into = "f32")]
pub struct Volume(f32);

impl Volume {
    pub const MIN: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);
    pub const DEFAULT: Self = Self(1.0);

    /// Create a volume, clamping into [0, 1]. NaN becomes silence.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub const fn as_f32(&self) -> f32 {
        self.0
    }

    /// Scale a catalog entry's relative volume by this bus level.
    pub fn scale(&self, relative: f32) -> f32 {
        self.0 * relative
    }

}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f32> for Volume {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Volume> for f32 {
    fn from(v: Volume) -> Self {
        v.0
    }
}

/// Levels of the three output buses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BusVolumes {
    #[serde(default)]
    pub music: Volume,
    #[serde(default)]
    pub sound: Volume,
    #[serde(default)]
    pub speech: Volume,
}
