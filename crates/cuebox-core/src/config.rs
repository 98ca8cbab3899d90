//! Start-up configuration: catalogs, pool size and initial bus volumes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::catalog::Catalogs;
use crate::error::{Error, Result};
use crate::types::{BusVolumes, TrackEntry};

/// Effect channel count when the configuration does not name one.
pub const DEFAULT_EFFECT_CHANNELS: usize = 4;

const fn default_effect_channels() -> usize {
    DEFAULT_EFFECT_CHANNELS
}

/// Audio configuration, loaded once and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioConfig {
    /// Background music rotation.
    pub music: Vec<TrackEntry>,
    /// Prioritised sound effects.
    #[serde(default)]
    pub effects: Vec<TrackEntry>,
    /// Speech utterances.
    #[serde(default)]
    pub speech: Vec<TrackEntry>,
    /// Size of the effect channel pool.
    #[serde(default = "default_effect_channels")]
    pub effect_channels: usize,
    /// Initial bus volumes.
    #[serde(default)]
    pub volumes: BusVolumes,
}

impl AudioConfig {
    pub fn new(music: Vec<TrackEntry>) -> Self {
        Self {
            music,
            effects: Vec::new(),
            speech: Vec::new(),
            effect_channels: DEFAULT_EFFECT_CHANNELS,
            volumes: BusVolumes::default(),
        }
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Vec<TrackEntry>) -> Self {
        self.effects = effects;
        self
    }

    #[must_use]
    pub fn with_speech(mut self, speech: Vec<TrackEntry>) -> Self {
        self.speech = speech;
        self
    }

    #[must_use]
    pub fn with_effect_channels(mut self, count: usize) -> Self {
        self.effect_channels = count;
        self
    }

    #[must_use]
    pub fn with_volumes(mut self, volumes: BusVolumes) -> Self {
        self.volumes = volumes;
        self
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        debug!(
            "Parsed audio config: {} music, {} effects, {} speech, {} effect channels",
            config.music.len(),
            config.effects.len(),
            config.speech.len(),
            config.effect_channels
        );
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded audio config from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration and build its catalogs.
    pub fn catalogs(&self) -> Result<Catalogs> {
        if self.effect_channels == 0 {
            return Err(Error::NoEffectChannels);
        }
        Catalogs::new(
            self.music.clone(),
            self.effects.clone(),
            self.speech.clone(),
        )
    }
}
