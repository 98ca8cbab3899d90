//! Error types for cuebox.

use thiserror::Error;

use crate::catalog::CatalogKind;

/// Result type alias using cuebox's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cuebox.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Music catalog is empty")]
    EmptyMusicCatalog,

    #[error("Duplicate cue '{cue}' in {catalog} catalog")]
    DuplicateCue { catalog: CatalogKind, cue: String },

    #[error("Duplicate clip '{clip}' in {catalog} catalog")]
    DuplicateClip { catalog: CatalogKind, clip: String },

    #[error("Volume {volume} for cue '{cue}' in {catalog} catalog is outside [0, 1]")]
    InvalidVolume {
        catalog: CatalogKind,
        cue: String,
        volume: f32,
    },

    #[error("Effect channel pool must have at least one channel")]
    NoEffectChannels,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Runtime errors
    #[error("Audio driver error: {0}")]
    Driver(String),
}

impl Error {
    /// Returns true if this error means the configuration cannot be used.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyMusicCatalog
                | Self::DuplicateCue { .. }
                | Self::DuplicateClip { .. }
                | Self::InvalidVolume { .. }
                | Self::NoEffectChannels
                | Self::Json(_)
        )
    }
}
