//! Read-only track catalogs with forward (cue) and reverse (clip) indexes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::types::{AudioCue, ClipId, TrackEntry};

/// Which of the three disjoint catalogs a [`TrackCatalog`] holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Music,
    Effects,
    Speech,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Music => "music",
            Self::Effects => "effects",
            Self::Speech => "speech",
        })
    }
}

/// Immutable catalog of entries, built once at start-up.
#[derive(Debug, Clone)]
pub struct TrackCatalog {
    kind: CatalogKind,
    entries: Vec<TrackEntry>,
    by_cue: HashMap<AudioCue, usize>,
    by_clip: HashMap<ClipId, usize>,
}

impl TrackCatalog {
    /// Build a catalog, rejecting duplicate cues, duplicate clips and
    /// out-of-range entry volumes.
    pub fn new(kind: CatalogKind, entries: Vec<TrackEntry>) -> Result<Self> {
        let mut by_cue = HashMap::with_capacity(entries.len());
        let mut by_clip = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if !(0.0..=1.0).contains(&entry.volume) {
                return Err(Error::InvalidVolume {
                    catalog: kind,
                    cue: entry.cue.to_string(),
                    volume: entry.volume,
                });
            }
            if by_cue.insert(entry.cue.clone(), index).is_some() {
                return Err(Error::DuplicateCue {
                    catalog: kind,
                    cue: entry.cue.to_string(),
                });
            }
            if by_clip.insert(entry.clip.id.clone(), index).is_some() {
                return Err(Error::DuplicateClip {
                    catalog: kind,
                    clip: entry.clip.id.to_string(),
                });
            }
        }

        Ok(Self {
            kind,
            entries,
            by_cue,
            by_clip,
        })
    }

    pub const fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry answering to `cue`.
    pub fn lookup_by_cue(&self, cue: &AudioCue) -> Option<&TrackEntry> {
        self.by_cue.get(cue).map(|&i| &self.entries[i])
    }

    /// Recover the entry whose clip is `clip`, e.g. from a channel's loaded clip.
    pub fn lookup_by_clip(&self, clip: &ClipId) -> Option<&TrackEntry> {
        self.by_clip.get(clip).map(|&i| &self.entries[i])
    }
}

/// The three catalogs the schedulers draw from.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub music: TrackCatalog,
    pub effects: TrackCatalog,
    pub speech: TrackCatalog,
}

impl Catalogs {
    pub fn new(
        music: Vec<TrackEntry>,
        effects: Vec<TrackEntry>,
        speech: Vec<TrackEntry>,
    ) -> Result<Self> {
        let music = TrackCatalog::new(CatalogKind::Music, music)?;
        if music.is_empty() {
            return Err(Error::EmptyMusicCatalog);
        }

        Ok(Self {
            music,
            effects: TrackCatalog::new(CatalogKind::Effects, effects)?,
            speech: TrackCatalog::new(CatalogKind::Speech, speech)?,
        })
    }
}
