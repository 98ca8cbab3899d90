//! Core domain types for cuebox.

pub mod common;
pub mod cue;
pub mod track;

pub use common::{BusVolumes, Volume};
pub use cue::{AudioCue, ClipHandle, ClipId};
pub use track::TrackEntry;
