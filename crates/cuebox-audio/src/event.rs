//! Events published by the facade for observers (UI, logging, tests).

use cuebox_core::{AudioCue, CatalogKind};

use crate::channel::ChannelId;

/// Something the schedulers did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// A music track started.
    MusicStarted(AudioCue),
    /// An effect started on a pool channel, possibly cutting another off.
    EffectStarted {
        cue: AudioCue,
        channel: ChannelId,
        evicted: Option<AudioCue>,
    },
    /// An effect was dropped because every channel was busy.
    EffectDropped(AudioCue),
    /// An utterance started on the speech channel.
    SpeechStarted(AudioCue),
    /// A pending utterance was replaced before it started.
    SpeechSuperseded { dropped: AudioCue, by: AudioCue },
    /// A request named a cue its catalog does not have.
    CueNotFound { catalog: CatalogKind, cue: AudioCue },
}
