//! Single-slot speech mailbox drained onto a dedicated channel.

use cuebox_core::{AudioCue, TrackCatalog, TrackEntry, Volume};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::channel::{start_clip, Channel};

/// Where the speech loop currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpeechState {
    /// Nothing playing and nothing pending; polled every tick.
    #[default]
    Idle,
    /// An utterance started; nothing else starts until `elapsed >= length`.
    Speaking {
        cue: AudioCue,
        elapsed: Duration,
        length: Duration,
    },
    /// The utterance time is up but the channel still reports playing.
    AwaitingChannel,
}

/// Result of a speech request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechRequest {
    /// Stored in the empty pending slot.
    Queued,
    /// Stored, discarding an older request that never started.
    Superseded(AudioCue),
    /// The cue is not in the speech catalog. A miss never clears the pending
    /// slot; an earlier request still plays.
    NotFound,
}

/// Serializes utterances: at most one pending, never two overlapping.
pub struct SpeechQueue<C> {
    catalog: TrackCatalog,
    channel: C,
    pending: Option<TrackEntry>,
    state: SpeechState,
}

impl<C: Channel> SpeechQueue<C> {
    pub fn new(catalog: TrackCatalog, channel: C) -> Self {
        Self {
            catalog,
            channel,
            pending: None,
            state: SpeechState::Idle,
        }
    }

    pub const fn state(&self) -> &SpeechState {
        &self.state
    }

    pub const fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub const fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// The request that will play next, if any.
    pub const fn pending(&self) -> Option<&TrackEntry> {
        self.pending.as_ref()
    }

    /// Overwrite the pending slot with `cue`. Last caller wins.
    pub fn request(&mut self, cue: &AudioCue) -> SpeechRequest {
        let Some(entry) = self.catalog.lookup_by_cue(cue) else {
            warn!("Speech not found: '{cue}'");
            return SpeechRequest::NotFound;
        };

        match self.pending.replace(entry.clone()) {
            Some(previous) => {
                debug!("Speech '{}' superseded by '{cue}'", previous.cue);
                SpeechRequest::Superseded(previous.cue)
            }
            None => SpeechRequest::Queued,
        }
    }

    /// Advance the speech loop by `elapsed`. Returns the entry that started
    /// playing during this tick, if any.
    pub fn tick(&mut self, elapsed: Duration, volume: Volume) -> Option<&TrackEntry> {
        if let SpeechState::Speaking {
            elapsed: spoken,
            length,
            ..
        } = &mut self.state
        {
            *spoken += elapsed;
            if *spoken < *length {
                return None;
            }
        }

        if self.channel.is_playing() {
            self.state = SpeechState::AwaitingChannel;
            return None;
        }

        let Some(entry) = self.pending.take() else {
            self.state = SpeechState::Idle;
            return None;
        };

        start_clip(&mut self.channel, &entry.clip, volume.scale(entry.volume));
        info!("Speech: playing '{}'", entry.cue);

        self.state = SpeechState::Speaking {
            cue: entry.cue.clone(),
            elapsed: Duration::ZERO,
            length: entry.clip.length(),
        };
        self.catalog.lookup_by_cue(&entry.cue)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

    use super::*;
    use crate::sim::SimChannel;
    use cuebox_core::{CatalogKind, ClipHandle};

    const FRAME: Duration = Duration::from_millis(16);

    fn queue() -> SpeechQueue<SimChannel> {
        let entries = vec![
            TrackEntry::new("green", ClipHandle::new("green.ogg", Duration::from_millis(800))),
            TrackEntry::new("blue", ClipHandle::new("blue.ogg", Duration::from_millis(600)))
                .with_volume(0.5),
        ];
        SpeechQueue::new(
            TrackCatalog::new(CatalogKind::Speech, entries).unwrap(),
            SimChannel::new("speech"),
        )
    }

    fn loaded(queue: &SpeechQueue<SimChannel>) -> Option<String> {
        queue.channel().current_clip().map(|clip| clip.id.to_string())
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut speech = queue();
        assert!(speech.tick(FRAME, Volume::MAX).is_none());
        assert_eq!(speech.state(), &SpeechState::Idle);
        assert!(speech.channel().current_clip().is_none());
    }

    #[test]
    fn test_request_plays_on_next_tick_and_clears_slot() {
        let mut speech = queue();
        assert_eq!(speech.request(&"green".into()), SpeechRequest::Queued);

        let started = speech.tick(FRAME, Volume::MAX).unwrap();
        assert_eq!(started.cue.as_str(), "green");
        assert!(speech.pending().is_none());
        assert!(speech.channel().is_playing());
    }

    #[test]
    fn test_last_request_wins() {
        let mut speech = queue();
        speech.request(&"green".into());
        assert_eq!(
            speech.request(&"blue".into()),
            SpeechRequest::Superseded("green".into())
        );

        speech.tick(FRAME, Volume::MAX);
        assert_eq!(loaded(&speech).as_deref(), Some("blue.ogg"));

        // Play the whole utterance out; green must never surface
        for _ in 0..100 {
            speech.channel_mut().advance(FRAME);
            speech.tick(FRAME, Volume::MAX);
            assert_eq!(loaded(&speech).as_deref(), Some("blue.ogg"));
        }
        assert_eq!(speech.channel().play_count(), 1);
    }

    #[test]
    fn test_request_during_playback_waits_for_next_cycle() {
        let mut speech = queue();
        speech.request(&"green".into());
        speech.tick(Duration::ZERO, Volume::MAX);

        assert_eq!(speech.request(&"blue".into()), SpeechRequest::Queued);
        assert!(speech.tick(Duration::from_millis(500), Volume::MAX).is_none());
        assert_eq!(loaded(&speech).as_deref(), Some("green.ogg"));

        speech.channel_mut().advance(Duration::from_millis(800));
        let started = speech.tick(Duration::from_millis(300), Volume::MAX).unwrap();
        assert_eq!(started.cue.as_str(), "blue");
    }

    #[test]
    fn test_waits_for_channel_after_timer() {
        let mut speech = queue();
        speech.request(&"green".into());
        speech.tick(Duration::ZERO, Volume::MAX);
        speech.request(&"blue".into());

        // Timer is up, but the host has not reported the clip finished
        assert!(speech.tick(Duration::from_millis(800), Volume::MAX).is_none());
        assert_eq!(speech.state(), &SpeechState::AwaitingChannel);
        assert!(speech.tick(FRAME, Volume::MAX).is_none());

        speech.channel_mut().stop();
        let started = speech.tick(FRAME, Volume::MAX).unwrap();
        assert_eq!(started.cue.as_str(), "blue");
    }

    #[test]
    fn test_unknown_cue_keeps_pending() {
        let mut speech = queue();
        speech.request(&"green".into());
        assert_eq!(speech.request(&"purple".into()), SpeechRequest::NotFound);
        assert_eq!(speech.pending().unwrap().cue.as_str(), "green");
        assert!(speech.channel().current_clip().is_none());

        let started = speech.tick(FRAME, Volume::MAX).unwrap();
        assert_eq!(started.cue.as_str(), "green");
    }

    #[test]
    fn test_volume_is_bus_times_entry() {
        let mut speech = queue();
        speech.request(&"blue".into());
        speech.tick(FRAME, Volume::new(0.6));
        assert!((speech.channel().volume() - 0.3).abs() < 1e-6);
    }
}
