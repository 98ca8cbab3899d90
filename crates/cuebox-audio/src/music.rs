//! Background music rotation on a dedicated channel.

use cuebox_core::{AudioCue, Error, Result, TrackCatalog, TrackEntry, Volume};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

use crate::channel::{start_clip, Channel};

/// Catalog size from which back-to-back repeats are suppressed.
const MIN_TRACKS_FOR_NO_REPEAT: usize = 2;

/// Where the music rotation currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MusicState {
    /// Nothing started yet.
    #[default]
    Idle,
    /// A track is playing; the next draw happens once `elapsed >= length`.
    Playing {
        cue: AudioCue,
        elapsed: Duration,
        length: Duration,
    },
}

/// Picks music tracks at random, never the same one twice in a row when the
/// catalog has at least two entries.
pub struct MusicScheduler<C, R = StdRng> {
    catalog: TrackCatalog,
    channel: C,
    rng: R,
    /// Indices that may be drawn next.
    remaining: Vec<usize>,
    last_played: Option<usize>,
    state: MusicState,
}

impl<C: Channel> MusicScheduler<C> {
    pub fn new(catalog: TrackCatalog, channel: C) -> Result<Self> {
        Self::with_rng(catalog, channel, StdRng::from_entropy())
    }
}

impl<C: Channel, R: Rng> MusicScheduler<C, R> {
    /// Create a scheduler with an explicit random source.
    pub fn with_rng(catalog: TrackCatalog, channel: C, rng: R) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::EmptyMusicCatalog);
        }

        let remaining = (0..catalog.len()).collect();
        Ok(Self {
            catalog,
            channel,
            rng,
            remaining,
            last_played: None,
            state: MusicState::Idle,
        })
    }

    pub const fn state(&self) -> &MusicState {
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

    /// Cue of the track currently playing.
    pub const fn now_playing(&self) -> Option<&AudioCue> {
        match &self.state {
            MusicState::Playing { cue, .. } => Some(cue),
            MusicState::Idle => None,
        }
    }

    /// Draw the next track index and update the candidate set.
    pub fn draw(&mut self) -> usize {
        if self.catalog.len() < MIN_TRACKS_FOR_NO_REPEAT {
            return self.rng.gen_range(0..self.catalog.len());
        }

        // `remaining` always holds len - 1 or len indices here
        let pick = self.rng.gen_range(0..self.remaining.len());
        let index = self.remaining.swap_remove(pick);
        if let Some(previous) = self.last_played.replace(index) {
            self.remaining.push(previous);
        }
        index
    }

    /// Advance the rotation by `elapsed`. Returns the entry that started
    /// playing during this tick, if any.
    pub fn tick(&mut self, elapsed: Duration, volume: Volume) -> Option<&TrackEntry> {
        if let MusicState::Playing {
            elapsed: played,
            length,
            ..
        } = &mut self.state
        {
            *played += elapsed;
            if *played < *length {
                return None;
            }
            debug!("Music track finished after {:?}", played);
        }

        Some(self.start_next(volume))
    }

    fn start_next(&mut self, volume: Volume) -> &TrackEntry {
        let index = self.draw();
        let entry = &self.catalog.entries()[index];

        start_clip(&mut self.channel, &entry.clip, volume.scale(entry.volume));
        info!("Music: playing '{}' ({:?})", entry.cue, entry.clip.length());

        self.state = MusicState::Playing {
            cue: entry.cue.clone(),
            elapsed: Duration::ZERO,
            length: entry.clip.length(),
        };
        entry
    }
}
