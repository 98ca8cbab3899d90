//! Fixed pool of effect channels arbitrated by priority.

use cuebox_core::{AudioCue, Error, Result, TrackCatalog, Volume};
use std::time::Duration;
use tracing::{debug, warn};

use crate::channel::{start_clip, Channel, ChannelId};

/// Priority given to a playing channel whose clip is not in the catalog.
/// Such a channel is the first to be evicted.
pub const UNKNOWN_CLIP_PRIORITY: i32 = i32::MIN;

/// What a channel holds, as far as eviction is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Idle,
    Playing { priority: i32 },
}

/// Result of an effect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect started on `channel`, cutting off `evicted` if it was busy.
    Started {
        channel: ChannelId,
        evicted: Option<AudioCue>,
    },
    /// Every channel is busy with equal or higher priority content.
    Dropped,
    /// The cue is not in the effects catalog.
    NotFound,
}

/// Arena of effect channels indexed by [`ChannelId`].
pub struct EffectChannelPool<C> {
    catalog: TrackCatalog,
    channels: Vec<C>,
}

impl<C: Channel> EffectChannelPool<C> {
    pub fn new(catalog: TrackCatalog, channels: Vec<C>) -> Result<Self> {
        if channels.is_empty() {
            return Err(Error::NoEffectChannels);
        }
        Ok(Self { catalog, channels })
    }

    pub const fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> &[C] {
        &self.channels
    }

    pub fn channel(&self, id: ChannelId) -> Option<&C> {
        self.channels.get(id)
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut C> {
        self.channels.get_mut(id)
    }

    /// Forward host time to every channel.
    pub fn advance(&mut self, elapsed: Duration) {
        for channel in &mut self.channels {
            channel.advance(elapsed);
        }
    }

    /// Occupancy of one channel, re-derived from its loaded clip.
    pub fn occupancy(&self, id: ChannelId) -> Option<Occupancy> {
        self.channels.get(id).map(|c| self.occupancy_of(c))
    }

    fn occupancy_of(&self, channel: &C) -> Occupancy {
        if !channel.is_playing() {
            return Occupancy::Idle;
        }
        let priority = channel
            .current_clip()
            .and_then(|clip| self.catalog.lookup_by_clip(&clip.id))
            .map_or(UNKNOWN_CLIP_PRIORITY, |entry| entry.priority);
        Occupancy::Playing { priority }
    }

    /// Scan channels in order for the best candidate. An idle channel wins
    /// outright; otherwise the first channel with the lowest priority.
    pub fn select_channel(&self) -> Option<(ChannelId, Occupancy)> {
        let mut best: Option<(ChannelId, Occupancy)> = None;

        for (id, channel) in self.channels.iter().enumerate() {
            let occupancy = self.occupancy_of(channel);
            match (best, occupancy) {
                (_, Occupancy::Idle) => {
                    best = Some((id, occupancy));
                    break;
                }
                (None, _) => best = Some((id, occupancy)),
                (
                    Some((_, Occupancy::Playing { priority: best_priority })),
                    Occupancy::Playing { priority },
                ) if priority < best_priority => best = Some((id, occupancy)),
                _ => {}
            }
        }

        best
    }

    /// Play `cue` on the channel chosen by [`Self::select_channel`], unless
    /// that channel is busy with equal or higher priority content.
    pub fn play_effect(&mut self, cue: &AudioCue, volume: Volume) -> EffectOutcome {
        let Some(target) = self.catalog.lookup_by_cue(cue) else {
            warn!("Sound not found: '{cue}'");
            return EffectOutcome::NotFound;
        };

        let Some((id, occupancy)) = self.select_channel() else {
            return EffectOutcome::Dropped;
        };

        let evicted = match occupancy {
            Occupancy::Idle => None,
            Occupancy::Playing { priority } if priority < target.priority => self.channels[id]
                .current_clip()
                .and_then(|clip| self.catalog.lookup_by_clip(&clip.id))
                .map(|entry| entry.cue.clone()),
            Occupancy::Playing { priority } => {
                debug!(
                    "Dropping '{cue}' (priority {}): channel {id} busy with priority {priority}",
                    target.priority
                );
                return EffectOutcome::Dropped;
            }
        };

        start_clip(
            &mut self.channels[id],
            &target.clip,
            volume.scale(target.volume),
        );
        debug!("Effect '{cue}' started on channel {id}");

        EffectOutcome::Started {
            channel: id,
            evicted,
        }
    }
}
