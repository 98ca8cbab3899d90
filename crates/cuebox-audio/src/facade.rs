//! Single entry point game logic talks to.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use cuebox_core::{
    AudioConfig, AudioCue, BusVolumes, CatalogKind, Catalogs, Result, TrackEntry, Volume,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::channel::{Channel, ChannelRole};
use crate::effects::{EffectChannelPool, EffectOutcome};
use crate::event::AudioEvent;
use crate::music::MusicScheduler;
use crate::speech::{SpeechQueue, SpeechRequest};

/// Events buffered before the oldest undelivered ones start being dropped.
const EVENT_CAPACITY: usize = 256;

/// Routes requests to the music, effect and speech schedulers.
///
/// Requests never fail from the caller's point of view: misses are logged and
/// published as [`AudioEvent::CueNotFound`].
pub struct AudioFacade<C, R = StdRng> {
    music: MusicScheduler<C, R>,
    effects: EffectChannelPool<C>,
    speech: SpeechQueue<C>,
    volumes: BusVolumes,
    event_tx: Sender<AudioEvent>,
    event_rx: Receiver<AudioEvent>,
}

impl<C: Channel> AudioFacade<C> {
    /// Build a facade from configuration, asking `make_channel` for one
    /// channel per role.
    pub fn from_config(
        config: &AudioConfig,
        make_channel: impl FnMut(ChannelRole) -> C,
    ) -> Result<Self> {
        Self::from_config_with_rng(config, make_channel, StdRng::from_entropy())
    }
}

impl<C: Channel, R: Rng> AudioFacade<C, R> {
    pub fn from_config_with_rng(
        config: &AudioConfig,
        mut make_channel: impl FnMut(ChannelRole) -> C,
        rng: R,
    ) -> Result<Self> {
        let catalogs = config.catalogs()?;
        let music_channel = make_channel(ChannelRole::Music);
        let speech_channel = make_channel(ChannelRole::Speech);
        let effect_channels = (0..config.effect_channels)
            .map(|id| make_channel(ChannelRole::Effect(id)))
            .collect();

        Self::with_rng(
            catalogs,
            config.volumes,
            music_channel,
            speech_channel,
            effect_channels,
            rng,
        )
    }

    pub fn with_rng(
        catalogs: Catalogs,
        volumes: BusVolumes,
        music_channel: C,
        speech_channel: C,
        effect_channels: Vec<C>,
        rng: R,
    ) -> Result<Self> {
        let Catalogs {
            music,
            effects,
            speech,
        } = catalogs;

        let music = MusicScheduler::with_rng(music, music_channel, rng)?;
        let effects = EffectChannelPool::new(effects, effect_channels)?;
        let speech = SpeechQueue::new(speech, speech_channel);
        let (event_tx, event_rx) = bounded(EVENT_CAPACITY);

        info!(
            "Audio initialized: {} music tracks, {} effects on {} channels, {} speech lines",
            music.catalog().len(),
            effects.catalog().len(),
            effects.len(),
            speech.catalog().len()
        );

        Ok(Self {
            music,
            effects,
            speech,
            volumes,
            event_tx,
            event_rx,
        })
    }

    /// Play a sound effect now, or drop it if every channel is busy with
    /// equal or higher priority content.
    pub fn play_effect(&mut self, cue: &AudioCue) {
        match self.effects.play_effect(cue, self.volumes.sound) {
            EffectOutcome::Started { channel, evicted } => self.publish(AudioEvent::EffectStarted {
                cue: cue.clone(),
                channel,
                evicted,
            }),
            EffectOutcome::Dropped => self.publish(AudioEvent::EffectDropped(cue.clone())),
            EffectOutcome::NotFound => self.publish(AudioEvent::CueNotFound {
                catalog: CatalogKind::Effects,
                cue: cue.clone(),
            }),
        }
    }

    /// Replace the pending utterance with `cue`. It starts once the speech
    /// channel is free.
    pub fn request_speech(&mut self, cue: &AudioCue) {
        match self.speech.request(cue) {
            SpeechRequest::Queued => {}
            SpeechRequest::Superseded(dropped) => self.publish(AudioEvent::SpeechSuperseded {
                dropped,
                by: cue.clone(),
            }),
            SpeechRequest::NotFound => self.publish(AudioEvent::CueNotFound {
                catalog: CatalogKind::Speech,
                cue: cue.clone(),
            }),
        }
    }

    /// Applies from the next music track on.
    pub fn set_music_volume(&mut self, volume: f32) {
        self.volumes.music = Volume::new(volume);
        debug!("Music volume set to {:.2}", self.volumes.music.as_f32());
    }

    /// Applies to effects started after this call.
    pub fn set_sound_volume(&mut self, volume: f32) {
        self.volumes.sound = Volume::new(volume);
        debug!("Sound volume set to {:.2}", self.volumes.sound.as_f32());
    }

    /// Applies from the next utterance on.
    pub fn set_speech_volume(&mut self, volume: f32) {
        self.volumes.speech = Volume::new(volume);
        debug!("Speech volume set to {:.2}", self.volumes.speech.as_f32());
    }

    pub const fn volumes(&self) -> BusVolumes {
        self.volumes
    }

    /// Advance host channels and both scheduling loops by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        self.music.channel_mut().advance(elapsed);
        self.speech.channel_mut().advance(elapsed);
        self.effects.advance(elapsed);

        if let Some(cue) = self
            .music
            .tick(elapsed, self.volumes.music)
            .map(|entry| entry.cue.clone())
        {
            self.publish(AudioEvent::MusicStarted(cue));
        }

        if let Some(cue) = self
            .speech
            .tick(elapsed, self.volumes.speech)
            .map(|entry| entry.cue.clone())
        {
            self.publish(AudioEvent::SpeechStarted(cue));
        }
    }

    /// Cue of the music track currently playing.
    pub const fn now_playing(&self) -> Option<&AudioCue> {
        self.music.now_playing()
    }

    /// Utterance waiting for the speech channel.
    pub const fn pending_speech(&self) -> Option<&TrackEntry> {
        self.speech.pending()
    }

    pub const fn music(&self) -> &MusicScheduler<C, R> {
        &self.music
    }

    pub const fn effects(&self) -> &EffectChannelPool<C> {
        &self.effects
    }

    pub const fn speech(&self) -> &SpeechQueue<C> {
        &self.speech
    }

    /// Try to receive an event without blocking.
    pub fn try_recv_event(&self) -> Option<AudioEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Take every buffered event.
    pub fn drain_events(&self) -> Vec<AudioEvent> {
        self.event_rx.try_iter().collect()
    }

    /// A receiver for observers on other threads. Each event is delivered to
    /// one receiver only.
    pub fn events(&self) -> Receiver<AudioEvent> {
        self.event_rx.clone()
    }

    fn publish(&self, event: AudioEvent) {
        trace!("Audio event: {:?}", event);
        if let Err(TrySendError::Full(event)) = self.event_tx.try_send(event) {
            // Make room by discarding the oldest event
            let _ = self.event_rx.try_recv();
            if let Err(e) = self.event_tx.try_send(event) {
                trace!("Audio event lost: {:?}", e.into_inner());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

    use super::*;
    use crate::sim::SimChannel;
    use cuebox_core::{ClipHandle, Error};

    const FRAME: Duration = Duration::from_millis(16);

    fn entry(cue: &str, ms: u64) -> TrackEntry {
        TrackEntry::new(cue, ClipHandle::new(format!("{cue}.ogg"), Duration::from_millis(ms)))
    }

    fn config() -> AudioConfig {
        AudioConfig::new(vec![entry("theme_a", 30_000), entry("theme_b", 20_000)])
            .with_effects(vec![
                entry("pick", 300).with_priority(1),
                entry("correct_slot", 500).with_priority(2).with_volume(0.8),
                entry("factory_moving", 4000).with_priority(5),
            ])
            .with_speech(vec![entry("green", 900), entry("blue", 700)])
            .with_effect_channels(2)
    }

    fn facade() -> AudioFacade<SimChannel, StdRng> {
        AudioFacade::from_config_with_rng(
            &config(),
            |role| SimChannel::new(format!("{role:?}")),
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    #[test]
    fn test_from_config_builds_roles() {
        let audio = facade();
        assert_eq!(audio.effects().len(), 2);
        assert_eq!(audio.music().channel().name(), "Music");
        assert_eq!(audio.speech().channel().name(), "Speech");
        assert_eq!(audio.effects().channel(1).unwrap().name(), "Effect(1)");
    }

    #[test]
    fn test_configuration_errors_abort_construction() {
        let empty = AudioConfig::new(Vec::new());
        let result = AudioFacade::from_config(&empty, |_| SimChannel::new("x"));
        assert!(matches!(result, Err(Error::EmptyMusicCatalog)));
    }

    #[test]
    fn test_first_tick_starts_music() {
        let mut audio = facade();
        assert!(audio.now_playing().is_none());
        audio.tick(FRAME);
        let cue = audio.now_playing().cloned().unwrap();
        assert_eq!(audio.drain_events(), vec![AudioEvent::MusicStarted(cue)]);
    }

    #[test]
    fn test_sound_volume_applies_at_next_start() {
        let mut audio = facade();
        audio.set_sound_volume(0.5);
        audio.play_effect(&"correct_slot".into());
        assert!((audio.effects().channel(0).unwrap().volume() - 0.4).abs() < 1e-6);

        audio.set_sound_volume(1.0);
        assert!((audio.effects().channel(0).unwrap().volume() - 0.4).abs() < 1e-6);

        audio.play_effect(&"pick".into());
        assert!((audio.effects().channel(1).unwrap().volume() - 1.0).abs() < 1e-6);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_volume_setters_clamp() {
        let mut audio = facade();
        audio.set_music_volume(3.0);
        audio.set_speech_volume(-1.0);
        assert_eq!(audio.volumes().music.as_f32(), 1.0);
        assert_eq!(audio.volumes().speech.as_f32(), 0.0);
    }

    #[test]
    fn test_effect_events() {
        let mut audio = facade();
        audio.play_effect(&"pick".into());
        audio.play_effect(&"pick".into());
        audio.play_effect(&"correct_slot".into());
        audio.play_effect(&"pick".into());

        assert_eq!(
            audio.drain_events(),
            vec![
                AudioEvent::EffectStarted {
                    cue: "pick".into(),
                    channel: 0,
                    evicted: None
                },
                AudioEvent::EffectStarted {
                    cue: "pick".into(),
                    channel: 1,
                    evicted: None
                },
                AudioEvent::EffectStarted {
                    cue: "correct_slot".into(),
                    channel: 0,
                    evicted: Some("pick".into())
                },
                AudioEvent::EffectDropped("pick".into()),
            ]
        );
    }

    #[test]
    fn test_only_second_speech_is_heard() {
        let mut audio = facade();
        audio.request_speech(&"green".into());
        audio.request_speech(&"blue".into());

        let mut heard = Vec::new();
        for _ in 0..200 {
            audio.tick(FRAME);
            for event in audio.drain_events() {
                if let AudioEvent::SpeechStarted(cue) = event {
                    heard.push(cue);
                }
            }
        }
        assert_eq!(heard, vec![AudioCue::from("blue")]);
    }

    #[test]
    fn test_superseded_speech_is_reported() {
        let mut audio = facade();
        audio.request_speech(&"green".into());
        audio.request_speech(&"blue".into());
        assert_eq!(
            audio.try_recv_event(),
            Some(AudioEvent::SpeechSuperseded {
                dropped: "green".into(),
                by: "blue".into()
            })
        );
        assert_eq!(audio.pending_speech().unwrap().cue.as_str(), "blue");
    }

    #[test]
    fn test_missing_cues_are_silent_no_ops() {
        let mut audio = facade();
        audio.play_effect(&"explosion".into());
        audio.request_speech(&"purple".into());

        assert!(audio
            .effects()
            .channels()
            .iter()
            .all(|c| c.current_clip().is_none()));
        assert!(audio.pending_speech().is_none());
        assert!(audio.speech().channel().current_clip().is_none());
        assert_eq!(
            audio.drain_events(),
            vec![
                AudioEvent::CueNotFound {
                    catalog: CatalogKind::Effects,
                    cue: "explosion".into()
                },
                AudioEvent::CueNotFound {
                    catalog: CatalogKind::Speech,
                    cue: "purple".into()
                },
            ]
        );
    }

    #[test]
    fn test_effects_free_up_as_clips_finish() {
        let mut audio = facade();
        audio.play_effect(&"factory_moving".into());
        audio.play_effect(&"factory_moving".into());
        audio.play_effect(&"pick".into());
        assert!(audio
            .drain_events()
            .contains(&AudioEvent::EffectDropped("pick".into())));

        for _ in 0..250 {
            audio.tick(FRAME);
        }
        audio.drain_events();
        audio.play_effect(&"pick".into());
        assert!(matches!(
            audio.try_recv_event(),
            Some(AudioEvent::EffectStarted { channel: 0, evicted: None, .. })
        ));
    }

    #[test]
    fn test_event_buffer_keeps_newest() {
        let audio = facade();
        for i in 0..EVENT_CAPACITY + 10 {
            audio.publish(AudioEvent::MusicStarted(AudioCue::new(format!("t{i}"))));
        }
        let events = audio.drain_events();
        assert_eq!(events.len(), EVENT_CAPACITY);
        assert_eq!(
            events.last(),
            Some(&AudioEvent::MusicStarted(AudioCue::new(format!(
                "t{}",
                EVENT_CAPACITY + 9
            ))))
        );
    }

    #[test]
    fn test_event_buffer_discards_oldest_first() {
        let audio = facade();
        for i in 0..EVENT_CAPACITY + 3 {
            audio.publish(AudioEvent::EffectDropped(AudioCue::new(format!("fx{i}"))));
        }
        // fx0..fx2 made room for the overflow
        assert_eq!(
            audio.try_recv_event(),
            Some(AudioEvent::EffectDropped("fx3".into()))
        );
    }
}
