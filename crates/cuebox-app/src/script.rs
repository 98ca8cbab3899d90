//! Scripted stand-in for game logic.

use cuebox_audio::{AudioEvent, AudioHandle, Channel};
use cuebox_core::{AudioConfig, AudioCue};
use tracing::{info, warn};

/// One thing the fake game does on a script step.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Effect(AudioCue),
    Speech(AudioCue),
    SoundVolume(f32),
}

/// Steps between speech requests.
const SPEECH_EVERY: usize = 4;
/// Steps between sound volume changes.
const VOLUME_EVERY: usize = 10;

/// Build a repeating script that touches every configured cue.
pub fn build(config: &AudioConfig) -> Vec<Action> {
    let effects: Vec<AudioCue> = config.effects.iter().map(|e| e.cue.clone()).collect();
    let speech: Vec<AudioCue> = config.speech.iter().map(|e| e.cue.clone()).collect();
    let steps = (effects.len() * SPEECH_EVERY).max(VOLUME_EVERY * 2);

    let mut effects = effects.iter().cycle();
    let mut speech = speech.iter().cycle();
    let mut actions = Vec::with_capacity(steps);

    for step in 1..=steps {
        if step % VOLUME_EVERY == 0 {
            let level = if (step / VOLUME_EVERY) % 2 == 0 { 1.0 } else { 0.5 };
            actions.push(Action::SoundVolume(level));
        } else if step % SPEECH_EVERY == 0 {
            if let Some(cue) = speech.next() {
                actions.push(Action::Speech(cue.clone()));
            }
        } else if let Some(cue) = effects.next() {
            actions.push(Action::Effect(cue.clone()));
        }
    }

    actions
}

/// Apply one action through the handle.
pub fn perform<C: Channel>(handle: &AudioHandle<C>, action: &Action) {
    match action {
        Action::Effect(cue) => handle.play_effect(cue),
        Action::Speech(cue) => handle.request_speech(cue),
        Action::SoundVolume(level) => handle.set_sound_volume(*level),
    }
}

/// Running totals of what the schedulers reported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub music: u32,
    pub effects: u32,
    pub evictions: u32,
    pub drops: u32,
    pub speech: u32,
    pub superseded: u32,
    pub misses: u32,
}

impl Tally {
    pub fn record(&mut self, event: &AudioEvent) {
        match event {
            AudioEvent::MusicStarted(cue) => {
                self.music += 1;
                info!("music: {cue}");
            }
            AudioEvent::EffectStarted {
                cue,
                channel,
                evicted,
            } => {
                self.effects += 1;
                if let Some(evicted) = evicted {
                    self.evictions += 1;
                    info!("fx: {cue} on channel {channel} (cut off {evicted})");
                } else {
                    info!("fx: {cue} on channel {channel}");
                }
            }
            AudioEvent::EffectDropped(cue) => {
                self.drops += 1;
                info!("fx: {cue} dropped, all channels busy");
            }
            AudioEvent::SpeechStarted(cue) => {
                self.speech += 1;
                info!("speech: {cue}");
            }
            AudioEvent::SpeechSuperseded { dropped, by } => {
                self.superseded += 1;
                info!("speech: {dropped} replaced by {by} before it started");
            }
            AudioEvent::CueNotFound { catalog, cue } => {
                self.misses += 1;
                warn!("{catalog} cue not found: {cue}");
            }
        }
    }
}
