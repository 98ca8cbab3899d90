//! In-memory channel that plays clips against simulated time.

use cuebox_core::ClipHandle;
use std::time::Duration;
use tracing::{debug, trace};

use crate::channel::Channel;

/// Channel whose playback ends by itself once the clip length has elapsed
/// under [`Channel::advance`].
#[derive(Debug, Clone, Default)]
pub struct SimChannel {
    name: String,
    clip: Option<ClipHandle>,
    volume: f32,
    playing: bool,
    position: Duration,
    play_count: u32,
}

impl SimChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume: 1.0,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Playback position within the current clip.
    pub const fn position(&self) -> Duration {
        self.position
    }

    /// Number of times playback has been started.
    pub const fn play_count(&self) -> u32 {
        self.play_count
    }
}

impl Channel for SimChannel {
    fn load(&mut self, clip: &ClipHandle) {
        self.clip = Some(clip.clone());
        self.position = Duration::ZERO;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn play(&mut self) {
        let Some(clip) = &self.clip else {
            trace!("[{}] play ignored: no clip loaded", self.name);
            return;
        };
        debug!("[{}] playing {} at volume {:.2}", self.name, clip.id, self.volume);
        self.playing = true;
        self.position = Duration::ZERO;
        self.play_count += 1;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn current_clip(&self) -> Option<&ClipHandle> {
        self.clip.as_ref()
    }

    fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }
        let Some(clip) = &self.clip else {
            return;
        };
        self.position += elapsed;
        if self.position >= clip.length() {
            trace!("[{}] finished {}", self.name, clip.id);
            self.playing = false;
        }
    }
}
