//! Host playback primitive the schedulers drive.

use cuebox_core::ClipHandle;
use std::time::Duration;
use tracing::trace;

/// Index of a channel inside the effect pool. Stable for the pool's lifetime.
pub type ChannelId = usize;

/// What a channel is used for, handed to channel factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    Music,
    Speech,
    Effect(ChannelId),
}

/// One playback slot provided by the host.
///
/// Implementations own decoding and output. The schedulers only issue the
/// commands below and never share a channel between them.
pub trait Channel {
    /// Replace the loaded clip. Does not start playback.
    fn load(&mut self, clip: &ClipHandle);

    /// Set the output volume (0.0 to 1.0).
    fn set_volume(&mut self, volume: f32);

    /// Start the loaded clip from the beginning.
    fn play(&mut self);

    /// Stop playback, keeping the loaded clip.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// The clip currently loaded, if any.
    fn current_clip(&self) -> Option<&ClipHandle>;

    /// Called once per tick before the schedulers run.
    fn advance(&mut self, _elapsed: Duration) {}
}

/// Stop, load, set volume and play in one go. Channels switch abruptly.
pub(crate) fn start_clip<C: Channel + ?Sized>(channel: &mut C, clip: &ClipHandle, volume: f32) {
    trace!("Starting clip {} at volume {:.3}", clip.id, volume);
    channel.stop();
    channel.load(clip);
    channel.set_volume(volume);
    channel.play();
}
