//! Background thread that ticks a facade with real elapsed time.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use cuebox_core::{AudioCue, BusVolumes, Error, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::channel::Channel;
use crate::event::AudioEvent;
use crate::facade::AudioFacade;

/// Default scheduling cadence (one frame at 60 Hz).
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Cloneable, thread-safe access to a facade owned by an [`AudioDriver`].
///
/// Every call holds the facade lock for its whole duration, so effect channel
/// selection and replacement happen as one step even with many callers.
pub struct AudioHandle<C, R = StdRng> {
    facade: Arc<Mutex<AudioFacade<C, R>>>,
    events: Receiver<AudioEvent>,
}

impl<C, R> Clone for AudioHandle<C, R> {
    fn clone(&self) -> Self {
        Self {
            facade: Arc::clone(&self.facade),
            events: self.events.clone(),
        }
    }
}

impl<C: Channel, R: Rng> AudioHandle<C, R> {
    pub fn play_effect(&self, cue: &AudioCue) {
        self.facade.lock().play_effect(cue);
    }

    pub fn request_speech(&self, cue: &AudioCue) {
        self.facade.lock().request_speech(cue);
    }

    pub fn set_music_volume(&self, volume: f32) {
        self.facade.lock().set_music_volume(volume);
    }

    pub fn set_sound_volume(&self, volume: f32) {
        self.facade.lock().set_sound_volume(volume);
    }

    pub fn set_speech_volume(&self, volume: f32) {
        self.facade.lock().set_speech_volume(volume);
    }

    pub fn volumes(&self) -> BusVolumes {
        self.facade.lock().volumes()
    }

    pub fn now_playing(&self) -> Option<AudioCue> {
        self.facade.lock().now_playing().cloned()
    }

    /// Run `f` with the facade locked.
    pub fn with<T>(&self, f: impl FnOnce(&mut AudioFacade<C, R>) -> T) -> T {
        f(&mut self.facade.lock())
    }

    /// Try to receive an event without blocking.
    pub fn try_recv_event(&self) -> Option<AudioEvent> {
        self.events.try_recv().ok()
    }

    /// Receive an event, waiting at most `timeout`.
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<AudioEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

/// Owns the scheduler thread. Dropping the driver stops the thread.
pub struct AudioDriver<C, R = StdRng> {
    handle: AudioHandle<C, R>,
    shutdown_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl<C, R> AudioDriver<C, R>
where
    C: Channel + Send + 'static,
    R: Rng + Send + 'static,
{
    /// Move `facade` onto a new thread that ticks it every `frame`.
    pub fn spawn(facade: AudioFacade<C, R>, frame: Duration) -> Result<Self> {
        let events = facade.events();
        let facade = Arc::new(Mutex::new(facade));
        let (shutdown_tx, shutdown_rx) = bounded(1);

        let worker_facade = Arc::clone(&facade);
        let thread = std::thread::Builder::new()
            .name("audio-scheduler".to_string())
            .spawn(move || run(&worker_facade, &shutdown_rx, frame))
            .map_err(|e| Error::Driver(format!("Failed to spawn scheduler thread: {e}")))?;

        info!("Audio driver started (frame {:?})", frame);

        Ok(Self {
            handle: AudioHandle { facade, events },
            shutdown_tx,
            thread: Some(thread),
        })
    }
}

impl<C, R> AudioDriver<C, R> {
    /// A handle for game logic on any thread.
    pub fn handle(&self) -> AudioHandle<C, R> {
        self.handle.clone()
    }

    /// Stop the scheduler thread and wait for it to exit.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        let _ = self.shutdown_tx.try_send(());
        thread
            .join()
            .map_err(|_| Error::Driver("Scheduler thread panicked".to_string()))?;
        info!("Audio driver stopped");
        Ok(())
    }
}

impl<C, R> Drop for AudioDriver<C, R> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("Failed to stop audio driver: {e}");
        }
    }
}

fn run<C: Channel, R: Rng>(
    facade: &Mutex<AudioFacade<C, R>>,
    shutdown_rx: &Receiver<()>,
    frame: Duration,
) {
    debug!("Audio scheduler thread running");
    let mut last_tick = Instant::now();

    loop {
        match shutdown_rx.recv_timeout(frame) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                debug!("Shutdown requested, leaving scheduler loop");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_tick);
        last_tick = now;

        facade.lock().tick(elapsed);
    }
}
