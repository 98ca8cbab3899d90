//! # cuebox-audio
//!
//! Playback sequencing for cuebox.
//!
//! Features:
//! - Music rotation that never repeats a track back to back
//! - Priority-based arbitration of a fixed effect channel pool
//! - A single-slot speech mailbox that never overlaps utterances
//! - Tick-driven schedulers, with an optional background driver thread

pub mod channel;
pub mod driver;
pub mod effects;
pub mod event;
pub mod facade;
pub mod music;
pub mod sim;
pub mod speech;

pub use channel::{Channel, ChannelId, ChannelRole};
pub use driver::{AudioDriver, AudioHandle};
pub use effects::{EffectChannelPool, EffectOutcome, Occupancy};
pub use event::AudioEvent;
pub use facade::AudioFacade;
pub use music::{MusicScheduler, MusicState};
pub use sim::SimChannel;
pub use speech::{SpeechQueue, SpeechRequest, SpeechState};
