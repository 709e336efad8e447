//! Waveline Player - Playback State Machine
//!
//! Core of a waveform audio-player component: given a list of track
//! metadata, it manages which track is selected, loading, loaded and playing,
//! the volume, and the single live instance of an external waveform engine.
//!
//! This crate provides:
//! - Track catalog built from host metadata (ordered, `track-{index}` ids)
//! - Create/load/play/stop/destroy lifecycle for exactly one live instance
//! - Next/previous navigation and auto-advance on track finish
//! - Volume with snap-to-rail, mute memory and press-drag-release input
//! - Timestamp seeking and `mm:ss` formatting
//! - Change notifications for the UI layer
//!
//! # Architecture
//!
//! `waveline-player` knows nothing about the DOM or audio decoding. The
//! waveform engine is supplied through the [`WaveformEngine`] and
//! [`WaveformInstance`] traits; its callbacks come back through
//! [`EngineEvents`] and are applied by [`PlayerSession::pump`]. With the
//! `wasm` feature the session is exported to JavaScript.
//!
//! # Example
//!
//! ```rust
//! use waveline_player::{
//!     EngineEvents, PlayerConfig, PlayerSession, Result, TrackDescriptor, WaveformEngine,
//!     WaveformInstance, WaveformOptions,
//! };
//!
//! struct SilentEngine;
//! struct SilentInstance;
//!
//! impl WaveformEngine for SilentEngine {
//!     fn create(
//!         &mut self,
//!         _options: &WaveformOptions,
//!         events: EngineEvents,
//!     ) -> Result<Box<dyn WaveformInstance>> {
//!         // A real engine fires these once the media is fetched and decoded
//!         events.load();
//!         events.ready();
//!         Ok(Box::new(SilentInstance))
//!     }
//! }
//!
//! impl WaveformInstance for SilentInstance {
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn play_pause(&mut self) {}
//!     fn stop(&mut self) {}
//!     fn destroy(&mut self) {}
//!     fn set_time(&mut self, _seconds: f64) {}
//!     fn set_volume(&mut self, _volume: f64) {}
//! }
//!
//! let tracks = vec![TrackDescriptor {
//!     title: Some("Meditate".to_string()),
//!     artist: "yokram".to_string(),
//!     ..TrackDescriptor::default()
//! }];
//!
//! let mut session = PlayerSession::from_descriptors(tracks, PlayerConfig::default(), SilentEngine)?;
//!
//! // Play button with nothing loaded opens the first track
//! session.play_pause_toggle(None)?;
//! session.pump();
//!
//! assert_eq!(session.current_track_title(), Some("Meditate"));
//! assert_eq!(session.playing_track().map(|id| id.as_str()), Some("track-0"));
//! # Ok::<(), waveline_player::PlayerError>(())
//! ```

mod catalog;
pub mod config;
mod engine;
mod error;
mod events;
mod format;
pub mod gesture;
mod session;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use catalog::{audio_filename, Catalog};
pub use crate::config::{PlayerConfig, WaveformSettings};
pub use engine::{
    EngineEvent, EngineEvents, InstanceId, WaveformEngine, WaveformInstance, WaveformOptions,
};
pub use error::{PlayerError, Result};
pub use events::SessionEvent;
pub use format::format_timestamp;
pub use gesture::{CaptureGuard, FnCapture, PointerCapture};
pub use session::{PlayerSession, ACTIVE_CLASS, LOADING_CLASS};
pub use types::{PlayerPhase, Timestamp, Track, TrackDescriptor, TrackId};
pub use volume::{snap as snap_volume, Volume, SNAP_DEAD_ZONE};
