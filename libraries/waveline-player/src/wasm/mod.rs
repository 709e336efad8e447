//! WASM bindings for waveline-player
//!
//! This module exports the PlayerSession to JavaScript. The host page
//! supplies the waveform engine as a factory function; each instance reports
//! its callbacks through the `EngineEvents` handle the factory receives.

#[cfg(feature = "wasm")]
pub mod engine;

#[cfg(feature = "wasm")]
pub mod types;

#[cfg(feature = "wasm")]
pub mod session;

#[cfg(feature = "wasm")]
pub use session::WasmPlayerSession;

#[cfg(feature = "wasm")]
pub use types::{SessionSnapshot, TrackView};

#[cfg(feature = "wasm")]
pub use engine::JsEngineEvents;
