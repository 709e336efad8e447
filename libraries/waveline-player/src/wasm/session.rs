//! WASM-compatible PlayerSession wrapper

use super::engine::{JsPointerCapture, JsWaveformEngine};
use super::types::{SessionSnapshot, TrackView};
use crate::{format_timestamp, PlayerConfig, PlayerError, PlayerSession, TrackDescriptor, TrackId};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// WASM-compatible player session
///
/// This wraps the core PlayerSession with a JavaScript-friendly API.
/// Every call drains the session's change notifications into the
/// `onChange` callback.
#[wasm_bindgen]
pub struct WasmPlayerSession {
    inner: PlayerSession,

    // Event callbacks
    on_change: Option<Function>,
    on_error: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlayerSession {
    /// Create a session
    ///
    /// `tracks` is the ordered track list, `config` an optional
    /// `PlayerConfig`-shaped object, `factory` the waveform engine factory.
    #[wasm_bindgen(constructor)]
    pub fn new(tracks: JsValue, config: JsValue, factory: Function) -> Result<WasmPlayerSession, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let descriptors: Vec<TrackDescriptor> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;

        let config = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let inner = PlayerSession::from_descriptors(descriptors, config, JsWaveformEngine::new(factory))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            inner,
            on_change: None,
            on_error: None,
        })
    }

    // ===== Track Lifecycle =====

    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&mut self, track_id: &str) -> Result<(), JsValue> {
        let result = self.inner.select_track(&TrackId::from(track_id));
        self.finish(result)
    }

    #[wasm_bindgen(js_name = createTrack)]
    pub fn create_track(&mut self, track_id: &str) -> Result<(), JsValue> {
        let result = self.inner.create_track(&TrackId::from(track_id));
        self.finish(result)
    }

    #[wasm_bindgen(js_name = destroyTrack)]
    pub fn destroy_track(&mut self, track_id: Option<String>) -> Result<(), JsValue> {
        let id = track_id.map(|id| TrackId::from(id.as_str()));
        let result = self.inner.destroy_track(id.as_ref());
        self.finish(result)
    }

    /// Play/pause button; `undefined` autostarts the first track
    #[wasm_bindgen(js_name = playPauseClick)]
    pub fn play_pause_click(&mut self, track_id: Option<String>) -> Result<(), JsValue> {
        let id = track_id.map(|id| TrackId::from(id.as_str()));
        let result = self.inner.play_pause_toggle(id.as_ref());
        self.finish(result)
    }

    #[wasm_bindgen(js_name = nextTrack)]
    pub fn next_track(&mut self) -> Result<(), JsValue> {
        let result = self.inner.next_track();
        self.finish(result)
    }

    #[wasm_bindgen(js_name = prevTrack)]
    pub fn prev_track(&mut self) -> Result<(), JsValue> {
        let result = self.inner.prev_track();
        self.finish(result)
    }

    #[wasm_bindgen(js_name = timestampClick)]
    pub fn timestamp_click(&mut self, time: f64) -> Result<(), JsValue> {
        let result = self.inner.seek_to_timestamp(time);
        self.finish(result)
    }

    pub fn close(&mut self) {
        self.inner.close();
        self.flush();
    }

    /// Artwork `load` handler
    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&mut self, track_id: &str) -> Result<(), JsValue> {
        let result = self.inner.mark_image_loaded(&TrackId::from(track_id));
        self.finish(result)
    }

    // ===== Engine Callbacks =====

    /// Apply callbacks queued through the factory's `events` handles
    ///
    /// Runs after every other method; call it from the host's own tick when
    /// callbacks arrive between user actions.
    pub fn pump(&mut self) -> usize {
        let handled = self.inner.pump();
        self.flush();
        handled
    }

    /// Run deferred teardown (call from a zero-delay timeout after `close`)
    pub fn settle(&mut self) {
        self.pump();
    }

    // ===== Volume Control =====

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f64) {
        self.inner.set_volume(volume);
        self.apply();
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.apply();
    }

    /// `mousedown` on the volume bar
    ///
    /// `release` must detach the window listeners the host adds for the drag.
    #[wasm_bindgen(js_name = volumeMousedown)]
    pub fn volume_mousedown(&mut self, pointer_x: f64, element_left: f64, element_width: f64, release: Function) {
        self.inner.volume_drag_start(
            pointer_x,
            element_left,
            element_width,
            Box::new(JsPointerCapture::new(release)),
        );
        self.apply();
    }

    #[wasm_bindgen(js_name = volumeMousedrag)]
    pub fn volume_mousedrag(&mut self, pointer_x: f64) {
        self.inner.volume_drag_move(pointer_x);
        self.apply();
    }

    #[wasm_bindgen(js_name = volumeMouseup)]
    pub fn volume_mouseup(&mut self) {
        self.inner.volume_drag_end();
        self.apply();
    }

    #[wasm_bindgen(js_name = setVolumeHover)]
    pub fn set_volume_hover(&mut self, hover: bool) {
        self.inner.set_volume_hover(hover);
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, primary: Option<String>, secondary: Option<String>) {
        self.inner.set_theme(primary, secondary);
    }

    // ===== State Queries =====

    /// Full state plus derived values
    pub fn state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&SessionSnapshot::from(&self.inner)).unwrap_or(JsValue::NULL)
    }

    /// All tracks in catalog order
    pub fn tracks(&self) -> JsValue {
        let tracks: Vec<TrackView> = self.inner.catalog().iter().map(TrackView::from).collect();
        serde_wasm_bindgen::to_value(&tracks).unwrap_or(JsValue::NULL)
    }

    /// Tracks on one album, in catalog order
    #[wasm_bindgen(js_name = tracksOnAlbum)]
    pub fn tracks_on_album(&self, album: &str) -> JsValue {
        let tracks: Vec<TrackView> = self
            .inner
            .catalog()
            .by_album(album)
            .into_iter()
            .map(TrackView::from)
            .collect();
        serde_wasm_bindgen::to_value(&tracks).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(getter, js_name = activeClass)]
    pub fn active_class(&self) -> String {
        self.inner.active_class().to_string()
    }

    #[wasm_bindgen(getter, js_name = loadingClass)]
    pub fn loading_class(&self) -> String {
        self.inner.loading_class().to_string()
    }

    #[wasm_bindgen(getter, js_name = trackName)]
    pub fn track_name(&self) -> Option<String> {
        self.inner.current_track_title().map(str::to_string)
    }

    // ===== Event Listeners =====

    /// Register change callback, called with an array of session events
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        self.on_change = Some(callback);
    }

    /// Register error callback
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&mut self, callback: Function) {
        self.on_error = Some(callback);
    }

    // ===== Internal Event Emitters =====

    fn finish(&mut self, result: crate::Result<()>) -> Result<(), JsValue> {
        self.inner.pump();
        self.flush();
        result.map_err(|e| self.handle_error(e))
    }

    /// Apply queued engine callbacks, then notify
    fn apply(&mut self) {
        self.inner.pump();
        self.flush();
    }

    fn flush(&mut self) {
        let events = self.inner.drain_events();
        if events.is_empty() {
            return;
        }
        if let Some(ref cb) = self.on_change {
            if let Ok(js_events) = serde_wasm_bindgen::to_value(&events) {
                cb.call1(&JsValue::NULL, &js_events).ok();
            }
        }
    }

    fn handle_error(&self, error: PlayerError) -> JsValue {
        let err_msg = error.to_string();

        // Emit error event
        if let Some(ref cb) = self.on_error {
            cb.call1(&JsValue::NULL, &JsValue::from_str(&err_msg)).ok();
        }

        JsValue::from_str(&err_msg)
    }
}

/// Format seconds as `mm:ss`
#[wasm_bindgen(js_name = formatTimestamp)]
pub fn format_timestamp_js(seconds: f64) -> String {
    format_timestamp(seconds)
}
