//! JavaScript-backed waveform engine
//!
//! The host passes a factory `(options, events) => instance`, where
//! `instance` is the waveform engine object (e.g. a WaveSurfer instance) and
//! must expose `play`, `pause`, `playPause`, `stop`, `destroy`, `setTime` and
//! `setVolume`. The host wires the instance's `load`/`ready`/`finish`/`error`
//! callbacks to the matching methods of `events`. Those only queue the
//! callback, so they are safe to fire from inside any session call; the
//! queue is applied by `WasmPlayerSession.pump`.

use crate::engine::{EngineEvents, WaveformEngine, WaveformInstance, WaveformOptions};
use crate::error::{PlayerError, Result};
use crate::gesture::PointerCapture;
use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;

pub struct JsWaveformEngine {
    factory: Function,
}

impl JsWaveformEngine {
    pub fn new(factory: Function) -> Self {
        Self { factory }
    }
}

impl WaveformEngine for JsWaveformEngine {
    fn create(
        &mut self,
        options: &WaveformOptions,
        events: EngineEvents,
    ) -> Result<Box<dyn WaveformInstance>> {
        let js_options = serde_wasm_bindgen::to_value(options)
            .map_err(|e| PlayerError::Adapter(format!("Failed to serialize options: {}", e)))?;
        let handle = JsValue::from(JsEngineEvents { inner: events });

        let object = self
            .factory
            .call2(&JsValue::NULL, &js_options, &handle)
            .map_err(|e| PlayerError::Adapter(format!("Engine factory threw: {:?}", e)))?;

        if object.is_undefined() || object.is_null() {
            return Err(PlayerError::Adapter(
                "Engine factory returned no instance".to_string(),
            ));
        }

        Ok(Box::new(JsWaveformInstance { object }))
    }
}

/// Callback sink handed to the engine factory
///
/// Each method queues one callback for the instance it was created for.
#[wasm_bindgen(js_name = EngineEvents)]
pub struct JsEngineEvents {
    inner: EngineEvents,
}

#[wasm_bindgen(js_class = EngineEvents)]
impl JsEngineEvents {
    #[wasm_bindgen(getter, js_name = instanceId)]
    pub fn instance_id(&self) -> f64 {
        self.inner.instance().0 as f64
    }

    pub fn load(&self) {
        self.inner.load();
    }

    pub fn ready(&self) {
        self.inner.ready();
    }

    pub fn finish(&self) {
        self.inner.finish();
    }

    pub fn error(&self, message: Option<String>) {
        self.inner
            .error(message.unwrap_or_else(|| "unknown error".to_string()));
    }
}

/// Engine instance living on the JS side
pub struct JsWaveformInstance {
    object: JsValue,
}

impl JsWaveformInstance {
    /// Call `name(args...)` on the JS object, logging failures
    fn invoke(&self, name: &str, args: &[JsValue]) {
        let method = match Reflect::get(&self.object, &JsValue::from_str(name)) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(method = name, error = ?err, "Engine method lookup failed");
                return;
            }
        };
        let Ok(method) = method.dyn_into::<Function>() else {
            tracing::warn!(method = name, "Engine instance has no such method");
            return;
        };

        let result = match args {
            [] => method.call0(&self.object),
            [a] => method.call1(&self.object, a),
            [a, b, ..] => method.call2(&self.object, a, b),
        };
        if let Err(err) = result {
            tracing::warn!(method = name, error = ?err, "Engine method threw");
        }
    }
}

impl WaveformInstance for JsWaveformInstance {
    fn play(&mut self) {
        self.invoke("play", &[]);
    }

    fn pause(&mut self) {
        self.invoke("pause", &[]);
    }

    fn play_pause(&mut self) {
        self.invoke("playPause", &[]);
    }

    fn stop(&mut self) {
        self.invoke("stop", &[]);
    }

    fn destroy(&mut self) {
        self.invoke("destroy", &[]);
    }

    fn set_time(&mut self, seconds: f64) {
        self.invoke("setTime", &[JsValue::from_f64(seconds)]);
    }

    fn set_volume(&mut self, volume: f64) {
        self.invoke("setVolume", &[JsValue::from_f64(volume)]);
    }
}

/// Pointer capture released by calling a JS function
///
/// The function removes the `mousemove`/`mouseup` window listeners the host
/// added for the drag.
pub struct JsPointerCapture {
    release: Function,
}

impl JsPointerCapture {
    pub fn new(release: Function) -> Self {
        Self { release }
    }
}

impl PointerCapture for JsPointerCapture {
    fn release(&mut self) {
        if let Err(err) = self.release.call0(&JsValue::NULL) {
            tracing::warn!(error = ?err, "Pointer capture release threw");
        }
    }
}
