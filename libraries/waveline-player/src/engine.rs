//! Waveform engine adapter
//!
//! Abstracts the external waveform renderer/decoder. The session asks an
//! [`WaveformEngine`] for one [`WaveformInstance`] per track and receives the
//! instance's lifecycle callbacks through the [`EngineEvents`] handle it
//! passes in at construction time.

use crate::config::WaveformSettings;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Identifies one constructed player instance
///
/// Every construction gets a fresh id, so callbacks from a torn-down instance
/// can be told apart from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance-{}", self.0)
    }
}

/// Lifecycle callbacks emitted by a player instance
///
/// `Load`, `Ready` and `Finish` fire at most once per instance, in that order.
/// `Finish` never fires if the instance is stopped early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Media fetch started
    Load,

    /// Media decoded and waveform drawn
    Ready,

    /// Playback reached the end of the media
    Finish,

    /// Media could not be fetched or decoded
    Error(String),
}

/// Options for constructing a player instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformOptions {
    pub container: String,
    pub wave_color: Option<String>,
    pub progress_color: Option<String>,
    pub height: u32,
    pub normalize: bool,
    pub url: String,
    pub bar_width: u32,
    pub bar_gap: u32,
    pub bar_radius: u32,
    pub interact: bool,
    pub drag_to_seek: bool,
}

impl WaveformOptions {
    /// Options for rendering `url` with the configured waveform settings
    pub fn new(settings: &WaveformSettings, url: &str) -> Self {
        Self {
            container: settings.container.clone(),
            wave_color: settings.wave_color.clone(),
            progress_color: settings.progress_color.clone(),
            height: settings.height,
            normalize: settings.normalize,
            url: url.to_string(),
            bar_width: settings.bar_width,
            bar_gap: settings.bar_gap,
            bar_radius: settings.bar_radius,
            interact: settings.interact,
            drag_to_seek: settings.drag_to_seek,
        }
    }
}

/// Factory for player instances
pub trait WaveformEngine {
    /// Construct an instance rendering `options.url`
    ///
    /// The instance reports its lifecycle through `events`.
    fn create(
        &mut self,
        options: &WaveformOptions,
        events: EngineEvents,
    ) -> Result<Box<dyn WaveformInstance>>;
}

/// A live player instance bound to one audio url
pub trait WaveformInstance {
    fn play(&mut self);

    fn pause(&mut self);

    /// Toggle between playing and paused
    fn play_pause(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self);

    /// Release the instance and its rendering resources
    fn destroy(&mut self);

    /// Move the playhead to `seconds`
    fn set_time(&mut self, seconds: f64);

    /// Set output gain (0.0 - 1.0)
    fn set_volume(&mut self, volume: f64);
}

pub(crate) type EventQueue = Rc<RefCell<VecDeque<(InstanceId, EngineEvent)>>>;

/// Handle an instance uses to report lifecycle callbacks
///
/// Events are queued rather than dispatched inline, so a callback fired from
/// inside a session call (e.g. `finish` during `stop`) is handled only after
/// that call returns.
#[derive(Clone)]
pub struct EngineEvents {
    instance: InstanceId,
    queue: EventQueue,
}

impl EngineEvents {
    pub(crate) fn new(instance: InstanceId, queue: EventQueue) -> Self {
        Self { instance, queue }
    }

    /// Instance this handle reports for
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn emit(&self, event: EngineEvent) {
        self.queue.borrow_mut().push_back((self.instance, event));
    }

    pub fn load(&self) {
        self.emit(EngineEvent::Load);
    }

    pub fn ready(&self) {
        self.emit(EngineEvent::Ready);
    }

    pub fn finish(&self) {
        self.emit(EngineEvent::Finish);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(EngineEvent::Error(message.into()));
    }
}

impl fmt::Debug for EngineEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineEvents")
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

/// In-memory engine for unit tests
///
/// Records every call so tests can assert on the adapter traffic.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::PlayerError;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Create(InstanceId, String),
        Play(InstanceId),
        Pause(InstanceId),
        PlayPause(InstanceId),
        Stop(InstanceId),
        Destroy(InstanceId),
        SetTime(InstanceId, f64),
        SetVolume(InstanceId, f64),
    }

    #[derive(Default)]
    pub struct Shared {
        pub calls: Vec<Call>,
        pub handles: Vec<EngineEvents>,
        pub fail_next: bool,
    }

    #[derive(Clone, Default)]
    pub struct RecordingEngine {
        pub shared: Rc<RefCell<Shared>>,
    }

    impl RecordingEngine {
        pub fn calls(&self) -> Vec<Call> {
            self.shared.borrow().calls.clone()
        }

        /// Event handle of the most recently created instance
        pub fn latest(&self) -> EngineEvents {
            self.shared.borrow().handles.last().cloned().unwrap()
        }

        pub fn live_instances(&self) -> usize {
            let shared = self.shared.borrow();
            let created = shared
                .calls
                .iter()
                .filter(|c| matches!(c, Call::Create(..)))
                .count();
            let destroyed = shared
                .calls
                .iter()
                .filter(|c| matches!(c, Call::Destroy(..)))
                .count();
            created - destroyed
        }
    }

    struct RecordingInstance {
        id: InstanceId,
        shared: Rc<RefCell<Shared>>,
    }

    impl RecordingInstance {
        fn record(&self, call: Call) {
            self.shared.borrow_mut().calls.push(call);
        }
    }

    impl WaveformEngine for RecordingEngine {
        fn create(
            &mut self,
            options: &WaveformOptions,
            events: EngineEvents,
        ) -> Result<Box<dyn WaveformInstance>> {
            let mut shared = self.shared.borrow_mut();
            if shared.fail_next {
                shared.fail_next = false;
                return Err(PlayerError::Adapter("container not found".to_string()));
            }
            let id = events.instance();
            shared.calls.push(Call::Create(id, options.url.clone()));
            shared.handles.push(events);
            Ok(Box::new(RecordingInstance {
                id,
                shared: Rc::clone(&self.shared),
            }))
        }
    }

    impl WaveformInstance for RecordingInstance {
        fn play(&mut self) {
            self.record(Call::Play(self.id));
        }

        fn pause(&mut self) {
            self.record(Call::Pause(self.id));
        }

        fn play_pause(&mut self) {
            self.record(Call::PlayPause(self.id));
        }

        fn stop(&mut self) {
            self.record(Call::Stop(self.id));
        }

        fn destroy(&mut self) {
            self.record(Call::Destroy(self.id));
        }

        fn set_time(&mut self, seconds: f64) {
            self.record(Call::SetTime(self.id, seconds));
        }

        fn set_volume(&mut self, volume: f64) {
            self.record(Call::SetVolume(self.id, volume));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_with_instance() {
        let queue: EventQueue = Rc::default();
        let events = EngineEvents::new(InstanceId(7), Rc::clone(&queue));

        events.load();
        events.error("404");

        let drained: Vec<_> = queue.borrow_mut().drain(..).collect();
        assert_eq!(
            drained,
            vec![
                (InstanceId(7), EngineEvent::Load),
                (InstanceId(7), EngineEvent::Error("404".to_string())),
            ]
        );
    }

    #[test]
    fn options_follow_settings() {
        let settings = WaveformSettings {
            progress_color: Some("#ff5500".to_string()),
            ..WaveformSettings::default()
        };
        let options = WaveformOptions::new(&settings, "https://cdn.example.com/Cruise");

        assert_eq!(options.url, "https://cdn.example.com/Cruise");
        assert_eq!(options.height, 60);
        assert_eq!(options.progress_color.as_deref(), Some("#ff5500"));
        assert!(options.interact);
    }
}
