//! Shared helpers for integration tests
//!
//! `MockEngine` records every adapter call and keeps the event handle of each
//! instance it creates, so tests can fire `load`/`ready`/`finish` by hand.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use waveline_player::{
    EngineEvents, InstanceId, PlayerConfig, PlayerError, PlayerSession, Result, TrackDescriptor,
    TrackId, WaveformEngine, WaveformInstance, WaveformOptions,
};

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
pub struct EngineLog {
    pub calls: Vec<Call>,
    pub handles: Vec<EngineEvents>,
    pub fail_next: bool,
    /// Fire `finish` from inside `stop`, like engines that report the
    /// playhead reaching the end when stopped
    pub finish_on_stop: bool,
    /// Fire `load` from inside `create`, before the instance is returned
    pub load_on_create: bool,
}

#[derive(Clone, Default)]
pub struct MockEngine {
    pub log: Rc<RefCell<EngineLog>>,
}

impl MockEngine {
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().calls.clone()
    }

    pub fn created(&self) -> usize {
        self.count(|c| matches!(c, Call::Create(..)))
    }

    pub fn destroyed(&self) -> usize {
        self.count(|c| matches!(c, Call::Destroy(..)))
    }

    pub fn live_instances(&self) -> usize {
        self.created() - self.destroyed()
    }

    pub fn was_destroyed(&self, instance: InstanceId) -> bool {
        self.log
            .borrow()
            .calls
            .iter()
            .any(|c| *c == Call::Destroy(instance))
    }

    /// Event handle of the most recently created instance
    pub fn latest(&self) -> EngineEvents {
        self.log
            .borrow()
            .handles
            .last()
            .cloned()
            .expect("no instance created")
    }

    pub fn handle(&self, instance: InstanceId) -> EngineEvents {
        self.log
            .borrow()
            .handles
            .iter()
            .find(|h| h.instance() == instance)
            .cloned()
            .expect("unknown instance")
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.log.borrow().calls.iter().filter(|c| predicate(c)).count()
    }
}

struct MockInstance {
    id: InstanceId,
    events: EngineEvents,
    log: Rc<RefCell<EngineLog>>,
}

impl MockInstance {
    fn record(&self, call: Call) {
        self.log.borrow_mut().calls.push(call);
    }
}

impl WaveformEngine for MockEngine {
    fn create(
        &mut self,
        options: &WaveformOptions,
        events: EngineEvents,
    ) -> Result<Box<dyn WaveformInstance>> {
        let mut log = self.log.borrow_mut();
        if log.fail_next {
            log.fail_next = false;
            return Err(PlayerError::Adapter("media element unavailable".to_string()));
        }
        let id = events.instance();
        log.calls.push(Call::Create(id, options.url.clone()));
        log.handles.push(events.clone());
        if log.load_on_create {
            events.load();
        }
        Ok(Box::new(MockInstance {
            id,
            events,
            log: Rc::clone(&self.log),
        }))
    }
}

impl WaveformInstance for MockInstance {
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
        if self.log.borrow().finish_on_stop {
            self.events.finish();
        }
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

pub fn descriptor(title: &str) -> TrackDescriptor {
    TrackDescriptor {
        title: Some(title.to_string()),
        artist: "yokram".to_string(),
        album: "offerings [vol 1]".to_string(),
        art: "art-offerings-vol-1".to_string(),
        timestamps: None,
        spotify_url: None,
    }
}

pub fn create_test_session(track_count: usize) -> (PlayerSession, MockEngine) {
    let engine = MockEngine::default();
    let config = PlayerConfig {
        base_url: "https://cdn.example.com".to_string(),
        ..PlayerConfig::default()
    };
    let descriptors = (0..track_count)
        .map(|i| descriptor(&format!("Track {}", i)))
        .collect();
    let session = PlayerSession::from_descriptors(descriptors, config, engine.clone())
        .expect("valid descriptors");
    (session, engine)
}

pub fn id(index: usize) -> TrackId {
    TrackId::from_index(index)
}

/// Fire `load` + `ready` on the latest instance and pump
pub fn make_ready(session: &mut PlayerSession, engine: &MockEngine) {
    let events = engine.latest();
    events.load();
    events.ready();
    session.pump();
}

/// Check the loaded/playing invariants against every track's flags
pub fn assert_invariants(session: &PlayerSession) {
    let loaded: Vec<_> = session
        .catalog()
        .iter()
        .filter(|t| t.is_loaded())
        .map(|t| t.id.clone())
        .collect();
    let playing: Vec<_> = session
        .catalog()
        .iter()
        .filter(|t| t.is_playing())
        .map(|t| t.id.clone())
        .collect();

    assert!(loaded.len() <= 1, "more than one loaded track: {:?}", loaded);
    assert_eq!(loaded.first(), session.loaded_track());
    assert!(playing.len() <= 1, "more than one playing track: {:?}", playing);
    assert_eq!(playing.first(), session.playing_track());

    if let Some(playing) = session.playing_track() {
        assert_eq!(session.loaded_track(), Some(playing));
        assert!(session.track(playing).unwrap().is_loaded());
    }
}
