//! Player session - core orchestration
//!
//! Owns the catalog, the mutable player state and the single live waveform
//! instance, and applies every transition to all three together.

use crate::{
    catalog::Catalog,
    config::PlayerConfig,
    engine::{EngineEvent, EngineEvents, InstanceId, WaveformEngine, WaveformInstance, WaveformOptions},
    error::{PlayerError, Result},
    events::SessionEvent,
    gesture::{PointerCapture, VolumeDrag},
    types::{Direction, PlayerPhase, Timestamp, Track, TrackDescriptor, TrackId},
    volume::Volume,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// CSS token exposed while the player is open
pub const ACTIVE_CLASS: &str = "active";

/// CSS token exposed while a track is mid-load
pub const LOADING_CLASS: &str = "loading-shimmer";

/// Player instance together with the track it was built for
struct LiveInstance {
    id: InstanceId,
    track: TrackId,
    player: Box<dyn WaveformInstance>,
}

/// What to do when navigation runs off the end of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// Tear the instance down (explicit next/previous)
    Destroy,

    /// Leave the instance loaded but stopped (track finished)
    Stop,
}

/// Central playback state machine
///
/// Orchestrates:
/// - Track selection and the create/load/play/stop/destroy lifecycle
/// - Next/previous navigation in catalog order
/// - Waveform engine callbacks (`load`, `ready`, `finish`, `error`)
/// - Volume with snap, mute memory and drag input
/// - Timestamp seeking
///
/// Engine callbacks are queued and applied by [`PlayerSession::pump`], one at
/// a time, so no transition ever runs inside another.
pub struct PlayerSession {
    catalog: Catalog,
    config: PlayerConfig,
    engine: Box<dyn WaveformEngine>,

    // State
    active: bool,
    selected_track: Option<TrackId>,
    loaded_track: Option<TrackId>,
    loading_track: Option<TrackId>,
    playing_track: Option<TrackId>,

    // Volume
    volume: Volume,
    volume_hover: bool,
    drag: VolumeDrag,

    // Player instance
    instance: Option<LiveInstance>,
    next_instance_id: u64,

    // Instances stopped by close(), destroyed at the start of the next turn
    pending_release: Vec<LiveInstance>,

    // Callbacks queued by live and torn-down instances
    engine_events: Rc<RefCell<VecDeque<(InstanceId, EngineEvent)>>>,

    // Event queue for UI synchronization
    pending_events: Vec<SessionEvent>,
}

impl PlayerSession {
    /// Create a session over an existing catalog
    pub fn new<E>(catalog: Catalog, config: PlayerConfig, engine: E) -> Self
    where
        E: WaveformEngine + 'static,
    {
        let volume = Volume::new(config.volume);

        Self {
            catalog,
            config,
            engine: Box::new(engine),
            active: false,
            selected_track: None,
            loaded_track: None,
            loading_track: None,
            playing_track: None,
            volume,
            volume_hover: false,
            drag: VolumeDrag::default(),
            instance: None,
            next_instance_id: 0,
            pending_release: Vec::new(),
            engine_events: Rc::default(),
            pending_events: Vec::new(),
        }
    }

    /// Build the catalog from raw descriptors, resolving urls against
    /// `config.base_url`
    pub fn from_descriptors<E>(
        descriptors: Vec<TrackDescriptor>,
        config: PlayerConfig,
        engine: E,
    ) -> Result<Self>
    where
        E: WaveformEngine + 'static,
    {
        let catalog = Catalog::build(descriptors, &config.base_url)?;
        Ok(Self::new(catalog, config, engine))
    }

    // ===== Track Lifecycle =====

    /// Mark a track as selected in the track list
    pub fn select_track(&mut self, id: &TrackId) -> Result<()> {
        self.settle();
        self.ensure_known(id)?;
        self.select(id);
        Ok(())
    }

    /// Open the player on `id`, replacing any live instance
    pub fn create_track(&mut self, id: &TrackId) -> Result<()> {
        self.transition(|s| s.spawn(id))
    }

    /// Mark `id` as the loaded track
    ///
    /// Any other loaded track is unloaded first.
    pub fn load_track(&mut self, id: &TrackId) -> Result<()> {
        self.transition(|s| {
            s.ensure_known(id)?;
            s.mark_loaded(id);
            Ok(())
        })
    }

    pub fn unload_track(&mut self, id: &TrackId) -> Result<()> {
        self.transition(|s| {
            s.ensure_known(id)?;
            s.mark_unloaded(id);
            Ok(())
        })
    }

    /// Start playback of the loaded track
    pub fn play_track(&mut self, id: &TrackId) -> Result<()> {
        self.transition(|s| s.start_playing(id))
    }

    /// Clear the playing flag; `None` is a no-op
    pub fn stop_track(&mut self, id: Option<&TrackId>) -> Result<()> {
        self.transition(|s| {
            let Some(id) = id else {
                debug!("stop_track without a track");
                return Ok(());
            };
            s.ensure_known(id)?;
            s.set_playing(id, false);
            Ok(())
        })
    }

    /// Stop and unload `id`, then stop and release the live instance
    ///
    /// With `None` only the instance is released; with no instance either,
    /// this is a no-op.
    pub fn destroy_track(&mut self, id: Option<&TrackId>) -> Result<()> {
        self.transition(|s| {
            if let Some(id) = id {
                s.ensure_known(id)?;
                s.mark_unloaded(id);
            }
            s.teardown(false);
            Ok(())
        })
    }

    /// Play/pause button
    ///
    /// Without a live instance this autostarts: `None` opens the first
    /// catalog track, `Some(id)` opens `id`. With a live instance it toggles
    /// the loaded track (`None` or its id). Nothing happens while the
    /// instance is still loading or for an id that is not loaded.
    pub fn play_pause_toggle(&mut self, id: Option<&TrackId>) -> Result<()> {
        self.transition(|s| {
            if s.instance.is_none() {
                let target = match id {
                    Some(id) => id.clone(),
                    None => match s.catalog.first() {
                        Some(track) => track.id.clone(),
                        None => return Err(PlayerError::State("catalog is empty".to_string())),
                    },
                };
                s.ensure_known(&target)?;
                s.select(&target);
                return s.spawn(&target);
            }

            let Some(loaded) = s.loaded_track.clone() else {
                debug!("Toggle ignored while a track is loading");
                return Ok(());
            };
            if let Some(id) = id.filter(|id| **id != loaded) {
                debug!(track = %id, "Toggle ignored for a track that is not loaded");
                return Ok(());
            }

            let now_playing = s.playing_track.as_ref() != Some(&loaded);
            if let Some(live) = s.instance.as_mut() {
                live.player.play_pause();
            }
            s.set_playing(&loaded, now_playing);
            Ok(())
        })
    }

    /// Skip to next track
    ///
    /// On the last track the instance is destroyed instead of wrapping.
    pub fn next_track(&mut self) -> Result<()> {
        self.transition(|s| s.advance(Direction::Next, Boundary::Destroy))
    }

    /// Go to previous track
    ///
    /// On the first track the instance is destroyed instead of wrapping.
    pub fn prev_track(&mut self) -> Result<()> {
        self.transition(|s| s.advance(Direction::Previous, Boundary::Destroy))
    }

    /// Jump to `time` seconds in the loaded track and play
    ///
    /// No-op when no track is loaded.
    pub fn seek_to_timestamp(&mut self, time: f64) -> Result<()> {
        self.transition(|s| {
            let Some(loaded) = s.loaded_track.clone() else {
                debug!(time, "Seek ignored, no track loaded");
                return Ok(());
            };
            let Some(live) = s.instance.as_mut() else {
                debug!(time, "Seek ignored, no player instance");
                return Ok(());
            };

            let time = time.max(0.0);
            live.player.set_time(time);
            live.player.play();
            s.set_playing(&loaded, true);
            debug!(track = %loaded, time, "Seeked to timestamp");
            Ok(())
        })
    }

    /// Close the player
    ///
    /// Stops and unloads the current track and marks the player inactive.
    /// The instance is stopped now and destroyed at the start of the next
    /// turn, so callbacks it fires while stopping never meet a half-released
    /// instance. A second call is a no-op.
    pub fn close(&mut self) {
        self.transition(|s| {
            if !s.active {
                debug!("close ignored, player inactive");
                return;
            }
            s.drag.end();
            s.teardown(true);
            s.active = false;
            info!("Closed player");
        });
    }

    /// Record that the album artwork for `id` finished loading
    pub fn mark_image_loaded(&mut self, id: &TrackId) -> Result<()> {
        self.settle();
        let track = self
            .catalog
            .get_mut(id)
            .ok_or_else(|| PlayerError::UnknownTrack(id.clone()))?;
        if !track.image_loaded {
            track.image_loaded = true;
            self.emit(SessionEvent::ImageLoaded {
                track_id: id.clone(),
            });
        }
        Ok(())
    }

    // ===== Engine Callbacks =====

    /// Apply every queued engine callback, then run deferred releases
    ///
    /// Returns the number of callbacks processed. Call this after any host
    /// turn in which the engine may have fired callbacks.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let next = self.engine_events.borrow_mut().pop_front();
            let Some((instance, event)) = next else {
                break;
            };
            self.transition(|s| s.on_engine_event(instance, event));
            handled += 1;
        }
        self.settle();
        handled
    }

    /// Queue a callback for `instance` and pump
    ///
    /// For hosts that receive callbacks outside an [`EngineEvents`] handle.
    pub fn dispatch(&mut self, instance: InstanceId, event: EngineEvent) -> usize {
        self.engine_events.borrow_mut().push_back((instance, event));
        self.pump()
    }

    /// Destroy instances released by [`PlayerSession::close`]
    ///
    /// Runs automatically at the start of every operation and at the end of
    /// [`PlayerSession::pump`].
    pub fn settle(&mut self) {
        for mut released in self.pending_release.drain(..) {
            released.player.destroy();
            debug!(instance = %released.id, track = %released.track, "Released player instance");
        }
    }

    // ===== Volume =====

    /// Set volume (0-100), snapping within 2 of either end
    pub fn set_volume(&mut self, level: f64) {
        self.settle();
        self.apply_volume(level);
    }

    /// Mute, or restore the level from before the mute
    pub fn toggle_mute(&mut self) {
        self.settle();
        let before = self.volume.level();
        self.volume.toggle_mute();
        if self.volume.level() != before {
            self.propagate_volume();
        }
    }

    /// Press on the volume bar
    ///
    /// The bar spans `[element_left, element_left + element_width]`. The
    /// pressed level also becomes the level unmute restores.
    /// `capture` is released when the drag ends, a new drag starts, the
    /// player closes or the session is dropped.
    pub fn volume_drag_start(
        &mut self,
        pointer_x: f64,
        element_left: f64,
        element_width: f64,
        capture: Box<dyn PointerCapture>,
    ) {
        self.settle();
        let level = self
            .drag
            .start(pointer_x, element_left, element_width, capture);
        self.apply_volume(level);
        self.volume.remember(level);
    }

    /// Pointer move during a volume drag
    pub fn volume_drag_move(&mut self, pointer_x: f64) {
        self.settle();
        if let Some(level) = self.drag.track(pointer_x) {
            self.apply_volume(level);
        }
    }

    /// Pointer release, wherever it happens
    pub fn volume_drag_end(&mut self) {
        self.settle();
        self.drag.end();
    }

    pub fn set_volume_hover(&mut self, hover: bool) {
        self.settle();
        self.volume_hover = hover;
    }

    /// Waveform colors for instances created from now on
    pub fn set_theme(&mut self, primary: Option<String>, secondary: Option<String>) {
        self.settle();
        self.config.waveform.progress_color = primary;
        self.config.waveform.wave_color = secondary;
    }

    // ===== State Queries =====

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.catalog.get(id)
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected_track(&self) -> Option<&TrackId> {
        self.selected_track.as_ref()
    }

    pub fn loaded_track(&self) -> Option<&TrackId> {
        self.loaded_track.as_ref()
    }

    pub fn loading_track(&self) -> Option<&TrackId> {
        self.loading_track.as_ref()
    }

    pub fn playing_track(&self) -> Option<&TrackId> {
        self.playing_track.as_ref()
    }

    /// Get current volume level (0-100)
    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn volume_before_mute(&self) -> Option<f64> {
        self.volume.before_mute()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag.is_active()
    }

    /// Bounds of the current (or last) volume drag
    pub fn drag_bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.drag.left_bound(), self.drag.right_bound())
    }

    pub fn volume_hover(&self) -> bool {
        self.volume_hover
    }

    pub fn primary_color(&self) -> Option<&str> {
        self.config.waveform.progress_color.as_deref()
    }

    pub fn secondary_color(&self) -> Option<&str> {
        self.config.waveform.wave_color.as_deref()
    }

    pub fn waveform_height(&self) -> u32 {
        self.config.waveform.height
    }

    /// Id of the live player instance, if any
    pub fn instance_id(&self) -> Option<InstanceId> {
        self.instance.as_ref().map(|live| live.id)
    }

    /// Track the live instance was built for, loaded or not
    pub fn instance_track(&self) -> Option<&TrackId> {
        self.instance.as_ref().map(|live| &live.track)
    }

    // ===== Derived Values =====

    pub fn active_class(&self) -> &'static str {
        if self.active {
            ACTIVE_CLASS
        } else {
            ""
        }
    }

    pub fn loading_class(&self) -> &'static str {
        if self.loading_track.is_some() {
            LOADING_CLASS
        } else {
            ""
        }
    }

    pub fn current_track_title(&self) -> Option<&str> {
        self.loaded_track
            .as_ref()
            .and_then(|id| self.catalog.get(id))
            .map(|t| t.title.as_str())
    }

    pub fn current_track_timestamps(&self) -> Option<&[Timestamp]> {
        self.loaded_track
            .as_ref()
            .and_then(|id| self.catalog.get(id))
            .map(|t| t.timestamps.as_slice())
    }

    pub fn phase(&self) -> PlayerPhase {
        if !self.active {
            PlayerPhase::Idle
        } else if self.instance.is_none() {
            PlayerPhase::Stopped
        } else if self.loading_track.is_some() {
            PlayerPhase::Loading
        } else if self.playing_track.is_some() {
            PlayerPhase::Playing
        } else if self.loaded_track.is_some() {
            PlayerPhase::Paused
        } else {
            PlayerPhase::Creating
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Run one turn: settle deferred work, apply `f`, report phase changes
    fn transition<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.settle();
        let before = self.phase();
        let result = f(self);
        let after = self.phase();
        if before != after {
            debug!(?before, ?after, "Player phase changed");
            self.emit(SessionEvent::StateChanged { phase: after });
        }
        result
    }

    fn on_engine_event(&mut self, instance: InstanceId, event: EngineEvent) {
        let Some(track) = self
            .instance
            .as_ref()
            .filter(|live| live.id == instance)
            .map(|live| live.track.clone())
        else {
            debug!(%instance, ?event, "Ignoring callback from released instance");
            return;
        };

        match event {
            EngineEvent::Load => {
                debug!(track = %track, "Loading media");
                self.loading_track = Some(track.clone());
                self.emit(SessionEvent::LoadingChanged {
                    track_id: Some(track),
                });
            }
            EngineEvent::Ready => {
                self.clear_loading();
                let gain = self.volume.gain();
                if let Some(live) = self.instance.as_mut() {
                    live.player.set_volume(gain);
                }
                self.mark_loaded(&track);
                if let Err(err) = self.start_playing(&track) {
                    warn!(track = %track, error = %err, "Could not start playback after ready");
                }
                info!(track = %track, "Track ready");
            }
            EngineEvent::Finish => {
                debug!(track = %track, "Track finished");
                if let Err(err) = self.advance(Direction::Next, Boundary::Stop) {
                    warn!(error = %err, "Could not advance after finish");
                }
            }
            EngineEvent::Error(message) => self.fail_load(&track, message),
        }
    }

    /// Build a fresh instance for `id`, tearing down the current one first
    fn spawn(&mut self, id: &TrackId) -> Result<()> {
        let url = self
            .catalog
            .get(id)
            .map(|t| t.audio_url.clone())
            .ok_or_else(|| PlayerError::UnknownTrack(id.clone()))?;

        self.active = true;
        if self.instance.is_some() {
            self.teardown(false);
        }

        let instance = InstanceId(self.next_instance_id);
        self.next_instance_id += 1;

        let events = EngineEvents::new(instance, Rc::clone(&self.engine_events));
        let options = WaveformOptions::new(&self.config.waveform, &url);

        match self.engine.create(&options, events) {
            Ok(player) => {
                info!(track = %id, %instance, url = %url, "Created player instance");
                self.instance = Some(LiveInstance {
                    id: instance,
                    track: id.clone(),
                    player,
                });
                Ok(())
            }
            Err(err) => {
                warn!(track = %id, error = %err, "Waveform engine failed to create instance");
                self.active = false;
                self.clear_loading();
                self.emit(SessionEvent::Error {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn advance(&mut self, direction: Direction, boundary: Boundary) -> Result<()> {
        let current = self
            .loaded_track
            .clone()
            .or_else(|| self.instance.as_ref().map(|live| live.track.clone()));
        let Some(current) = current else {
            debug!(?direction, "Navigation ignored, no current track");
            return Ok(());
        };

        let neighbor = self
            .catalog
            .neighbor(&current, direction)
            .map(|t| t.id.clone());

        match (neighbor, boundary) {
            (Some(target), _) => self.spawn(&target),
            (None, Boundary::Destroy) => {
                debug!(track = %current, ?direction, "Reached playlist boundary");
                self.teardown(false);
                Ok(())
            }
            (None, Boundary::Stop) => {
                debug!(track = %current, "Last track finished");
                self.set_playing(&current, false);
                Ok(())
            }
        }
    }

    fn fail_load(&mut self, track: &TrackId, message: String) {
        warn!(track = %track, %message, "Waveform engine failed to load media");
        self.teardown(false);
        self.active = false;
        self.emit(SessionEvent::Error { message });
    }

    /// Stop and unload the loaded track and drop the live instance
    ///
    /// `deferred` stops the instance now and leaves `destroy` to
    /// [`PlayerSession::settle`].
    fn teardown(&mut self, deferred: bool) {
        if let Some(loaded) = self.loaded_track.clone() {
            self.mark_unloaded(&loaded);
        }
        self.clear_loading();

        if let Some(mut live) = self.instance.take() {
            live.player.stop();
            if deferred {
                debug!(instance = %live.id, "Deferring player release");
                self.pending_release.push(live);
            } else {
                live.player.destroy();
                debug!(instance = %live.id, track = %live.track, "Destroyed player instance");
            }
        }
    }

    fn start_playing(&mut self, id: &TrackId) -> Result<()> {
        self.ensure_known(id)?;
        if self.loaded_track.as_ref() != Some(id) {
            return Err(PlayerError::State(format!("{id} is not loaded")));
        }
        let Some(live) = self.instance.as_mut() else {
            return Err(PlayerError::State("no player instance".to_string()));
        };

        live.player.play();
        self.set_playing(id, true);
        Ok(())
    }

    fn select(&mut self, id: &TrackId) {
        if self.selected_track.as_ref() != Some(id) {
            self.selected_track = Some(id.clone());
            self.emit(SessionEvent::SelectionChanged {
                track_id: Some(id.clone()),
            });
        }
    }

    fn mark_loaded(&mut self, id: &TrackId) {
        if self.loaded_track.as_ref() == Some(id) {
            return;
        }

        let previous = self.loaded_track.take();
        if let Some(previous) = &previous {
            self.set_playing(previous, false);
            if let Some(track) = self.catalog.get_mut(previous) {
                track.loaded = false;
            }
        }

        if let Some(track) = self.catalog.get_mut(id) {
            track.loaded = true;
            self.loaded_track = Some(id.clone());
            self.emit(SessionEvent::TrackChanged {
                track_id: Some(id.clone()),
                previous_track_id: previous,
            });
        }
    }

    fn mark_unloaded(&mut self, id: &TrackId) {
        self.set_playing(id, false);
        if let Some(track) = self.catalog.get_mut(id) {
            track.loaded = false;
        }
        if self.loaded_track.as_ref() == Some(id) {
            self.loaded_track = None;
            self.emit(SessionEvent::TrackChanged {
                track_id: None,
                previous_track_id: Some(id.clone()),
            });
        }
    }

    fn set_playing(&mut self, id: &TrackId, playing: bool) {
        if playing {
            if let Some(previous) = self.playing_track.replace(id.clone()) {
                if &previous != id {
                    if let Some(track) = self.catalog.get_mut(&previous) {
                        track.playing = false;
                    }
                }
            }
        } else if self.playing_track.as_ref() == Some(id) {
            self.playing_track = None;
        }

        if let Some(track) = self.catalog.get_mut(id) {
            track.playing = playing;
        }
    }

    fn clear_loading(&mut self) {
        if self.loading_track.take().is_some() {
            self.emit(SessionEvent::LoadingChanged { track_id: None });
        }
    }

    fn apply_volume(&mut self, level: f64) {
        let before = self.volume.level();
        self.volume.set_level(level);
        if self.volume.level() != before {
            self.propagate_volume();
        }
    }

    fn propagate_volume(&mut self) {
        let gain = self.volume.gain();
        if let Some(live) = self.instance.as_mut() {
            live.player.set_volume(gain);
        }
        self.emit(SessionEvent::VolumeChanged {
            level: self.volume.level(),
        });
    }

    fn ensure_known(&self, id: &TrackId) -> Result<()> {
        if self.catalog.contains(id) {
            Ok(())
        } else {
            Err(PlayerError::UnknownTrack(id.clone()))
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.settle();
        if let Some(mut live) = self.instance.take() {
            live.player.stop();
            live.player.destroy();
        }
    }
}
