//! WASM-compatible views of session state

use crate::{PlayerPhase, PlayerSession, Timestamp, Track};
use serde::Serialize;

/// Track as seen by the JS template layer
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrackView {
    id: String,
    title: String,
    artist: String,
    album: String,
    art_url: String,
    audio_url: String,
    timestamps: Vec<Timestamp>,
    spotify_url: Option<String>,
    loaded: bool,
    playing: bool,
    image_loaded: bool,
}

impl From<&Track> for TrackView {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.to_string(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            art_url: track.art_url.clone(),
            audio_url: track.audio_url.clone(),
            timestamps: track.timestamps.clone(),
            spotify_url: track.spotify_url.clone(),
            loaded: track.is_loaded(),
            playing: track.is_playing(),
            image_loaded: track.is_image_loaded(),
        }
    }
}

/// Full player state plus derived values, recomputed on every read
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    active: bool,
    phase: PlayerPhase,
    selected_track: Option<String>,
    loaded_track: Option<String>,
    loading_track: Option<String>,
    playing_track: Option<String>,
    volume: f64,
    volume_before_mute: Option<f64>,
    volume_mousedown: bool,
    volume_hover: bool,
    left_bound: Option<f64>,
    right_bound: Option<f64>,
    primary_color: Option<String>,
    secondary_color: Option<String>,
    height: u32,
    active_class: &'static str,
    loading_class: &'static str,
    track_name: Option<String>,
    timestamps: Option<Vec<Timestamp>>,
}

impl From<&PlayerSession> for SessionSnapshot {
    fn from(session: &PlayerSession) -> Self {
        let (left_bound, right_bound) = session.drag_bounds();
        Self {
            active: session.is_active(),
            phase: session.phase(),
            selected_track: session.selected_track().map(ToString::to_string),
            loaded_track: session.loaded_track().map(ToString::to_string),
            loading_track: session.loading_track().map(ToString::to_string),
            playing_track: session.playing_track().map(ToString::to_string),
            volume: session.volume(),
            volume_before_mute: session.volume_before_mute(),
            volume_mousedown: session.is_drag_active(),
            volume_hover: session.volume_hover(),
            left_bound,
            right_bound,
            primary_color: session.primary_color().map(str::to_string),
            secondary_color: session.secondary_color().map(str::to_string),
            height: session.waveform_height(),
            active_class: session.active_class(),
            loading_class: session.loading_class(),
            track_name: session.current_track_title().map(str::to_string),
            timestamps: session.current_track_timestamps().map(<[Timestamp]>::to_vec),
        }
    }
}
