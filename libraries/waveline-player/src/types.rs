//! Core types for the player session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable track identifier (`track-{index}` in catalog order)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Id for the track at `index` in catalog order
    pub fn from_index(index: usize) -> Self {
        Self(format!("track-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Labelled position inside a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Offset from the start of the track, in seconds
    pub time: f64,

    /// Label shown next to the timestamp
    pub label: String,
}

/// Raw track metadata as supplied by the host page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDescriptor {
    /// Track title (required, also used to derive the audio filename)
    pub title: Option<String>,

    #[serde(default)]
    pub artist: String,

    #[serde(default)]
    pub album: String,

    /// Artwork filename relative to the base url
    #[serde(default)]
    pub art: String,

    #[serde(default)]
    pub timestamps: Option<Vec<Timestamp>>,

    #[serde(default)]
    pub spotify_url: Option<String>,
}

/// Track information held by the catalog
///
/// Metadata is fixed once the catalog is built. Only the three state flags
/// change, and only through the player session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,

    /// Resolved artwork url
    pub art_url: String,

    /// Resolved audio url handed to the waveform engine
    pub audio_url: String,

    pub timestamps: Vec<Timestamp>,
    pub spotify_url: Option<String>,

    pub(crate) loaded: bool,
    pub(crate) playing: bool,
    pub(crate) image_loaded: bool,
}

impl Track {
    /// Whether this track is bound to the live, ready player instance
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the host finished loading the album artwork
    pub fn is_image_loaded(&self) -> bool {
        self.image_loaded
    }
}

/// Coarse lifecycle phase derived from the player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Player closed or never opened
    Idle,

    /// Instance constructed, engine has not started fetching media
    Creating,

    /// Media fetch in progress
    Loading,

    /// Loaded and playing
    Playing,

    /// Loaded, not playing
    Paused,

    /// Player open but no instance (playlist boundary reached)
    Stopped,
}

/// Direction for playlist navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}
