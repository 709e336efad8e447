//! Session events
//!
//! Change notifications for the UI layer. The session queues one event per
//! observable change; the UI drains them after each interaction and
//! re-reads whatever derived values it renders.

use crate::types::{PlayerPhase, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    /// Lifecycle phase changed
    StateChanged { phase: PlayerPhase },

    /// A different track is now loaded (or none)
    TrackChanged {
        track_id: Option<TrackId>,
        previous_track_id: Option<TrackId>,
    },

    /// Media fetch started (`Some`) or ended (`None`)
    LoadingChanged { track_id: Option<TrackId> },

    /// Selection in the track list changed
    SelectionChanged { track_id: Option<TrackId> },

    /// Volume level changed
    VolumeChanged { level: f64 },

    /// Artwork finished loading
    ImageLoaded { track_id: TrackId },

    /// Waveform engine failure
    Error { message: String },
}
