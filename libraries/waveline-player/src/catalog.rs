//! Track catalog
//!
//! Ordered, id-addressable collection of tracks built once from the host's
//! track list. Catalog order defines next/previous adjacency.

use crate::error::{PlayerError, Result};
use crate::types::{Direction, Track, TrackDescriptor, TrackId};
use std::collections::HashMap;

/// Immutable ordered track collection
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
}

impl Catalog {
    /// Build a catalog from raw descriptors
    ///
    /// Ids are assigned as `track-{index}` in input order. Audio and artwork
    /// urls are resolved against `base_url`.
    pub fn build(descriptors: Vec<TrackDescriptor>, base_url: &str) -> Result<Self> {
        let mut tracks = Vec::with_capacity(descriptors.len());
        let mut index = HashMap::with_capacity(descriptors.len());

        for (position, descriptor) in descriptors.into_iter().enumerate() {
            let title = match descriptor.title {
                Some(title) if !title.trim().is_empty() => title,
                Some(_) => {
                    return Err(PlayerError::Config {
                        index: position,
                        reason: "title is blank".to_string(),
                    })
                }
                None => {
                    return Err(PlayerError::Config {
                        index: position,
                        reason: "missing title".to_string(),
                    })
                }
            };

            let id = TrackId::from_index(position);
            let audio_url = format!("{}/{}", base_url, audio_filename(&title));
            let art_url = format!("{}/{}", base_url, descriptor.art);

            index.insert(id.clone(), position);
            tracks.push(Track {
                id,
                title,
                artist: descriptor.artist,
                album: descriptor.album,
                art_url,
                audio_url,
                timestamps: descriptor.timestamps.unwrap_or_default(),
                spotify_url: descriptor.spotify_url,
                loaded: false,
                playing: false,
                image_loaded: false,
            });
        }

        tracing::debug!(tracks = tracks.len(), base_url, "Built track catalog");

        Ok(Self { tracks, index })
    }

    /// Parse a JSON array of descriptors and build the catalog
    pub fn from_json(json: &str, base_url: &str) -> Result<Self> {
        let descriptors: Vec<TrackDescriptor> = serde_json::from_str(json)?;
        Self::build(descriptors, base_url)
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.index.get(id).map(|&i| &self.tracks[i])
    }

    pub(crate) fn get_mut(&mut self, id: &TrackId) -> Option<&mut Track> {
        let &i = self.index.get(id)?;
        self.tracks.get_mut(i)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a track in catalog order
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn first(&self) -> Option<&Track> {
        self.tracks.first()
    }

    /// Adjacent track in the given direction, `None` at the playlist boundary
    pub fn neighbor(&self, id: &TrackId, direction: Direction) -> Option<&Track> {
        let position = self.position(id)?;
        match direction {
            Direction::Next => self.tracks.get(position + 1),
            Direction::Previous => position.checked_sub(1).and_then(|p| self.tracks.get(p)),
        }
    }

    /// Tracks in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks matching `predicate`, in catalog order
    pub fn filter<F>(&self, predicate: F) -> Vec<&Track>
    where
        F: Fn(&Track) -> bool,
    {
        self.tracks.iter().filter(|t| predicate(t)).collect()
    }

    pub fn by_album(&self, album: &str) -> Vec<&Track> {
        self.filter(|t| t.album == album)
    }
}

/// Filename the audio host stores a track under
///
/// Spaces become `+` and the en-dash is percent-encoded; every other
/// character is passed through as-is.
pub fn audio_filename(title: &str) -> String {
    title.replace(' ', "+").replace('\u{2013}', "%E2%80%93")
}
