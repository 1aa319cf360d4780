//! Defines the `TrackMetadata` struct, a unified representation of track information
//! from the YouTube and SoundCloud providers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unified representation of metadata for a queueable track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// The canonical URL of the track, if known.
    pub url: Option<String>,
    /// The duration of the track, if known.
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
    /// The name of the user who requested the track.
    pub requested_by: Option<String>,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Track".to_string(),
            url: None,
            duration: None,
            thumbnail: None,
            requested_by: None,
        }
    }
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Stamp the requesting user's name onto the track.
    pub fn requested_by(mut self, requester: &str) -> Self {
        self.requested_by = Some(requester.to_string());
        self
    }
}
