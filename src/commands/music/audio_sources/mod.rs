//! This module defines the structure and traits for the external music search providers.
//! It includes implementations for YouTube and SoundCloud, and provides a common
//! interface (`AudioApi`) for turning URLs and free text into track metadata.

/// Submodule implementing the `AudioApi` trait for SoundCloud.
pub mod soundcloud;
/// Submodule defining the `TrackMetadata` struct used across audio sources.
pub mod track_metadata;
/// Submodule implementing the `AudioApi` trait for YouTube.
pub mod youtube;

use crate::commands::music::error::MusicError;
use serenity::async_trait;
use url::Url;

pub use track_metadata::TrackMetadata;

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// Tracks fetched from a URL, with the playlist (or album/likes) name when the URL
/// pointed at a collection rather than a single track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTracks {
    pub tracks: Vec<TrackMetadata>,
    pub playlist: Option<String>,
}

impl ResolvedTracks {
    pub fn single(track: TrackMetadata) -> Self {
        Self {
            tracks: vec![track],
            playlist: None,
        }
    }
}

/// Trait defining the common interface for all search providers (e.g., YouTube, SoundCloud).
/// Requires `Send + Sync` to be safely used across async tasks.
#[async_trait]
pub trait AudioApi: Send + Sync {
    /// Human readable provider name, used in logs.
    fn name(&self) -> &'static str;

    /// Checks if the given URL string is recognized by this specific provider.
    fn is_valid_url(&self, url: &str) -> bool;

    /// Fetches metadata for the track or playlist at the given URL.
    ///
    /// # Arguments
    ///
    /// * `url` - A URL previously accepted by `is_valid_url`.
    /// * `requestor_name` - The name of the user who requested the track(s).
    async fn get_metadata(
        &self,
        url: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<ResolvedTracks>;

    /// Returns the best match for a free-text query, if any.
    async fn search(
        &self,
        query: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<Option<TrackMetadata>>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as an http(s) URL.
    /// Does not validate if the URL is actually reachable or supported by any provider.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}

/// Reads an API credential, failing with a configuration error when it was not provided.
pub(crate) fn require_key<'a>(key: &'a Option<String>, name: &str) -> AudioSourceResult<&'a str> {
    key.as_deref()
        .ok_or_else(|| MusicError::ConfigError(format!("{} not set", name)))
}

/// Turns a non-2xx response into an `ExternalApiError` carrying the status and body.
pub(crate) async fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> AudioSourceResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Cannot read response".to_string());
    Err(MusicError::ExternalApiError(format!(
        "{} API error: {} - {}",
        provider, status, text
    )))
}
