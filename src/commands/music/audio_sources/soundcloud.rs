//! Implements the `AudioApi` trait for SoundCloud using the api-v2 endpoints.
//! Also exposes user resolution and track likes, used for linked accounts.

use serde::Deserialize;
use serenity::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{
    AudioApi, AudioSourceResult, ResolvedTracks, TrackMetadata, check_status, require_key,
};
use crate::HTTP_CLIENT;
use crate::commands::music::error::MusicError;

const DEFAULT_BASE_URL: &str = "https://api-v2.soundcloud.com";
/// Upper bound on ids per `/tracks?ids=` request.
const TRACK_BATCH_SIZE: usize = 50;
const LIKES_LIMIT: &str = "50";

/// Playlists only embed full data for their first few tracks; the rest are id-only stubs.
#[derive(Debug, Deserialize)]
struct SoundCloudTrack {
    id: u64,
    title: Option<String>,
    permalink_url: Option<String>,
    /// Milliseconds.
    duration: Option<u64>,
    artwork_url: Option<String>,
}

impl SoundCloudTrack {
    fn into_metadata(self, requestor_name: &str) -> Option<TrackMetadata> {
        Some(
            TrackMetadata {
                title: self.title?,
                url: self.permalink_url,
                duration: self.duration.filter(|ms| *ms > 0).map(Duration::from_millis),
                thumbnail: self.artwork_url,
                requested_by: None,
            }
            .requested_by(requestor_name),
        )
    }
}

#[derive(Debug, Deserialize)]
struct SoundCloudPlaylist {
    title: String,
    #[serde(default)]
    tracks: Vec<SoundCloudTrack>,
}

/// A SoundCloud account, as stored for linked users.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SoundCloudUser {
    pub id: u64,
    pub username: String,
    pub permalink_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Resource {
    Track(SoundCloudTrack),
    Playlist(SoundCloudPlaylist),
    User(SoundCloudUser),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    collection: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Like {
    track: Option<SoundCloudTrack>,
}

/// SoundCloud api-v2 client.
pub struct SoundCloudApi {
    client_id: Option<String>,
    base_url: String,
}

impl SoundCloudApi {
    pub fn new(client_id: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client_id,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Checks if the given URL points at soundcloud.com.
    pub fn is_soundcloud_url(url: &str) -> bool {
        Url::parse(url).is_ok_and(|url| {
            url.host_str().is_some_and(|host| {
                matches!(
                    host,
                    "soundcloud.com" | "www.soundcloud.com" | "m.soundcloud.com" | "on.soundcloud.com"
                )
            })
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AudioSourceResult<T> {
        let client_id = require_key(&self.client_id, "SOUNDCLOUD_CLIENT_ID")?;
        let url = format!("{}{}", self.base_url, path);

        let response = HTTP_CLIENT
            .get(&url)
            .query(params)
            .query(&[("client_id", client_id)])
            .send()
            .await?;

        Ok(check_status("SoundCloud", response).await?.json().await?)
    }

    async fn resolve(&self, url: &str) -> AudioSourceResult<Resource> {
        self.get("/resolve", &[("url", url)]).await
    }

    /// Resolves a profile URL or bare permalink (e.g. `some-artist`) to the SoundCloud user.
    pub async fn resolve_user(&self, profile: &str) -> AudioSourceResult<SoundCloudUser> {
        let url = if Self::is_soundcloud_url(profile) {
            profile.to_string()
        } else {
            format!("https://soundcloud.com/{}", profile.trim_matches('/'))
        };

        match self.resolve(&url).await? {
            Resource::User(user) => Ok(user),
            _ => Err(MusicError::AudioSourceError(format!(
                "{} is not a SoundCloud profile",
                profile
            ))),
        }
    }

    /// The most recent track likes of a SoundCloud user.
    pub async fn user_likes(
        &self,
        user_id: u64,
        requestor_name: &str,
    ) -> AudioSourceResult<Vec<TrackMetadata>> {
        let path = format!("/users/{}/track_likes", user_id);
        let likes: Collection<Like> = self.get(&path, &[("limit", LIKES_LIMIT)]).await?;

        Ok(likes
            .collection
            .into_iter()
            .filter_map(|like| like.track)
            .filter_map(|track| track.into_metadata(requestor_name))
            .collect())
    }

    /// Fills in id-only playlist entries, keeping the playlist order.
    async fn hydrate(
        &self,
        tracks: Vec<SoundCloudTrack>,
        requestor_name: &str,
    ) -> AudioSourceResult<Vec<TrackMetadata>> {
        let stub_ids: Vec<String> = tracks
            .iter()
            .filter(|track| track.title.is_none())
            .map(|track| track.id.to_string())
            .collect();

        let mut fetched = Vec::new();
        for batch in stub_ids.chunks(TRACK_BATCH_SIZE) {
            let ids = batch.join(",");
            let full: Vec<SoundCloudTrack> = self.get("/tracks", &[("ids", ids.as_str())]).await?;
            fetched.extend(full);
        }
        debug!("Hydrated {} SoundCloud playlist stubs", fetched.len());

        Ok(tracks
            .into_iter()
            .filter_map(|track| match track.title {
                Some(_) => Some(track),
                None => fetched
                    .iter()
                    .position(|full| full.id == track.id)
                    .map(|index| fetched.swap_remove(index)),
            })
            .filter_map(|track| track.into_metadata(requestor_name))
            .collect())
    }
}

#[async_trait]
impl AudioApi for SoundCloudApi {
    fn name(&self) -> &'static str {
        "SoundCloud"
    }

    fn is_valid_url(&self, url: &str) -> bool {
        SoundCloudApi::is_soundcloud_url(url)
    }

    async fn get_metadata(
        &self,
        url: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<ResolvedTracks> {
        info!("Resolving SoundCloud URL: {}", url);

        match self.resolve(url).await? {
            Resource::Track(track) => Ok(track
                .into_metadata(requestor_name)
                .map(ResolvedTracks::single)
                .unwrap_or_default()),
            Resource::Playlist(playlist) => Ok(ResolvedTracks {
                tracks: self.hydrate(playlist.tracks, requestor_name).await?,
                playlist: Some(playlist.title),
            }),
            Resource::User(_) | Resource::Other => Err(MusicError::AudioSourceError(
                "That SoundCloud link is not a track or playlist".to_string(),
            )),
        }
    }

    async fn search(
        &self,
        query: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<Option<TrackMetadata>> {
        info!("Searching SoundCloud for: {}", query);
        let results: Collection<SoundCloudTrack> = self
            .get("/search/tracks", &[("q", query), ("limit", "1")])
            .await?;

        Ok(results
            .collection
            .into_iter()
            .find_map(|track| track.into_metadata(requestor_name)))
    }
}
