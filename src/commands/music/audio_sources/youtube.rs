//! Implements the `AudioApi` trait for YouTube using the YouTube Data API v3.
//! Supports single videos, playlists (`list=` URLs) and free-text search.

use regex::Regex;
use serde::Deserialize;
use serenity::async_trait;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{
    AudioApi, AudioSourceResult, ResolvedTracks, TrackMetadata, check_status, require_key,
};
use crate::HTTP_CLIENT;
use crate::commands::music::error::MusicError;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";
/// `playlistItems` returns at most 50 items per page; stop after this many pages.
const MAX_PLAYLIST_PAGES: usize = 4;

/// Matches ISO-8601 durations as returned in `contentDetails.duration` (e.g. `PT1H2M3S`).
static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap()
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    resource_id: Option<ResourceId>,
}

impl Snippet {
    fn thumbnail(&self) -> Option<String> {
        self.thumbnails
            .high
            .as_ref()
            .or(self.thumbnails.default.as_ref())
            .map(|t| t.url.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: Snippet,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

/// YouTube Data API client.
pub struct YoutubeApi {
    api_key: Option<String>,
    base_url: String,
}

impl YoutubeApi {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Checks if the input string is a YouTube URL (watch page, playlist or youtu.be).
    pub fn is_youtube_url(query: &str) -> bool {
        match Url::parse(query) {
            Ok(url) => url.host_str().is_some_and(|host| {
                matches!(
                    host,
                    "www.youtube.com"
                        | "youtube.com"
                        | "m.youtube.com"
                        | "music.youtube.com"
                        | "youtu.be"
                )
            }),
            Err(_) => false,
        }
    }

    /// Extracts the playlist id from a `list=` query parameter.
    fn extract_playlist_id(url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == "list")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
    }

    /// Extracts the video id from `watch?v=`, `youtu.be/<id>` or `/shorts/<id>` URLs.
    fn extract_video_id(url: &Url) -> Option<String> {
        if url.host_str() == Some("youtu.be") {
            return url
                .path_segments()?
                .next()
                .filter(|id| !id.is_empty())
                .map(str::to_string);
        }

        if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
            return Some(id.into_owned());
        }

        let mut segments = url.path_segments()?;
        match (segments.next(), segments.next()) {
            (Some("shorts" | "embed"), Some(id)) if !id.is_empty() => Some(id.to_string()),
            _ => None,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> AudioSourceResult<T> {
        let key = require_key(&self.api_key, "YOUTUBE_API_KEY")?;
        let url = format!("{}/youtube/v3/{}", self.base_url, endpoint);

        let response = HTTP_CLIENT
            .get(&url)
            .query(params)
            .query(&[("key", key)])
            .send()
            .await?;

        Ok(check_status("YouTube", response).await?.json().await?)
    }

    async fn video(
        &self,
        video_id: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<Option<TrackMetadata>> {
        let page: Page<VideoItem> = self
            .get(
                "videos",
                &[("part", "snippet,contentDetails"), ("id", video_id)],
            )
            .await?;

        Ok(page.items.into_iter().next().map(|item| {
            let duration = item
                .content_details
                .as_ref()
                .and_then(|details| parse_iso8601_duration(&details.duration));

            TrackMetadata {
                title: item.snippet.title.clone(),
                url: Some(watch_url(&item.id)),
                duration,
                thumbnail: item.snippet.thumbnail(),
                requested_by: None,
            }
            .requested_by(requestor_name)
        }))
    }

    async fn playlist(
        &self,
        playlist_id: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<ResolvedTracks> {
        let title = async {
            let page: Page<PlaylistItem> = self
                .get("playlists", &[("part", "snippet"), ("id", playlist_id)])
                .await?;
            Ok::<_, MusicError>(page.items.into_iter().next().map(|item| item.snippet.title))
        };

        let tracks = async {
            let mut tracks = Vec::new();
            let mut page_token: Option<String> = None;

            for _ in 0..MAX_PLAYLIST_PAGES {
                let mut params = vec![
                    ("part", "snippet"),
                    ("maxResults", "50"),
                    ("playlistId", playlist_id),
                ];
                if let Some(token) = page_token.as_deref() {
                    params.push(("pageToken", token));
                }

                let page: Page<PlaylistItem> = self.get("playlistItems", &params).await?;
                tracks.extend(page.items.into_iter().filter_map(|item| {
                    playlist_track(item.snippet).map(|t| t.requested_by(requestor_name))
                }));

                match page.next_page_token {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }

            Ok::<_, MusicError>(tracks)
        };

        let (title, tracks) = futures::try_join!(title, tracks)?;
        debug!("Fetched {} tracks from YouTube playlist {}", tracks.len(), playlist_id);

        Ok(ResolvedTracks {
            tracks,
            playlist: Some(title.unwrap_or_else(|| "YouTube playlist".to_string())),
        })
    }
}

#[async_trait]
impl AudioApi for YoutubeApi {
    fn name(&self) -> &'static str {
        "YouTube"
    }

    fn is_valid_url(&self, url: &str) -> bool {
        YoutubeApi::is_youtube_url(url)
    }

    async fn get_metadata(
        &self,
        url: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<ResolvedTracks> {
        info!("Fetching YouTube metadata for URL: {}", url);
        let parsed = Url::parse(url)
            .map_err(|e| MusicError::AudioSourceError(format!("Invalid YouTube URL: {}", e)))?;

        if let Some(playlist_id) = Self::extract_playlist_id(&parsed) {
            return self.playlist(&playlist_id, requestor_name).await;
        }

        let video_id = Self::extract_video_id(&parsed).ok_or_else(|| {
            MusicError::AudioSourceError("Could not extract video ID".to_string())
        })?;

        Ok(self
            .video(&video_id, requestor_name)
            .await?
            .map(ResolvedTracks::single)
            .unwrap_or_default())
    }

    async fn search(
        &self,
        query: &str,
        requestor_name: &str,
    ) -> AudioSourceResult<Option<TrackMetadata>> {
        info!("Searching YouTube for: {}", query);
        let page: Page<SearchItem> = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("maxResults", "1"),
                    ("q", query),
                ],
            )
            .await?;

        let Some(video_id) = page.items.into_iter().find_map(|item| item.id.video_id) else {
            return Ok(None);
        };

        self.video(&video_id, requestor_name).await
    }
}

fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Playlist entries for removed or private videos carry placeholder titles and are skipped.
fn playlist_track(snippet: Snippet) -> Option<TrackMetadata> {
    if matches!(snippet.title.as_str(), "Deleted video" | "Private video") {
        return None;
    }
    let video_id = snippet.resource_id.as_ref()?.video_id.clone()?;
    let thumbnail = snippet.thumbnail();

    Some(TrackMetadata {
        title: snippet.title,
        url: Some(watch_url(&video_id)),
        duration: None,
        thumbnail,
        requested_by: None,
    })
}

/// Parses an ISO-8601 duration such as `PT4M13S`. Zero-length durations (live streams) yield `None`.
pub fn parse_iso8601_duration(value: &str) -> Option<Duration> {
    let captures = ISO_DURATION_REGEX.captures(value)?;
    let part = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let seconds = part(1) * 86_400 + part(2) * 3_600 + part(3) * 60 + part(4);
    (seconds > 0).then(|| Duration::from_secs(seconds))
}
