//! Turns the free-form arguments of `add`/`replace` into tracks.
//!
//! A query is either a provider URL, `likes [username]` for a linked SoundCloud
//! account, or free text that is searched on YouTube and then SoundCloud.

use serenity::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::chat::ChatMessage;
use crate::commands::music::audio_sources::soundcloud::SoundCloudApi;
use crate::commands::music::audio_sources::{AudioApi, AudioSource, TrackMetadata};
use crate::commands::music::error::MusicResult;
use crate::utils::database::Database;

pub const EMPTY_QUERY_MESSAGE: &str = "You didn't give me anything to search for!";

const NEXT_FLAGS: [&str; 2] = ["-n", "--next"];
const LIKES_KEYWORD: &str = "likes";

/// Outcome of resolving a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub songs: Vec<TrackMetadata>,
    /// The query asked for the songs to be played next.
    pub next_flag: bool,
    /// Display names of the collections the songs came from.
    pub playlists: Vec<String>,
}

/// Resolves a query into songs. Returns `None` when the user has already been told
/// why nothing could be resolved.
#[async_trait]
pub trait SongQuery: Send + Sync {
    async fn resolve(
        &self,
        message: &dyn ChatMessage,
        query: &[String],
    ) -> MusicResult<Option<QueryResult>>;
}

pub struct SongQueryResolver {
    /// Searched in order for free-text queries.
    providers: Vec<Arc<dyn AudioApi>>,
    soundcloud: Arc<SoundCloudApi>,
    database: Arc<Database>,
}

impl SongQueryResolver {
    pub fn new(
        providers: Vec<Arc<dyn AudioApi>>,
        soundcloud: Arc<SoundCloudApi>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            providers,
            soundcloud,
            database,
        }
    }

    async fn resolve_likes(
        &self,
        message: &dyn ChatMessage,
        username: Option<&str>,
    ) -> MusicResult<Option<QueryResult>> {
        let requester = message.author();

        let user_id = match username {
            None => requester.id,
            Some(name) => match self.database.find_user_by_name(name)? {
                Some(id) => id,
                None => {
                    message
                        .reply(&format!("I don't know anyone called `{}`.", name))
                        .await?;
                    return Ok(None);
                }
            },
        };

        let Some(link) = self.database.soundcloud_link(user_id)? else {
            let reply = match username {
                None => "You haven't linked a SoundCloud account yet! Use `/soundcloud_link` first."
                    .to_string(),
                Some(name) => format!("`{}` hasn't linked a SoundCloud account.", name),
            };
            message.reply(&reply).await?;
            return Ok(None);
        };

        debug!(
            "Fetching likes of SoundCloud user {} ({})",
            link.soundcloud_name, link.soundcloud_id
        );
        let songs = self
            .soundcloud
            .user_likes(link.soundcloud_id, &requester.name)
            .await?;

        Ok(Some(QueryResult {
            songs,
            next_flag: false,
            playlists: vec![format!("{}'s likes", link.soundcloud_name)],
        }))
    }

    async fn resolve_url(&self, url: &str, requester: &str) -> MusicResult<Option<QueryResult>> {
        let Some(provider) = self.providers.iter().find(|p| p.is_valid_url(url)) else {
            return Ok(None);
        };

        info!("Resolving {} URL: {}", provider.name(), url);
        let resolved = provider.get_metadata(url, requester).await?;

        Ok(Some(QueryResult {
            songs: resolved.tracks,
            next_flag: false,
            playlists: resolved.playlist.into_iter().collect(),
        }))
    }

    async fn search(&self, query: &str, requester: &str) -> MusicResult<Option<TrackMetadata>> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.search(query, requester).await {
                Ok(Some(track)) => return Ok(Some(track)),
                Ok(None) => debug!("{} had no results for {}", provider.name(), query),
                Err(e) => {
                    warn!("{} search failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SongQuery for SongQueryResolver {
    async fn resolve(
        &self,
        message: &dyn ChatMessage,
        query: &[String],
    ) -> MusicResult<Option<QueryResult>> {
        let requester = message.author();
        self.database.record_user(requester.id, &requester.name)?;

        let next_flag = query.iter().any(|token| NEXT_FLAGS.contains(&token.as_str()));
        let terms: Vec<&str> = query
            .iter()
            .map(String::as_str)
            .filter(|token| !NEXT_FLAGS.contains(token))
            .collect();

        if terms.is_empty() {
            message.reply(EMPTY_QUERY_MESSAGE).await?;
            return Ok(None);
        }

        let wants_likes = terms[0].eq_ignore_ascii_case(LIKES_KEYWORD) && terms.len() <= 2;
        let result = if wants_likes {
            self.resolve_likes(message, terms.get(1).copied()).await?
        } else if terms.len() == 1 && AudioSource::is_url(terms[0]) {
            self.resolve_url(terms[0], &requester.name).await?
        } else {
            let text = terms.join(" ");
            self.search(&text, &requester.name)
                .await?
                .map(|track| QueryResult {
                    songs: vec![track],
                    ..Default::default()
                })
        };

        match result {
            Some(found) if !found.songs.is_empty() => Ok(Some(QueryResult { next_flag, ..found })),
            // The likes lookup already explained itself.
            None if wants_likes => Ok(None),
            _ => {
                message
                    .reply(&format!("I couldn't find anything for `{}`", terms.join(" ")))
                    .await?;
                Ok(None)
            }
        }
    }
}
