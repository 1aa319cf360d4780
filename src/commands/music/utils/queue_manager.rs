use dashmap::DashMap;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use tracing::debug;

use super::queue_player::GuildQueuePlayer;
use crate::commands::music::audio_sources::TrackMetadata;
use crate::commands::music::error::MusicResult;

#[cfg(test)]
use mockall::automock;

/// The text channel a guild's queue commands are restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedChannel {
    pub id: ChannelId,
    pub name: String,
}

/// The per-guild queue and its mutation operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueuePlayer: Send + Sync {
    /// Number of tracks waiting in the queue.
    async fn queued_tracks(&self) -> usize;

    /// The channel lock, if one is set.
    async fn channel(&self) -> Option<LockedChannel>;

    async fn set_channel(&self, channel: Option<LockedChannel>);

    /// Add tracks to the back of the queue, or to the front when `insert_next` is set.
    async fn enqueue(&self, tracks: Vec<TrackMetadata>, insert_next: bool) -> MusicResult<()>;

    async fn clear(&self) -> MusicResult<()>;

    /// Shuffle the queue. Returns a message when the queue could not be reordered.
    async fn shuffle(&self) -> MusicResult<Option<String>>;

    /// Render one page of the queue for display.
    async fn show(&self, page: usize) -> MusicResult<Option<String>>;
}

/// Looks up the queue player for a guild.
#[cfg_attr(test, automock)]
pub trait QueuePlayerManager: Send + Sync {
    fn get(&self, guild_id: GuildId) -> Arc<dyn QueuePlayer>;
}

/// Manages one `GuildQueuePlayer` per guild, created on first lookup.
#[derive(Default)]
pub struct GuildQueueManager {
    players: DashMap<GuildId, Arc<GuildQueuePlayer>>,
}

impl GuildQueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The concrete player for a guild, creating it if needed.
    pub fn player(&self, guild_id: GuildId) -> Arc<GuildQueuePlayer> {
        self.players
            .entry(guild_id)
            .or_insert_with(|| {
                debug!("Creating queue player for guild {}", guild_id);
                Arc::new(GuildQueuePlayer::new())
            })
            .clone()
    }
}

impl QueuePlayerManager for GuildQueueManager {
    fn get(&self, guild_id: GuildId) -> Arc<dyn QueuePlayer> {
        self.player(guild_id)
    }
}
