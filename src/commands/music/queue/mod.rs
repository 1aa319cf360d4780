//! Routes the prefixed queue commands (`show`, `clear`, `shuffle`, `add`, `replace`)
//! to the guild's queue player.

mod insert;

pub use insert::InsertMode;

use dashmap::DashMap;
use serenity::model::id::GuildId;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::error::{MusicError, MusicResult};
use super::utils::chat::ChatMessage;
use super::utils::queue_manager::QueuePlayerManager;
use super::utils::song_query::SongQuery;

pub const ALREADY_EMPTY_MESSAGE: &str = "The queue is already empty though...";
pub const CLEARED_MESSAGE: &str = "I have cleared the queue";
pub const SHUFFLED_MESSAGE: &str = "Successfully shuffled the queue";
pub const INSERT_FAILED_MESSAGE: &str = "Failed to add anything to the queue.";

/// A command delivered for the queue category.
pub struct QueueEvent {
    pub command: String,
    pub message: Arc<dyn ChatMessage>,
    pub params: Vec<String>,
    pub permission_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCommand {
    Show,
    Clear,
    Shuffle,
    Add,
    Replace,
}

impl FromStr for QueueCommand {
    type Err = MusicError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "show" => Ok(Self::Show),
            "clear" => Ok(Self::Clear),
            "shuffle" => Ok(Self::Shuffle),
            "add" => Ok(Self::Add),
            "replace" => Ok(Self::Replace),
            other => Err(MusicError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for QueueCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Show => "show",
            Self::Clear => "clear",
            Self::Shuffle => "shuffle",
            Self::Add => "add",
            Self::Replace => "replace",
        };
        f.write_str(name)
    }
}

pub struct QueueRouter {
    players: Arc<dyn QueuePlayerManager>,
    songs: Arc<dyn SongQuery>,
    /// Serializes queue mutations from add/replace within a guild.
    guild_locks: DashMap<GuildId, Arc<Mutex<()>>>,
}

impl QueueRouter {
    pub fn new(players: Arc<dyn QueuePlayerManager>, songs: Arc<dyn SongQuery>) -> Self {
        Self {
            players,
            songs,
            guild_locks: DashMap::new(),
        }
    }

    fn guild_lock(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        self.guild_locks.entry(guild_id).or_default().clone()
    }

    /// Dispatches one queue command.
    ///
    /// `show`, `clear` and `shuffle` complete before this returns and their errors are
    /// propagated. `add` and `replace` run in a background task whose handle is returned;
    /// that task reports its own failures to the user.
    pub async fn handle(self: &Arc<Self>, event: QueueEvent) -> MusicResult<Option<JoinHandle<()>>> {
        let QueueEvent {
            command,
            message,
            params,
            permission_level,
        } = event;

        let player = self.players.get(message.guild_id());

        if let Some(locked) = player.channel().await {
            if locked.id != message.channel_id() {
                debug!(
                    "Redirecting {} from channel {} to locked channel {}",
                    command,
                    message.channel_id(),
                    locked.id
                );
                message
                    .reply(&format!(
                        "My music channel has been locked in for `#{}`. Try again over there!",
                        locked.name
                    ))
                    .await?;
                return Ok(None);
            }
        }

        let command = match command.parse::<QueueCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!("Ignoring queue event: {}", e);
                return Ok(None);
            }
        };
        debug!(
            "Queue command {} in guild {} (permission level {})",
            command,
            message.guild_id(),
            permission_level
        );

        match command {
            QueueCommand::Show => {
                let page = params
                    .first()
                    .and_then(|param| param.parse().ok())
                    .unwrap_or(1);
                if let Some(summary) = player.show(page).await? {
                    if !summary.is_empty() {
                        message.reply(&summary).await?;
                    }
                }
            }
            QueueCommand::Clear => {
                if player.queued_tracks().await == 0 {
                    message.reply(ALREADY_EMPTY_MESSAGE).await?;
                } else {
                    player.clear().await?;
                    message.reply(CLEARED_MESSAGE).await?;
                }
            }
            QueueCommand::Shuffle => {
                let reply = player.shuffle().await?;
                message
                    .reply(reply.as_deref().unwrap_or(SHUFFLED_MESSAGE))
                    .await?;
            }
            QueueCommand::Add => {
                return Ok(Some(self.spawn_insert(InsertMode::Add, message, params)));
            }
            QueueCommand::Replace => {
                return Ok(Some(self.spawn_insert(InsertMode::Replace, message, params)));
            }
        }

        Ok(None)
    }

    fn spawn_insert(
        self: &Arc<Self>,
        mode: InsertMode,
        message: Arc<dyn ChatMessage>,
        params: Vec<String>,
    ) -> JoinHandle<()> {
        let router = Arc::clone(self);

        tokio::spawn(async move {
            if let Err(e) = router.insert_to_queue(mode, message.as_ref(), &params).await {
                error!(
                    "Failed to {} {:?} in guild {}: {}",
                    mode,
                    params,
                    message.guild_id(),
                    e
                );
                if let Err(e) = message.reply(INSERT_FAILED_MESSAGE).await {
                    error!("Failed to report insertion failure: {}", e);
                }
            }
        })
    }
}
