use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::Arc;

use crate::commands::music::error::MusicResult;

/// The user who sent a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: UserId,
    pub name: String,
}

/// An incoming guild message that commands can reply to.
#[async_trait]
pub trait ChatMessage: Send + Sync {
    fn guild_id(&self) -> GuildId;

    fn channel_id(&self) -> ChannelId;

    fn author(&self) -> &Requester;

    /// Reply to the message in its channel.
    async fn reply(&self, content: &str) -> MusicResult<()>;
}

/// `ChatMessage` backed by a Discord gateway message.
pub struct SerenityMessage {
    http: Arc<Http>,
    message: Message,
    guild_id: GuildId,
    author: Requester,
}

impl SerenityMessage {
    /// Wraps a message; returns `None` for messages sent outside a guild.
    pub fn new(http: Arc<Http>, message: Message) -> Option<Self> {
        let guild_id = message.guild_id?;
        let author = Requester {
            id: message.author.id,
            name: message.author.name.clone(),
        };

        Some(Self {
            http,
            message,
            guild_id,
            author,
        })
    }
}

#[async_trait]
impl ChatMessage for SerenityMessage {
    fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    fn channel_id(&self) -> ChannelId {
        self.message.channel_id
    }

    fn author(&self) -> &Requester {
        &self.author
    }

    async fn reply(&self, content: &str) -> MusicResult<()> {
        self.message.reply(self.http.clone(), content).await?;
        Ok(())
    }
}
