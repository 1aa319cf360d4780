//! Gateway event handling: turns prefixed guild messages into queue commands.

use poise::serenity_prelude as serenity;
use serenity::{FullEvent, Message, Permissions, RoleId};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::commands::music::queue::QueueEvent;
use crate::commands::music::utils::chat::SerenityMessage;
use crate::{Data, Error};

/// A prefixed text command split into its name and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Lower-cased command name.
    pub command: String,
    pub params: Vec<String>,
}

impl CommandInvocation {
    /// Parses `content` if it starts with `prefix` and names a command.
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let mut tokens = content.strip_prefix(prefix)?.split_whitespace();
        let command = tokens.next()?.to_lowercase();

        Some(Self {
            command,
            params: tokens.map(String::from).collect(),
        })
    }
}

/// Permission level of a guild member: owner 3, administrator 2, server manager 1, anyone else 0.
pub fn permission_level(is_owner: bool, permissions: Permissions) -> u8 {
    if is_owner {
        3
    } else if permissions.contains(Permissions::ADMINISTRATOR) {
        2
    } else if permissions.contains(Permissions::MANAGE_GUILD) {
        1
    } else {
        0
    }
}

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}", data_about_bot.user.name);
        }
        FullEvent::Message { new_message } => {
            handle_message(ctx, new_message, data).await?;
        }
        _ => {}
    }
    Ok(())
}

async fn handle_message(
    ctx: &serenity::Context,
    message: &Message,
    data: &Data,
) -> Result<(), Error> {
    if message.author.bot {
        return Ok(());
    }
    let Some(invocation) = CommandInvocation::parse(&message.content, &data.queue_prefix) else {
        return Ok(());
    };
    let Some(chat) = SerenityMessage::new(ctx.http.clone(), message.clone()) else {
        debug!("Ignoring queue command outside of a guild");
        return Ok(());
    };

    let permission_level = member_permission_level(ctx, message).await;
    debug!(
        "{} invoked {} {:?}",
        message.author.name, invocation.command, invocation.params
    );

    // add/replace finish in the background and report their own failures.
    data.router
        .handle(QueueEvent {
            command: invocation.command,
            message: Arc::new(chat),
            params: invocation.params,
            permission_level,
        })
        .await?;

    Ok(())
}

async fn member_permission_level(ctx: &serenity::Context, message: &Message) -> u8 {
    let Some(guild_id) = message.guild_id else {
        return 0;
    };
    let member_roles = message
        .member
        .as_ref()
        .map(|member| member.roles.as_slice())
        .unwrap_or_default();
    let everyone = RoleId::new(guild_id.get());

    // REST only for guilds missing from the cache.
    let cached = ctx.cache.guild(guild_id).map(|guild| {
        let permissions = combined_permissions(member_roles, everyone, |role_id| {
            guild.roles.get(role_id).map(|role| role.permissions)
        });
        permission_level(guild.owner_id == message.author.id, permissions)
    });
    if let Some(level) = cached {
        return level;
    }

    let guild = match guild_id.to_partial_guild(ctx).await {
        Ok(guild) => guild,
        Err(e) => {
            warn!("Failed to fetch guild {}: {}", guild_id, e);
            return 0;
        }
    };
    let permissions = combined_permissions(member_roles, everyone, |role_id| {
        guild.roles.get(role_id).map(|role| role.permissions)
    });
    permission_level(guild.owner_id == message.author.id, permissions)
}

/// Union of the permissions granted by the member's roles and the @everyone role.
fn combined_permissions(
    member_roles: &[RoleId],
    everyone: RoleId,
    role_permissions: impl Fn(&RoleId) -> Option<Permissions>,
) -> Permissions {
    member_roles
        .iter()
        .chain(std::iter::once(&everyone))
        .filter_map(role_permissions)
        .fold(Permissions::empty(), |acc, permissions| acc | permissions)
}
