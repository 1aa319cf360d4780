use std::sync::{Arc, LazyLock};

use poise::serenity_prelude as serenity;

pub mod commands;
pub mod config;
pub mod events;
pub mod utils;

use commands::music::audio_sources::soundcloud::SoundCloudApi;
use commands::music::queue::QueueRouter;
use commands::music::utils::queue_manager::GuildQueueManager;
use utils::database::Database;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Shared HTTP client used by every search provider.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// User data, stored and accessible in all command invocations and events
pub struct Data {
    /// Prefix of the `Queue` command category, resolved once at startup.
    pub queue_prefix: String,
    pub queue_players: Arc<GuildQueueManager>,
    pub router: Arc<QueueRouter>,
    pub soundcloud: Arc<SoundCloudApi>,
    pub database: Arc<Database>,
}

pub async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(false);
    };

    let guild = guild_id.to_partial_guild(ctx).await?;
    if guild.owner_id == ctx.author().id {
        return Ok(true);
    }

    let member = guild_id.member(ctx, ctx.author().id).await?;
    Ok(member
        .roles
        .iter()
        .filter_map(|role_id| guild.roles.get(role_id))
        .any(|role| role.permissions.contains(serenity::Permissions::ADMINISTRATOR)))
}
