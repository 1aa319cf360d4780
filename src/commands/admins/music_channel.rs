use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::music::error::MusicError;
use crate::commands::music::utils::queue_manager::{LockedChannel, QueuePlayer};
use crate::{CommandResult, Context, is_admin};

/// Lock queue commands to one text channel, or unlock them
#[poise::command(slash_command, guild_only, check = "is_admin", category = "Admin")]
pub async fn music_channel(
    ctx: Context<'_>,
    #[description = "Channel to lock queue commands to (leave empty to unlock)"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
    let player = ctx.data().queue_players.player(guild_id);

    let locked = channel.map(|channel| LockedChannel {
        id: channel.id,
        name: channel.name,
    });
    info!("Setting music channel of guild {} to {:?}", guild_id, locked);

    let reply = apply_lock(player.as_ref(), locked).await;
    ctx.say(reply).await?;

    Ok(())
}

async fn apply_lock(player: &dyn QueuePlayer, locked: Option<LockedChannel>) -> String {
    let reply = match &locked {
        Some(channel) => format!("Queue commands are now locked to <#{}>.", channel.id),
        None => "Queue commands can be used in any channel again.".to_string(),
    };
    player.set_channel(locked).await;
    reply
}
