use poise::CreateReply;
use serenity::model::id::UserId;
use tracing::{info, warn};

use crate::commands::music::audio_sources::soundcloud::SoundCloudApi;
use crate::commands::music::error::MusicResult;
use crate::utils::database::{Database, SoundCloudLink};
use crate::{CommandResult, Context};

/// Link your SoundCloud account so `likes` queries can find your liked tracks
#[poise::command(slash_command, category = "Music")]
pub async fn soundcloud_link(
    ctx: Context<'_>,
    #[description = "Your SoundCloud profile URL or username"] profile: String,
) -> CommandResult {
    ctx.defer_ephemeral().await?;

    let data = ctx.data();
    let author = ctx.author();

    let reply = match link_account(
        &data.soundcloud,
        &data.database,
        author.id,
        &author.name,
        &profile,
    )
    .await
    {
        Ok(link) => format!(
            "Linked your SoundCloud account **{}**! Try `{}add likes` to queue your likes.",
            link.soundcloud_name, data.queue_prefix
        ),
        Err(e) => {
            warn!("Failed to link SoundCloud profile {}: {}", profile, e);
            format!(
                "I couldn't link `{}`. Make sure it's a public SoundCloud profile.",
                profile
            )
        }
    };

    ctx.send(CreateReply::default().content(reply).ephemeral(true))
        .await?;

    Ok(())
}

/// Resolves `profile` and stores it as the SoundCloud account of `user_id`.
pub async fn link_account(
    soundcloud: &SoundCloudApi,
    database: &Database,
    user_id: UserId,
    username: &str,
    profile: &str,
) -> MusicResult<SoundCloudLink> {
    let user = soundcloud.resolve_user(profile).await?;

    let link = SoundCloudLink {
        user_id,
        soundcloud_id: user.id,
        soundcloud_name: user.username,
    };
    database.record_user(user_id, username)?;
    database.link_soundcloud(&link)?;

    info!(
        "Linked user {} to SoundCloud account {} ({})",
        user_id, link.soundcloud_name, link.soundcloud_id
    );
    Ok(link)
}
