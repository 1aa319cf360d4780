use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rusty_queue::commands::admins::music_channel::music_channel;
use rusty_queue::commands::music::audio_sources::AudioApi;
use rusty_queue::commands::music::audio_sources::soundcloud::SoundCloudApi;
use rusty_queue::commands::music::audio_sources::youtube::YoutubeApi;
use rusty_queue::commands::music::queue::QueueRouter;
use rusty_queue::commands::music::soundcloud_link::soundcloud_link;
use rusty_queue::commands::music::utils::queue_manager::GuildQueueManager;
use rusty_queue::commands::music::utils::song_query::SongQueryResolver;
use rusty_queue::config::{BotConfig, QUEUE_CATEGORY};
use rusty_queue::utils::database::Database;
use rusty_queue::{CommandResult, Context, Data, Error, events};

#[poise::command(slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    let extra_text = format!(
        "Queue commands use the `{0}` prefix: {0}show [page], {0}clear, {0}shuffle, \
         {0}add <query> [-n], {0}replace <query> [-n]",
        ctx.data().queue_prefix
    );

    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: &extra_text,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rusty_queue=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env()?;
    let queue_prefix = config.category_prefix(QUEUE_CATEGORY)?.to_string();
    info!("Queue commands use the prefix {:?}", queue_prefix);

    let database = Arc::new(Database::open(&config.database_path)?);

    let youtube = Arc::new(YoutubeApi::new(
        config.tokens.youtube.clone(),
        config.tokens.youtube_url.clone(),
    ));
    let soundcloud = Arc::new(SoundCloudApi::new(
        config.tokens.soundcloud.clone(),
        config.tokens.soundcloud_url.clone(),
    ));
    let providers: Vec<Arc<dyn AudioApi>> = vec![youtube, soundcloud.clone()];
    let resolver = Arc::new(SongQueryResolver::new(
        providers,
        soundcloud.clone(),
        database.clone(),
    ));

    let queue_players = Arc::new(GuildQueueManager::new());
    let router = Arc::new(QueueRouter::new(queue_players.clone(), resolver));

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let commands = vec![register(), help(), music_channel(), soundcloud_link()];

    let token = config.discord_token.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data {
                    queue_prefix,
                    queue_players,
                    router,
                    soundcloud,
                    database,
                })
            })
        })
        .build();

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        info!("Shutting down");
        shard_manager.shutdown_all().await;
    });

    client.start().await.map_err(Into::into)
}
