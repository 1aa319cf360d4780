//! Common test utilities, fixtures, and mocks
//! This module wires the real router, queue manager and resolver together with
//! mocked providers so tests can talk to the bot the way a guild member would.

pub mod fixtures;

use rusty_queue::commands::music::audio_sources::AudioApi;
use rusty_queue::commands::music::audio_sources::soundcloud::SoundCloudApi;
use rusty_queue::commands::music::audio_sources::youtube::YoutubeApi;
use rusty_queue::commands::music::queue::{QueueEvent, QueueRouter};
use rusty_queue::commands::music::utils::queue_manager::GuildQueueManager;
use rusty_queue::commands::music::utils::queue_player::GuildQueuePlayer;
use rusty_queue::commands::music::utils::song_query::SongQueryResolver;
use rusty_queue::events::CommandInvocation;
use rusty_queue::utils::database::Database;
use serenity::model::id::GuildId;
use std::sync::Arc;
use wiremock::MockServer;

use fixtures::{CHANNEL_ID, GUILD_ID, QUEUE_PREFIX, USER_ID, USER_NAME};
use mocks::{RecordingMessage, Replies};

/// A fully wired queue bot backed by mock provider servers.
pub struct TestBot {
    pub youtube: MockServer,
    pub soundcloud: MockServer,
    pub soundcloud_api: Arc<SoundCloudApi>,
    pub database: Arc<Database>,
    pub players: Arc<GuildQueueManager>,
    pub router: Arc<QueueRouter>,
}

impl TestBot {
    pub async fn start() -> Self {
        crate::test_utils::init();

        let youtube = MockServer::start().await;
        let soundcloud = MockServer::start().await;
        let database = Arc::new(Database::open_in_memory().expect("in-memory database"));

        let youtube_api = Arc::new(YoutubeApi::new(Some("yt-key".into()), Some(youtube.uri())));
        let soundcloud_api = Arc::new(SoundCloudApi::new(
            Some("sc-client".into()),
            Some(soundcloud.uri()),
        ));
        let providers: Vec<Arc<dyn AudioApi>> = vec![youtube_api, soundcloud_api.clone()];
        let resolver = Arc::new(SongQueryResolver::new(
            providers,
            soundcloud_api.clone(),
            database.clone(),
        ));

        let players = Arc::new(GuildQueueManager::new());
        let router = Arc::new(QueueRouter::new(players.clone(), resolver));

        Self {
            youtube,
            soundcloud,
            soundcloud_api,
            database,
            players,
            router,
        }
    }

    pub fn player(&self) -> Arc<GuildQueuePlayer> {
        self.players.player(GuildId::new(GUILD_ID))
    }

    /// Titles currently queued in the test guild, front first.
    pub async fn queued_titles(&self) -> Vec<String> {
        self.player()
            .tracks()
            .await
            .into_iter()
            .map(|track| track.title)
            .collect()
    }

    /// Sends `content` from the default user in the default channel.
    pub async fn say(&self, content: &str) -> Replies {
        self.say_in(CHANNEL_ID, content).await
    }

    /// Sends `content` from `channel_id` and waits for any background insertion to finish.
    pub async fn say_in(&self, channel_id: u64, content: &str) -> Replies {
        let invocation =
            CommandInvocation::parse(content, QUEUE_PREFIX).expect("content is a queue command");
        let (message, replies) = RecordingMessage::new(GUILD_ID, channel_id, USER_ID, USER_NAME);

        let task = self
            .router
            .handle(QueueEvent {
                command: invocation.command,
                message: Arc::new(message),
                params: invocation.params,
                permission_level: 0,
            })
            .await
            .expect("queue command failed");

        if let Some(task) = task {
            task.await.expect("insertion task panicked");
        }
        replies
    }
}
