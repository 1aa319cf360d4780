use pretty_assertions::assert_eq;
use rusty_queue::commands::music::audio_sources::TrackMetadata;
use rusty_queue::commands::music::soundcloud_link::link_account;
use rusty_queue::commands::music::utils::queue_manager::QueuePlayer;
use serenity::model::id::UserId;

use crate::common::TestBot;
use crate::common::fixtures::{
    USER_ID, USER_NAME, mount_outage, mount_soundcloud_likes, mount_soundcloud_playlist,
    mount_soundcloud_user, mount_youtube_hit,
};

const PLAYLIST_URL: &str = "https://soundcloud.com/artist/sets/road-trip";

#[tokio::test]
async fn test_add_without_query() {
    let bot = TestBot::start().await;

    let mut replies = bot.say("q.add").await;

    assert_eq!(replies.next().await, "You didn't specify what to add!");
    assert!(bot.youtube.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_flag_only() {
    let bot = TestBot::start().await;

    let mut replies = bot.say("q.add --next").await;

    assert_eq!(
        replies.next().await,
        "You didn't give me anything to search for!"
    );
    assert!(bot.queued_titles().await.is_empty());
}

#[tokio::test]
async fn test_add_search_result() {
    let bot = TestBot::start().await;
    mount_youtube_hit(&bot.youtube, "never gonna", "dQw4w9WgXcQ", "Never Gonna Give You Up").await;

    let mut replies = bot.say("q.add never gonna").await;

    assert_eq!(
        replies.next().await,
        "Successfully added **Never Gonna Give You Up** to the queue!"
    );
    let queued = bot.player().tracks().await;
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].requested_by.as_deref(), Some(USER_NAME));
    assert_eq!(
        queued[0].url.as_deref(),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );
}

#[tokio::test]
async fn test_add_next_goes_to_front() {
    let bot = TestBot::start().await;
    bot.player()
        .enqueue(vec![TrackMetadata::new("Already queued")], false)
        .await
        .unwrap();
    mount_soundcloud_playlist(&bot.soundcloud, PLAYLIST_URL, "Road Trip", &["One", "Two", "Three"])
        .await;

    let mut replies = bot.say(&format!("q.add -n {}", PLAYLIST_URL)).await;

    assert_eq!(
        replies.next().await,
        "Successfully added 3 songs to be played next!"
    );
    assert_eq!(
        bot.queued_titles().await,
        vec!["One", "Two", "Three", "Already queued"]
    );
}

#[tokio::test]
async fn test_replace_playlist() {
    let bot = TestBot::start().await;
    bot.player()
        .enqueue(vec![TrackMetadata::new("Old"), TrackMetadata::new("Older")], false)
        .await
        .unwrap();
    mount_soundcloud_playlist(&bot.soundcloud, PLAYLIST_URL, "Road Trip", &["One", "Two"]).await;

    let mut replies = bot.say(&format!("q.replace {}", PLAYLIST_URL)).await;

    assert_eq!(
        replies.next().await,
        "Successfully replaced queue with Road Trip (2 songs)!"
    );
    assert_eq!(bot.queued_titles().await, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_nothing_found() {
    let bot = TestBot::start().await;
    wiremock::Mock::given(wiremock::matchers::path("/youtube/v3/search"))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })),
        )
        .mount(&bot.youtube)
        .await;
    wiremock::Mock::given(wiremock::matchers::path("/search/tracks"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "collection": [] })),
        )
        .mount(&bot.soundcloud)
        .await;

    let mut replies = bot.say("q.add zzz qqq").await;

    assert_eq!(replies.drain(), vec!["I couldn't find anything for `zzz qqq`"]);
    assert!(bot.queued_titles().await.is_empty());
}

#[tokio::test]
async fn test_provider_outage_leaves_queue_alone() {
    let bot = TestBot::start().await;
    bot.player()
        .enqueue(vec![TrackMetadata::new("Keep me")], false)
        .await
        .unwrap();
    mount_outage(&bot.youtube).await;
    mount_outage(&bot.soundcloud).await;

    let mut replies = bot.say("q.replace anything").await;

    assert_eq!(replies.drain(), vec!["Failed to add anything to the queue."]);
    assert_eq!(bot.queued_titles().await, vec!["Keep me"]);
}

#[tokio::test]
async fn test_add_linked_likes() {
    let bot = TestBot::start().await;
    mount_soundcloud_user(&bot.soundcloud, "alice-beats", 77, "Alice Beats").await;
    mount_soundcloud_likes(&bot.soundcloud, 77, &["Liked One", "Liked Two"]).await;

    link_account(
        &bot.soundcloud_api,
        &bot.database,
        UserId::new(USER_ID),
        USER_NAME,
        "alice-beats",
    )
    .await
    .unwrap();

    let mut replies = bot.say("q.replace likes").await;

    assert_eq!(
        replies.next().await,
        "Successfully replaced queue with Alice Beats's likes (2 songs)!"
    );
    assert_eq!(bot.queued_titles().await, vec!["Liked One", "Liked Two"]);

    // Other members can queue the same likes by name.
    let mut replies = bot.say("q.add likes ALICE").await;
    assert_eq!(replies.next().await, "Successfully added 2 songs to the queue!");
    assert_eq!(bot.queued_titles().await.len(), 4);
}

#[tokio::test]
async fn test_add_likes_without_link() {
    let bot = TestBot::start().await;

    let mut replies = bot.say("q.add likes").await;

    let reply = replies.next().await;
    assert!(reply.contains("/soundcloud_link"), "{}", reply);
    assert!(replies.drain().is_empty());
}
