use pretty_assertions::assert_eq;
use rstest::rstest;
use rusty_queue::commands::music::audio_sources::TrackMetadata;
use rusty_queue::commands::music::utils::queue_manager::{LockedChannel, QueuePlayer};
use serenity::model::id::ChannelId;

use crate::common::TestBot;
use crate::common::fixtures::{CHANNEL_ID, OTHER_CHANNEL_ID};

async fn fill_queue(bot: &TestBot, count: usize) {
    let tracks = (1..=count)
        .map(|n| TrackMetadata::new(format!("Track {}", n)))
        .collect();
    bot.player().enqueue(tracks, false).await.unwrap();
}

#[tokio::test]
async fn test_show_empty_queue() {
    let bot = TestBot::start().await;

    let mut replies = bot.say("q.show").await;

    assert_eq!(replies.next().await, "The queue is currently empty.");
}

#[rstest]
#[case("q.show", "Page 1/3", "`1.` Track 1")]
#[case("q.show 2", "Page 2/3", "`11.` Track 11")]
#[case("q.SHOW 7", "Page 3/3", "`21.` Track 21")]
#[tokio::test]
async fn test_show_pages(#[case] content: &str, #[case] page: &str, #[case] first: &str) {
    let bot = TestBot::start().await;
    fill_queue(&bot, 25).await;

    let mut replies = bot.say(content).await;
    let page_text = replies.next().await;
    let lines: Vec<&str> = page_text.lines().collect();

    assert!(lines[0].contains("(25 tracks)"), "{}", lines[0]);
    assert!(lines[0].ends_with(page), "{}", lines[0]);
    assert_eq!(lines[1], first);
}

#[tokio::test]
async fn test_clear() {
    let bot = TestBot::start().await;

    let mut replies = bot.say("q.clear").await;
    assert_eq!(replies.next().await, "The queue is already empty though...");

    fill_queue(&bot, 3).await;
    let mut replies = bot.say("q.clear").await;
    assert_eq!(replies.next().await, "I have cleared the queue");
    assert!(bot.queued_titles().await.is_empty());
}

#[tokio::test]
async fn test_shuffle() {
    let bot = TestBot::start().await;
    fill_queue(&bot, 1).await;

    let mut replies = bot.say("q.shuffle").await;
    assert_eq!(
        replies.next().await,
        "There aren't enough songs in the queue to shuffle!"
    );

    fill_queue(&bot, 9).await;
    let mut replies = bot.say("q.shuffle").await;
    assert_eq!(replies.next().await, "Successfully shuffled the queue");
    assert_eq!(bot.queued_titles().await.len(), 10);
}

#[tokio::test]
async fn test_unknown_command_is_silent() {
    let bot = TestBot::start().await;

    let mut replies = bot.say("q.dance").await;

    assert!(replies.drain().is_empty());
}

#[rstest]
#[case("q.show")]
#[case("q.clear")]
#[case("q.shuffle")]
#[case("q.add never gonna give you up")]
#[case("q.replace never gonna give you up")]
#[tokio::test]
async fn test_channel_lock_redirects(#[case] content: &str) {
    let bot = TestBot::start().await;
    fill_queue(&bot, 2).await;
    bot.player()
        .set_channel(Some(LockedChannel {
            id: ChannelId::new(CHANNEL_ID),
            name: "music".into(),
        }))
        .await;

    let mut replies = bot.say_in(OTHER_CHANNEL_ID, content).await;

    assert_eq!(
        replies.drain(),
        vec!["My music channel has been locked in for `#music`. Try again over there!"]
    );
    assert_eq!(bot.queued_titles().await, vec!["Track 1", "Track 2"]);
    assert!(bot.youtube.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_channel_lock_allows_locked_channel() {
    let bot = TestBot::start().await;
    bot.player()
        .set_channel(Some(LockedChannel {
            id: ChannelId::new(CHANNEL_ID),
            name: "music".into(),
        }))
        .await;

    let mut replies = bot.say_in(CHANNEL_ID, "q.clear").await;

    assert_eq!(replies.next().await, "The queue is already empty though...");
}
