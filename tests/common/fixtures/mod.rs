//! Sample ids and provider payloads used across the integration tests.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const QUEUE_PREFIX: &str = "q.";

pub const GUILD_ID: u64 = 111_111;
pub const CHANNEL_ID: u64 = 222_222;
pub const OTHER_CHANNEL_ID: u64 = 333_333;
pub const USER_ID: u64 = 123_456_789;
pub const USER_NAME: &str = "alice";

/// Makes `query` resolve to a single YouTube video.
pub async fn mount_youtube_hit(server: &MockServer, query: &str, video_id: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": { "kind": "youtube#video", "videoId": video_id } }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("id", video_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": video_id,
                "snippet": { "title": title, "thumbnails": {} },
                "contentDetails": { "duration": "PT4M" }
            }]
        })))
        .mount(server)
        .await;
}

pub fn soundcloud_track(id: u64, title: &str) -> Value {
    json!({
        "kind": "track",
        "id": id,
        "title": title,
        "permalink_url": format!("https://soundcloud.com/artist/track-{}", id),
        "duration": 180_000
    })
}

/// Makes `url` resolve to a fully hydrated SoundCloud playlist.
pub async fn mount_soundcloud_playlist(server: &MockServer, url: &str, title: &str, tracks: &[&str]) {
    let tracks: Vec<Value> = tracks
        .iter()
        .zip(1..)
        .map(|(name, id)| soundcloud_track(id, name))
        .collect();

    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("url", url))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "playlist",
            "title": title,
            "tracks": tracks
        })))
        .mount(server)
        .await;
}

/// Makes `permalink` resolve to a SoundCloud user.
pub async fn mount_soundcloud_user(server: &MockServer, permalink: &str, id: u64, username: &str) {
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param(
            "url",
            format!("https://soundcloud.com/{}", permalink).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "user",
            "id": id,
            "username": username,
            "permalink_url": format!("https://soundcloud.com/{}", permalink)
        })))
        .mount(server)
        .await;
}

pub async fn mount_soundcloud_likes(server: &MockServer, user_id: u64, tracks: &[&str]) {
    let collection: Vec<Value> = tracks
        .iter()
        .zip(100..)
        .map(|(name, id)| json!({ "track": soundcloud_track(id, name) }))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/users/{}/track_likes", user_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "collection": collection })))
        .mount(server)
        .await;
}

/// Fails every request made to `server`.
pub async fn mount_outage(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(server)
        .await;
}
