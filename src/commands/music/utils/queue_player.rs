use rand::seq::SliceRandom;
use serenity::async_trait;
use std::collections::VecDeque;
use std::fmt::Write;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use super::format_duration;
use super::queue_manager::{LockedChannel, QueuePlayer};
use crate::commands::music::audio_sources::TrackMetadata;
use crate::commands::music::error::MusicResult;

/// Number of tracks listed per page of `show`.
pub const TRACKS_PER_PAGE: usize = 10;

pub const EMPTY_QUEUE_MESSAGE: &str = "The queue is currently empty.";
pub const SHUFFLE_TOO_SHORT_MESSAGE: &str = "There aren't enough songs in the queue to shuffle!";

#[derive(Default)]
struct PlayerState {
    tracks: VecDeque<TrackMetadata>,
    channel: Option<LockedChannel>,
}

/// In-memory queue for a single guild.
#[derive(Default)]
pub struct GuildQueuePlayer {
    state: Mutex<PlayerState>,
}

impl GuildQueuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the queued tracks, front first.
    pub async fn tracks(&self) -> Vec<TrackMetadata> {
        self.state.lock().await.tracks.iter().cloned().collect()
    }
}

#[async_trait]
impl QueuePlayer for GuildQueuePlayer {
    async fn queued_tracks(&self) -> usize {
        self.state.lock().await.tracks.len()
    }

    async fn channel(&self) -> Option<LockedChannel> {
        self.state.lock().await.channel.clone()
    }

    async fn set_channel(&self, channel: Option<LockedChannel>) {
        self.state.lock().await.channel = channel;
    }

    async fn enqueue(&self, tracks: Vec<TrackMetadata>, insert_next: bool) -> MusicResult<()> {
        let mut state = self.state.lock().await;
        debug!("Enqueueing {} tracks (next: {})", tracks.len(), insert_next);

        if insert_next {
            for track in tracks.into_iter().rev() {
                state.tracks.push_front(track);
            }
        } else {
            state.tracks.extend(tracks);
        }
        Ok(())
    }

    async fn clear(&self) -> MusicResult<()> {
        self.state.lock().await.tracks.clear();
        Ok(())
    }

    async fn shuffle(&self) -> MusicResult<Option<String>> {
        let mut state = self.state.lock().await;
        if state.tracks.len() < 2 {
            return Ok(Some(SHUFFLE_TOO_SHORT_MESSAGE.to_string()));
        }

        state.tracks.make_contiguous().shuffle(&mut rand::rng());
        Ok(None)
    }

    async fn show(&self, page: usize) -> MusicResult<Option<String>> {
        let state = self.state.lock().await;
        Ok(Some(render_page(&state.tracks, page)))
    }
}

/// Discord rejects messages longer than this many characters.
const MAX_MESSAGE_CHARS: usize = 2000;
/// Longer titles are cut and end with an ellipsis.
const MAX_TITLE_CHARS: usize = 60;

/// Renders one page of the queue. `page` is 1-based and clamped to the valid range.
///
/// The result never exceeds [`MAX_MESSAGE_CHARS`]; lines that would cross it are
/// replaced by a count of the tracks left out.
fn render_page(tracks: &VecDeque<TrackMetadata>, page: usize) -> String {
    if tracks.is_empty() {
        return EMPTY_QUEUE_MESSAGE.to_string();
    }

    let pages = tracks.len().div_ceil(TRACKS_PER_PAGE);
    let page = page.clamp(1, pages);
    let start = (page - 1) * TRACKS_PER_PAGE;

    let mut out = format!(
        "**Queue** ({} tracks) - Page {}/{}\n",
        tracks.len(),
        page,
        pages
    );
    let total: Duration = tracks.iter().filter_map(|track| track.duration).sum();
    let footer = format!("Total duration: `{}`", format_duration(total));

    let page_tracks: Vec<_> = tracks
        .iter()
        .enumerate()
        .skip(start)
        .take(TRACKS_PER_PAGE)
        .collect();
    let mut used = out.chars().count() + footer.chars().count();
    let mut hidden = 0;

    for (shown, (index, track)) in page_tracks.iter().enumerate() {
        let line = render_line(*index, track);
        let line_chars = line.chars().count();
        let remaining = page_tracks.len() - shown - 1;
        // Room for the "more tracks" note whenever something after this line could be cut.
        let reserve = if remaining > 0 {
            hidden_note(remaining).chars().count()
        } else {
            0
        };

        if used + line_chars + reserve > MAX_MESSAGE_CHARS {
            hidden = page_tracks.len() - shown;
            break;
        }
        used += line_chars;
        out.push_str(&line);
    }

    if hidden > 0 {
        out.push_str(&hidden_note(hidden));
    }
    out.push_str(&footer);
    out
}

fn render_line(index: usize, track: &TrackMetadata) -> String {
    let title = truncate_title(&track.title);
    let mut line = format!("`{}.` ", index + 1);
    match &track.url {
        Some(url) => {
            let _ = write!(line, "[{}]({})", title, url);
        }
        None => line.push_str(&title),
    }
    if let Some(duration) = track.duration {
        let _ = write!(line, " `{}`", format_duration(duration));
    }
    line.push('\n');
    line
}

fn hidden_note(count: usize) -> String {
    format!("*...and {} more on this page*\n", count)
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let mut cut: String = title.chars().take(MAX_TITLE_CHARS - 1).collect();
    cut.push('…');
    cut
}
