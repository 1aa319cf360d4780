use std::fmt;
use tracing::info;

use super::QueueRouter;
use crate::commands::music::error::MusicResult;
use crate::commands::music::utils::chat::ChatMessage;
use crate::commands::music::utils::song_query::QueryResult;

pub const NOTHING_TO_ADD_MESSAGE: &str = "You didn't specify what to add!";

/// How resolved tracks are inserted into the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Keep the current queue and add to it.
    Add,
    /// Clear the current queue first.
    Replace,
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

impl QueueRouter {
    /// Resolves `params` into tracks and inserts them into the guild's queue.
    ///
    /// Replies to the user on success and when there is nothing to do. Errors are
    /// returned for the caller to report.
    pub(super) async fn insert_to_queue(
        &self,
        mode: InsertMode,
        message: &dyn ChatMessage,
        params: &[String],
    ) -> MusicResult<()> {
        if params.is_empty() {
            message.reply(NOTHING_TO_ADD_MESSAGE).await?;
            return Ok(());
        }

        let Some(result) = self.songs.resolve(message, params).await? else {
            return Ok(());
        };
        if result.songs.is_empty() {
            return Ok(());
        }

        let guild_id = message.guild_id();
        let reply = match mode {
            InsertMode::Add => added_reply(&result),
            InsertMode::Replace => replaced_reply(&result),
        };
        let player = self.players.get(guild_id);

        {
            let lock = self.guild_lock(guild_id);
            let _guard = lock.lock().await;

            if mode == InsertMode::Replace && player.queued_tracks().await != 0 {
                player.clear().await?;
            }
            info!(
                "Inserting {} tracks into guild {} ({}, next: {})",
                result.songs.len(),
                guild_id,
                mode,
                result.next_flag
            );
            player.enqueue(result.songs, result.next_flag).await?;
        }

        message.reply(&reply).await
    }
}

/// `**title**` for a single track, otherwise the track count.
fn describe_tracks(result: &QueryResult) -> String {
    match result.songs.as_slice() {
        [track] => format!("**{}**", track.title),
        songs => format!("{} songs", songs.len()),
    }
}

fn added_reply(result: &QueryResult) -> String {
    let suffix = if result.next_flag {
        "to be played next!"
    } else {
        "to the queue!"
    };
    format!("Successfully added {} {}", describe_tracks(result), suffix)
}

fn replaced_reply(result: &QueryResult) -> String {
    let contents = if result.songs.len() == 1 || result.playlists.is_empty() {
        describe_tracks(result)
    } else {
        format!(
            "{} ({} songs)",
            result.playlists.join(", "),
            result.songs.len()
        )
    };
    format!("Successfully replaced queue with {}!", contents)
}
