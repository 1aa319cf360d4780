//! Provides the application's SQLite database.
//! Holds the registry of users the bot has seen and their linked SoundCloud accounts.

use rusqlite::{Connection, OptionalExtension, Result as SqlResult, params};
use serenity::model::id::UserId;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// The default filename for the SQLite database.
pub const APPDATA_DB: &str = "application_data.db";

/// A SoundCloud account linked to a Discord user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCloudLink {
    pub user_id: UserId,
    pub soundcloud_id: u64,
    pub soundcloud_name: String,
}

/// Thread-safe handle to the SQLite database.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) the database file and ensures the tables exist.
    pub fn open(path: impl AsRef<Path>) -> SqlResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> SqlResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SqlResult<Self> {
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts or refreshes a user in the registry.
    pub fn record_user(&self, user_id: UserId, username: &str) -> SqlResult<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO users (user_id, username) VALUES (?1, ?2)",
            params![user_id.get(), username],
        )?;
        Ok(())
    }

    /// Looks up a registered user by name, ignoring case.
    pub fn find_user_by_name(&self, username: &str) -> SqlResult<Option<UserId>> {
        self.conn()
            .query_row(
                "SELECT user_id FROM users WHERE username = ?1 COLLATE NOCASE",
                params![username],
                |row| row.get::<_, u64>(0),
            )
            .optional()
            .map(|id| id.map(UserId::new))
    }

    /// Inserts or replaces the SoundCloud account linked to a user.
    pub fn link_soundcloud(&self, link: &SoundCloudLink) -> SqlResult<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO soundcloud_users (user_id, soundcloud_id, soundcloud_name)
             VALUES (?1, ?2, ?3)",
            params![link.user_id.get(), link.soundcloud_id, link.soundcloud_name],
        )?;
        Ok(())
    }

    /// Retrieves the SoundCloud account linked to a user, if any.
    pub fn soundcloud_link(&self, user_id: UserId) -> SqlResult<Option<SoundCloudLink>> {
        self.conn()
            .query_row(
                "SELECT soundcloud_id, soundcloud_name FROM soundcloud_users WHERE user_id = ?1",
                params![user_id.get()],
                |row| {
                    Ok(SoundCloudLink {
                        user_id,
                        soundcloud_id: row.get(0)?,
                        soundcloud_name: row.get(1)?,
                    })
                },
            )
            .optional()
    }
}

/// Creates the database tables (`users`, `soundcloud_users`) if they don't exist.
fn create_tables(conn: &Connection) -> SqlResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY,
            username TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS soundcloud_users (
            user_id INTEGER PRIMARY KEY,
            soundcloud_id INTEGER NOT NULL,
            soundcloud_name TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
