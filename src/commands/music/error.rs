use thiserror::Error;

/// Errors that can occur during music queue operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Discord error: {0}")]
    Transport(#[from] poise::serenity_prelude::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown queue command: {0}")]
    UnknownCommand(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;
