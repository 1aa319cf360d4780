//! Runtime configuration, read from the environment (after `dotenv` has loaded `.env`).

use serde::Deserialize;
use std::env;
use thiserror::Error;

use crate::utils::database::APPDATA_DB;

/// Name of the command category the queue router subscribes to.
pub const QUEUE_CATEGORY: &str = "Queue";

const DEFAULT_COMMAND_CATEGORIES: &str = r#"[{"name":"Queue","prefix":"q."}]"#;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not specified in env")]
    Missing(&'static str),

    #[error("Malformed COMMAND_CATEGORIES: {0}")]
    Categories(#[from] serde_json::Error),

    #[error("No command category named {0}")]
    UnknownCategory(String),
}

/// A named group of text commands sharing one prefix (e.g. `q.add`, `q.show`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommandCategory {
    pub name: String,
    pub prefix: String,
}

/// Credentials and endpoints for the external search providers.
#[derive(Debug, Clone, Default)]
pub struct ApiTokens {
    pub youtube: Option<String>,
    pub soundcloud: Option<String>,
    pub youtube_url: Option<String>,
    pub soundcloud_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub commands: Vec<CommandCategory>,
    pub tokens: ApiTokens,
    pub database_path: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let discord_token =
            env::var("DISCORD_TOKEN").map_err(|_| ConfigError::Missing("DISCORD_TOKEN"))?;

        let categories = env::var("COMMAND_CATEGORIES")
            .unwrap_or_else(|_| DEFAULT_COMMAND_CATEGORIES.to_string());

        Ok(Self {
            discord_token,
            commands: parse_categories(&categories)?,
            tokens: ApiTokens {
                youtube: env::var("YOUTUBE_API_KEY").ok(),
                soundcloud: env::var("SOUNDCLOUD_CLIENT_ID").ok(),
                youtube_url: env::var("YOUTUBE_API_URL").ok(),
                soundcloud_url: env::var("SOUNDCLOUD_API_URL").ok(),
            },
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| APPDATA_DB.to_string()),
        })
    }

    /// Prefix of the named command category.
    pub fn category_prefix(&self, name: &str) -> Result<&str, ConfigError> {
        self.commands
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.prefix.as_str())
            .ok_or_else(|| ConfigError::UnknownCategory(name.to_string()))
    }
}

fn parse_categories(raw: &str) -> Result<Vec<CommandCategory>, ConfigError> {
    Ok(serde_json::from_str(raw)?)
}
