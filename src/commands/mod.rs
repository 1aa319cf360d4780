//! This module aggregates all the command modules for the bot.

/// Commands restricted to administrators (e.g., locking the music channel).
pub mod admins;
/// The queue command router, its search providers, and music slash commands.
pub mod music;
