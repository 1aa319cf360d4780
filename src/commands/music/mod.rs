pub mod audio_sources;
pub mod error;
pub mod queue;
pub mod soundcloud_link;
pub mod utils;
