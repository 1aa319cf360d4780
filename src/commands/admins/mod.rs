//! Commands restricted to guild administrators.

pub mod music_channel;
