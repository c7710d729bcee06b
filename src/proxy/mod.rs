//! Playback proxy helpers shared by the web handlers

pub mod playlist;

pub use playlist::{proxy_playlist, requires_proxy, stream_base_url};
