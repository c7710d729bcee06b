//! Playlist ingestion: turns raw playlist text into stream entries

pub mod m3u_parser;

pub use m3u_parser::PlaylistParser;
