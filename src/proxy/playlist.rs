//! HLS playlist rewriting for the playback proxy
//!
//! Streams that need request headers a browser cannot send are played
//! through the proxy: their playlists are fetched server-side and every
//! media line is rewritten to point back at the proxy's `chunk` endpoint.

use url::Url;

use crate::models::Channel;

/// Headers browsers refuse to set on media requests
pub const FORBIDDEN_HEADERS: &[&str] = &["user-agent"];

/// Relative path of the chunk endpoint, resolved against the playlist URL
pub const CHUNK_ENDPOINT: &str = "chunk";

/// True when the channel carries a header only the proxy can send
pub fn requires_proxy(channel: &Channel) -> bool {
    channel.headers.as_ref().is_some_and(|headers| {
        headers
            .keys()
            .any(|name| FORBIDDEN_HEADERS.iter().any(|f| name.eq_ignore_ascii_case(f)))
    })
}

/// Directory part of a playlist URL, without the trailing slash
///
/// `https://cdn/live/channel(news)/index.m3u8` becomes
/// `https://cdn/live/channel(news)`. A single trailing slash on the input is
/// ignored first.
pub fn stream_base_url(playlist_url: &str) -> &str {
    let trimmed = playlist_url.strip_suffix('/').unwrap_or(playlist_url);
    match trimmed.rfind('/') {
        Some(index) => &trimmed[..index],
        None => "",
    }
}

/// Absolute URL for a playlist line, relative to the playlist's base
pub fn resolve_media_url(base: &str, line: &str) -> String {
    Url::parse(&format!("{base}/"))
        .and_then(|base_url| base_url.join(line))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{base}/{line}"))
}

/// Apply `map_url` to every media line, leaving blank and tag lines untouched
pub fn rewrite_playlist<F>(content: &str, map_url: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut rewritten = String::with_capacity(content.len());
    for line in content.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            rewritten.push_str(line);
        } else {
            rewritten.push_str(&map_url(line.trim()));
        }
        rewritten.push('\n');
    }
    rewritten
}

/// Point every media line of a fetched playlist at the chunk endpoint
pub fn proxy_playlist(content: &str, fetched_url: &str) -> String {
    let base = stream_base_url(fetched_url);
    rewrite_playlist(content, |line| {
        let media_url = resolve_media_url(base, line);
        format!("{CHUNK_ENDPOINT}?url={}", urlencoding::encode(&media_url))
    })
}
