//! Block-oriented M3U playlist parser
//!
//! Playlists are read as blocks separated by blank lines. Comment lines
//! (`#...`) accumulate into a metadata buffer and the first of them, the
//! descriptor line, carries the channel attributes and display name:
//!
//! ```text
//! #EXTINF:-1 tvg-id="RTP1" tvg-logo="http://x/rtp1.png",RTP 1
//! #EXTVLCOPT:http-referrer=https://www.rtp.pt/
//! http://stream/rtp1.m3u8
//! ```
//!
//! Every other non-blank line is a candidate stream URL. Parsing never
//! fails; dropped candidates are reported as [`ParseDiagnostic`]s.
//!
//! The buffer is only cleared by a blank line. A candidate that is rejected
//! (or accepted) leaves it in place for the next URL line of the same block,
//! and a block whose descriptor lacks `tvg-id` silently swallows its URL
//! lines.

use std::collections::BTreeMap;

use crate::config::defaults::DEFAULT_USER_AGENT;
use crate::models::{ParseDiagnostic, ParseOutcome, StreamEntry, REFERER_HEADER, USER_AGENT_HEADER};
use crate::utils::normalize_id;

pub const COMMENT_MARKER: char = '#';
pub const IDENTIFIER_ATTRIBUTE: &str = "tvg-id";
pub const LOGO_ATTRIBUTE: &str = "tvg-logo";
pub const USER_AGENT_DIRECTIVE: &str = "#EXTVLCOPT:http-user-agent=";
pub const REFERRER_DIRECTIVE: &str = "#EXTVLCOPT:http-referrer=";

/// What happened to a single candidate URL line
enum Candidate {
    Accepted(StreamEntry),
    Ignored,
    Dropped(ParseDiagnostic),
}

#[derive(Debug, Clone)]
pub struct PlaylistParser {
    user_agent: String,
}

impl Default for PlaylistParser {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

impl PlaylistParser {
    /// Create a parser that assigns `user_agent` to entries without an override
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    pub fn parse(&self, content: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let mut metadata: Vec<&str> = Vec::new();

        for (index, line) in playlist_lines(content).enumerate() {
            let line = line.trim();

            if line.is_empty() {
                metadata.clear();
                continue;
            }

            if line.starts_with(COMMENT_MARKER) {
                metadata.push(line);
                continue;
            }

            match self.read_candidate(index + 1, line, &metadata) {
                Candidate::Accepted(entry) => outcome.entries.push(entry),
                Candidate::Ignored => {}
                Candidate::Dropped(diagnostic) => outcome.diagnostics.push(diagnostic),
            }
        }

        outcome
    }

    fn read_candidate(&self, line_number: usize, url: &str, metadata: &[&str]) -> Candidate {
        let Some(descriptor) = metadata.first().copied() else {
            return Candidate::Dropped(ParseDiagnostic::StreamWithoutMetadata {
                line: line_number,
                url: url.to_string(),
            });
        };

        if !descriptor.contains(IDENTIFIER_ATTRIBUTE) {
            return Candidate::Ignored;
        }

        let name = descriptor.rsplit(',').next().unwrap_or(descriptor);
        let raw_id = attribute_values(descriptor, IDENTIFIER_ATTRIBUTE)
            .find(|value| !value.is_empty())
            .unwrap_or(name);

        let id = normalize_id(raw_id);
        if id.is_empty() {
            return Candidate::Dropped(ParseDiagnostic::StreamWithoutId {
                line: line_number,
                descriptor: descriptor.to_string(),
            });
        }

        let logo = attribute_values(descriptor, LOGO_ATTRIBUTE)
            .next()
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Candidate::Accepted(StreamEntry {
            id,
            raw_id: raw_id.to_string(),
            name: name.to_string(),
            stream_url: url.to_string(),
            logo,
            headers: self.collect_headers(metadata),
        })
    }

    /// Build playback headers from the directives in a metadata block
    ///
    /// Later directives override earlier ones. Empty override values are
    /// ignored so the user agent is never blank.
    fn collect_headers(&self, metadata: &[&str]) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();

        for line in metadata {
            if let Some(agent) = line.strip_prefix(USER_AGENT_DIRECTIVE) {
                if !agent.is_empty() {
                    headers.insert(USER_AGENT_HEADER.to_string(), agent.to_string());
                }
            } else if let Some(referrer) = line.strip_prefix(REFERRER_DIRECTIVE) {
                if !referrer.is_empty() {
                    headers.insert(REFERER_HEADER.to_string(), referrer.to_string());
                }
            }
        }

        headers
            .entry(USER_AGENT_HEADER.to_string())
            .or_insert_with(|| self.user_agent.clone());

        headers
    }
}

/// Lines of a playlist
///
/// `\r\n` is one break; a lone `\r`, `\n` and the other Unicode line
/// separators each end a line too. A trailing break adds no empty line.
pub fn playlist_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(is_line_break) else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..end];
        let tail = &rest[end..];
        let break_len = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[break_len..];
        Some(line)
    })
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Every `name="value"` occurrence in `line`, in order
///
/// The value runs to the next double quote; there is no escaping, so a value
/// cannot contain `"`. An occurrence without a closing quote ends the scan.
pub fn attribute_values<'a>(line: &'a str, name: &str) -> impl Iterator<Item = &'a str> + 'a {
    let needle = format!("{name}=\"");
    let mut rest = line;

    std::iter::from_fn(move || {
        let start = rest.find(&needle)? + needle.len();
        let tail = &rest[start..];
        let end = tail.find('"')?;
        let value = &tail[..end];
        rest = &tail[end + 1..];
        Some(value)
    })
}
