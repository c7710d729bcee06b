//! Records flowing through the catalog build
//!
//! Plain value types: the parser produces [`StreamEntry`] values, the
//! reference table yields [`ReferenceEntry`] rows and the merger turns both
//! into the published [`Channel`] list.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const USER_AGENT_HEADER: &str = "User-Agent";
pub const REFERER_HEADER: &str = "Referer";

/// One playable stream extracted from a playlist block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    /// Normalized identifier, never empty
    pub id: String,
    /// Identifier exactly as it appeared in the playlist (or the display name
    /// when the block carried no identifier attribute)
    pub raw_id: String,
    pub name: String,
    pub stream_url: String,
    pub logo: Option<String>,
    /// Request headers for playback; always holds `User-Agent`
    pub headers: BTreeMap<String, String>,
}

/// A row of the external channel metadata table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferenceEntry {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(deserialize_with = "deserialize_closed")]
    pub closed: bool,
    #[serde(deserialize_with = "deserialize_optional_text")]
    pub logo: Option<String>,
}

/// Accepts `true`/`false` in any case; an empty cell counts as open
fn deserialize_closed<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid closed value '{other}', expected true or false"
        ))),
    }
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// A published catalog record
///
/// Field order here is the field order of the published JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub country: String,
    pub logo: Option<String>,
    #[serde(rename = "stream")]
    pub stream_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Why a candidate stream line was dropped during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDiagnostic {
    /// A URL line with no preceding metadata block
    StreamWithoutMetadata { line: usize, url: String },
    /// The identifier normalized to an empty string
    StreamWithoutId { line: usize, descriptor: String },
}

impl ParseDiagnostic {
    pub fn line(&self) -> usize {
        match self {
            Self::StreamWithoutMetadata { line, .. } | Self::StreamWithoutId { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamWithoutMetadata { line, url } => {
                write!(f, "line {line}: stream without metadata: {url}")
            }
            Self::StreamWithoutId { line, descriptor } => {
                write!(f, "line {line}: stream without tvg-id: {descriptor}")
            }
        }
    }
}

/// Result of parsing one playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub entries: Vec<StreamEntry>,
    pub diagnostics: Vec<ParseDiagnostic>,
}
