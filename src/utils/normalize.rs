//! Canonical channel identifiers
//!
//! Playlists spell the same channel in many ways (`"Canal É & Cia"`,
//! `"CanalECia"`). The folded form produced here is the catalog key and the
//! playlist-side matching key.

use unicode_normalization::UnicodeNormalization;

/// Fold an identifier to its canonical ASCII form
///
/// Applies NFKD, drops every code point without an ASCII representation
/// (combining marks vanish, so accented letters collapse to their base
/// letter; non-Latin scripts disappear entirely), then strips spaces and
/// ampersands. Only U+0020 counts as a space.
///
/// ```rust
/// use m3u_catalog::utils::normalize_id;
///
/// assert_eq!(normalize_id("Canal É & Cia"), "CanalECia");
/// ```
pub fn normalize_id(raw: &str) -> String {
    raw.nfkd()
        .filter(|c| c.is_ascii() && *c != ' ' && *c != '&')
        .collect()
}
