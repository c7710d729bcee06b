//! URL utilities for consistent URL handling

use url::Url;

/// Query parameters whose values never reach the logs
const SENSITIVE_PARAMS: &[&str] = &["username", "password", "user", "pass", "pwd", "passwd", "token"];

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// True when the string parses as an absolute `http`/`https` URL
    pub fn is_http_url(url: &str) -> bool {
        Url::parse(url)
            .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    /// Mask credentials in a URL before it is logged
    ///
    /// Handles both `user:pass@host` authority credentials and the common
    /// credential query parameters. Unparseable input is returned unchanged.
    pub fn obfuscate_credentials(url: &str) -> String {
        let Ok(mut parsed) = Url::parse(url) else {
            return url.to_string();
        };

        if !parsed.username().is_empty() || parsed.password().is_some() {
            let _ = parsed.set_username("****");
            let _ = parsed.set_password(Some("****"));
        }

        let has_sensitive = parsed
            .query_pairs()
            .any(|(key, _)| SENSITIVE_PARAMS.contains(&key.to_ascii_lowercase().as_str()));
        if has_sensitive {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(key, value)| {
                    let masked = SENSITIVE_PARAMS.contains(&key.to_ascii_lowercase().as_str());
                    let value = if masked { "****".to_string() } else { value.into_owned() };
                    (key.into_owned(), value)
                })
                .collect();
            parsed.query_pairs_mut().clear().extend_pairs(pairs);
        }

        parsed.to_string()
    }
}
