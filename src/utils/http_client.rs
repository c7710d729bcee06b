use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::{AppError, AppResult, SourceError};
use crate::utils::url::UrlUtils;

/// Body and metadata of a completed upstream request
#[derive(Debug, Clone)]
pub struct FetchedContent {
    /// URL after redirects; relative playlist entries resolve against it
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FetchedContent {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Turn a non-success status into a source error
    pub fn ensure_success(self) -> AppResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SourceError::http(self.status, UrlUtils::obfuscate_credentials(&self.final_url)).into())
        }
    }
}

/// Upstream HTTP access used by the source, logo and proxy layers
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET a URL with extra request headers; non-success statuses are returned, not raised
    async fn fetch(&self, url: &str, headers: &[(String, String)]) -> AppResult<FetchedContent>;

    /// GET a URL and fail on any non-success status
    async fn fetch_text(&self, url: &str) -> AppResult<String> {
        Ok(self.fetch(url, &[]).await?.ensure_success()?.text())
    }
}

/// Default implementation of HttpFetcher using reqwest
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    /// Create new HTTP client with only connection timeout (no total request timeout)
    pub fn with_connection_timeout(connect_timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for StandardHttpClient {
    async fn fetch(&self, url: &str, headers: &[(String, String)]) -> AppResult<FetchedContent> {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        debug!("Fetching {}", safe_url);

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::from(e.without_url()))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        debug!("Fetched {} bytes from {} (status {})", bytes.len(), safe_url, status);

        Ok(FetchedContent {
            final_url,
            status,
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(status: u16) -> FetchedContent {
        FetchedContent {
            final_url: "http://user:pw@example.com/list.m3u".to_string(),
            status,
            content_type: None,
            bytes: b"#EXTM3U\n".to_vec(),
        }
    }

    #[test]
    fn success_passes_through() {
        let fetched = content(200).ensure_success().unwrap();
        assert_eq!(fetched.text(), "#EXTM3U\n");
    }

    #[test]
    fn failure_status_becomes_source_error_without_credentials() {
        let err = content(404).ensure_success().unwrap_err();
        assert!(err.is_upstream());
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(!message.contains("pw@"));
    }
}
