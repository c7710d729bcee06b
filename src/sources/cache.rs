use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::AppResult;
use crate::utils::{HttpFetcher, UrlUtils};

/// Downloads a text source once and reuses the local copy afterwards
///
/// Any transport error or non-success status fails the whole build; nothing
/// is written to the cache in that case.
pub struct CachedSource {
    fetcher: Arc<dyn HttpFetcher>,
}

impl CachedSource {
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn load(&self, url: &str, cache_path: &Path) -> AppResult<String> {
        if tokio::fs::try_exists(cache_path).await? {
            debug!("Using cached copy {} for {}", cache_path.display(), UrlUtils::obfuscate_credentials(url));
            return Ok(tokio::fs::read_to_string(cache_path).await?);
        }

        info!("Downloading {}", UrlUtils::obfuscate_credentials(url));
        let content = self.fetcher.fetch_text(url).await?;

        if let Some(parent) = cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(cache_path, &content).await?;
        info!("Cached {} bytes at {}", content.len(), cache_path.display());

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::utils::FetchedContent;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedFetcher {
        status: u16,
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpFetcher for FixedFetcher {
        async fn fetch(&self, url: &str, _headers: &[(String, String)]) -> AppResult<FetchedContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedContent {
                final_url: url.to_string(),
                status: self.status,
                content_type: None,
                bytes: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn fetcher(status: u16, body: &'static str) -> Arc<FixedFetcher> {
        Arc::new(FixedFetcher {
            status,
            body,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn downloads_then_reuses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("nested").join("pt.m3u");
        let fetcher = fetcher(200, "#EXTM3U\n");
        let source = CachedSource::new(fetcher.clone());

        assert_eq!(source.load("http://example.com/pt.m3u", &cache).await.unwrap(), "#EXTM3U\n");
        assert_eq!(source.load("http://example.com/pt.m3u", &cache).await.unwrap(), "#EXTM3U\n");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert!(cache.exists());
    }

    #[tokio::test]
    async fn failed_download_is_fatal_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("pt.m3u");
        let source = CachedSource::new(fetcher(500, "oops"));

        let err = source.load("http://example.com/pt.m3u", &cache).await.unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
        assert!(!cache.exists());
    }
}
