use std::sync::Arc;

use tracing::{debug, info, warn};

use super::storage::LogoAssetStorage;
use crate::errors::{AppError, AppResult};
use crate::models::{Channel, USER_AGENT_HEADER};
use crate::utils::{HttpFetcher, UrlUtils};

/// Outcome counters for one logo caching pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogoCacheSummary {
    pub saved: usize,
    /// Logos already present on disk
    pub existing: usize,
    /// Channels whose id cannot be used as a file name
    pub skipped: usize,
    pub failed: usize,
}

/// Downloads channel logos and stores them as WebP
///
/// Failures are per logo: they are logged and counted, never returned.
pub struct LogoAssetService {
    fetcher: Arc<dyn HttpFetcher>,
    storage: LogoAssetStorage,
    user_agent: String,
}

impl LogoAssetService {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, storage: LogoAssetStorage, user_agent: impl Into<String>) -> Self {
        Self {
            fetcher,
            storage,
            user_agent: user_agent.into(),
        }
    }

    pub async fn cache_logos(&self, channels: &[Channel]) -> AppResult<LogoCacheSummary> {
        self.storage.ensure_storage_dir().await?;

        let mut summary = LogoCacheSummary::default();

        for channel in channels {
            let Some(logo_url) = channel.logo.as_deref() else {
                continue;
            };

            let Some(path) = self.storage.logo_path(&channel.id) else {
                warn!("Skipping logo for '{}': id is not a valid file name", channel.id);
                summary.skipped += 1;
                continue;
            };

            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                debug!("Logo for '{}' already cached at {}", channel.id, path.display());
                summary.existing += 1;
                continue;
            }

            match self.cache_logo(logo_url, &path).await {
                Ok(size) => {
                    debug!("Saved logo for '{}' ({} bytes)", channel.id, size);
                    summary.saved += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to download logo for {} at {}: {}",
                        channel.name,
                        UrlUtils::obfuscate_credentials(logo_url),
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Logo caching finished in {}: {} saved, {} already cached, {} skipped, {} failed",
            self.storage.directory().display(),
            summary.saved,
            summary.existing,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    async fn cache_logo(&self, logo_url: &str, path: &std::path::Path) -> AppResult<u64> {
        let headers = [(USER_AGENT_HEADER.to_string(), self.user_agent.clone())];
        let fetched = self.fetcher.fetch(logo_url, &headers).await?.ensure_success()?;

        self.storage
            .save_as_webp(&fetched.bytes, path)
            .await
            .map_err(|e| AppError::internal(format!("Failed to convert logo to WebP: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::FetchedContent;
    use async_trait::async_trait;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Serves canned responses keyed by URL and records the request headers
    struct CannedFetcher {
        responses: HashMap<String, (u16, Vec<u8>)>,
        seen_headers: Mutex<Vec<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl HttpFetcher for CannedFetcher {
        async fn fetch(&self, url: &str, headers: &[(String, String)]) -> AppResult<FetchedContent> {
            self.seen_headers.lock().unwrap().push(headers.to_vec());
            let (status, bytes) = self.responses.get(url).cloned().unwrap_or((404, Vec::new()));
            Ok(FetchedContent {
                final_url: url.to_string(),
                status,
                content_type: None,
                bytes,
            })
        }
    }

    fn png() -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    fn channel(id: &str, logo: Option<&str>) -> Channel {
        Channel {
            id: id.to_string(),
            name: format!("{id} TV"),
            country: "PT".to_string(),
            logo: logo.map(str::to_string),
            stream_url: format!("http://stream/{id}.m3u8"),
            headers: None,
        }
    }

    #[tokio::test]
    async fn caches_logos_and_tolerates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(CannedFetcher {
            responses: HashMap::from([
                ("http://logos/good.png".to_string(), (200, png())),
                ("http://logos/garbage.png".to_string(), (200, b"not an image".to_vec())),
            ]),
            seen_headers: Mutex::new(Vec::new()),
        });
        let service = LogoAssetService::new(
            fetcher.clone(),
            LogoAssetStorage::new(dir.path().join("logos")),
            "LogoAgent/1.0",
        );

        let channels = vec![
            channel("GOOD", Some("http://logos/good.png")),
            channel("NOLOGO", None),
            channel("MISSING", Some("http://logos/missing.png")),
            channel("GARBAGE", Some("http://logos/garbage.png")),
            channel("../evil", Some("http://logos/good.png")),
        ];

        let summary = service.cache_logos(&channels).await.unwrap();
        assert_eq!(
            summary,
            LogoCacheSummary {
                saved: 1,
                existing: 0,
                skipped: 1,
                failed: 2,
            }
        );

        let saved = dir.path().join("logos").join("GOOD.webp");
        assert_eq!(image::guess_format(&std::fs::read(&saved).unwrap()).unwrap(), ImageFormat::WebP);
        assert!(!dir.path().join("logos").join("GARBAGE.webp").exists());

        let seen = fetcher.seen_headers.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|h| h == &vec![(USER_AGENT_HEADER.to_string(), "LogoAgent/1.0".to_string())]));
    }

    #[tokio::test]
    async fn existing_logos_are_not_downloaded_again() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LogoAssetStorage::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join("RTP1.webp"), b"cached").unwrap();

        let fetcher = Arc::new(CannedFetcher {
            responses: HashMap::new(),
            seen_headers: Mutex::new(Vec::new()),
        });
        let service = LogoAssetService::new(fetcher.clone(), storage, "UA");

        let summary = service
            .cache_logos(&[channel("RTP1", Some("http://logos/rtp1.png"))])
            .await
            .unwrap();

        assert_eq!(summary.existing, 1);
        assert!(fetcher.seen_headers.lock().unwrap().is_empty());
        assert_eq!(std::fs::read(dir.path().join("RTP1.webp")).unwrap(), b"cached");
    }
}
