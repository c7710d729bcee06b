//! Catalog construction
//!
//! [`build_catalog`] is the pure reconciliation engine: parse the playlist,
//! merge it with the optional reference table and rank the result. It has no
//! I/O and never fails. [`CatalogPipeline`] wraps it with the collaborators
//! of a real build: cached downloads, logo caching and publishing.

pub mod merger;
pub mod publish;
pub mod ranker;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

pub use merger::{CatalogMerger, MergeOutcome, MergeReport};
pub use ranker::ChannelRanker;

use crate::config::Config;
use crate::errors::AppResult;
use crate::ingestor::PlaylistParser;
use crate::logo_assets::{LogoAssetService, LogoAssetStorage, LogoCacheSummary};
use crate::models::{Channel, ParseDiagnostic, ReferenceEntry};
use crate::sources::{parse_reference_table, CachedSource};
use crate::utils::HttpFetcher;

/// Settings of the pure build
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub country: String,
    pub user_agent: String,
    pub priority_prefixes: Vec<String>,
}

impl From<&Config> for CatalogSettings {
    fn from(config: &Config) -> Self {
        Self {
            country: config.catalog.country.clone(),
            user_agent: config.catalog.user_agent.clone(),
            priority_prefixes: config.catalog.priority_prefixes.clone(),
        }
    }
}

/// Output of [`build_catalog`]
#[derive(Debug, Clone, Default)]
pub struct CatalogBuild {
    pub channels: Vec<Channel>,
    pub parsed_entries: usize,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub merge: MergeReport,
}

/// Parse, merge and rank in one pass
pub fn build_catalog(
    playlist: &str,
    reference: Option<&[ReferenceEntry]>,
    settings: &CatalogSettings,
) -> CatalogBuild {
    let parsed = PlaylistParser::new(settings.user_agent.clone()).parse(playlist);
    let parsed_entries = parsed.entries.len();

    let merged = CatalogMerger::new(settings.country.clone()).merge(parsed.entries, reference);
    let channels = ChannelRanker::new(&settings.priority_prefixes).rank(merged.channels);

    CatalogBuild {
        channels,
        parsed_entries,
        diagnostics: parsed.diagnostics,
        merge: merged.report,
    }
}

/// Summary of a complete pipeline run
#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub parsed_entries: usize,
    pub diagnostics: usize,
    pub merge: MergeReport,
    pub channels: usize,
    pub logos: Option<LogoCacheSummary>,
    pub output: PathBuf,
}

/// A full catalog build driven by the configuration
pub struct CatalogPipeline {
    config: Config,
    fetcher: Arc<dyn HttpFetcher>,
}

impl CatalogPipeline {
    pub fn new(config: Config, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self { config, fetcher }
    }

    pub async fn run(&self) -> AppResult<CatalogReport> {
        let sources = &self.config.sources;
        let cached = CachedSource::new(self.fetcher.clone());

        let playlist = cached.load(&sources.streams_url, &sources.streams_cache).await?;

        let reference = match &sources.reference_url {
            Some(url) => {
                let table = cached.load(url, &sources.reference_cache).await?;
                let rows = parse_reference_table(&table)?;
                info!("Loaded {} reference rows", rows.len());
                Some(rows)
            }
            None => None,
        };

        let build = build_catalog(
            &playlist,
            reference.as_deref(),
            &CatalogSettings::from(&self.config),
        );

        for diagnostic in &build.diagnostics {
            warn!("Dropped playlist entry at {}", diagnostic);
        }
        if build.merge.unmatched > 0 {
            info!(
                "{} stream entries had no reference row and were dropped",
                build.merge.unmatched
            );
        }
        info!(
            "Built catalog: {} entries parsed, {} channels ({} duplicates skipped)",
            build.parsed_entries,
            build.channels.len(),
            build.merge.duplicates
        );

        let logos = if self.config.logos.enabled {
            let service = LogoAssetService::new(
                self.fetcher.clone(),
                LogoAssetStorage::new(self.config.logos.directory.clone()),
                self.config.logos.user_agent.clone(),
            );
            Some(service.cache_logos(&build.channels).await?)
        } else {
            None
        };

        let output = self.config.output.channels_path.clone();
        publish::write_catalog(&output, &build.channels).await?;
        info!("Wrote {} channels to {}", build.channels.len(), output.display());

        Ok(CatalogReport {
            parsed_entries: build.parsed_entries,
            diagnostics: build.diagnostics.len(),
            merge: build.merge,
            channels: build.channels.len(),
            logos,
            output,
        })
    }
}
