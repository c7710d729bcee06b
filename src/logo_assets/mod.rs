//! Channel logo caching
//!
//! Logos referenced by the catalog are downloaded once and re-encoded as
//! WebP under the configured directory, named after the channel id. The web
//! layer serves that directory at `/logos`.

pub mod service;
pub mod storage;

pub use service::{LogoAssetService, LogoCacheSummary};
pub use storage::LogoAssetStorage;
