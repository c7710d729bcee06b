//! Shared helpers: identifier folding, URL handling and the HTTP client seam

pub mod http_client;
pub mod normalize;
pub mod url;

pub use http_client::{FetchedContent, HttpFetcher, StandardHttpClient};
pub use normalize::normalize_id;
pub use url::UrlUtils;
