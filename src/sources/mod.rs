//! Inputs of a catalog build: the playlist text and the reference table
//!
//! Both are downloaded once and kept as local files; later builds read the
//! local copy instead of hitting the network.

pub mod cache;
pub mod reference;

pub use cache::CachedSource;
pub use reference::parse_reference_table;
