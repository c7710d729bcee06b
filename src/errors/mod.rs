//! Centralized error handling for the catalog builder
//!
//! The pure core (parser, merger, ranker) never fails: entry-level problems
//! are reported as diagnostics. Everything here belongs to the collaborators
//! around it, which are fail-fast for the whole run.
//!
//! # Error Categories
//!
//! - **Source Errors**: playlist/reference retrieval and reference-row parsing
//! - **Configuration Errors**: invalid or unreadable configuration files
//! - **Web Errors**: lookups that fail while serving the catalog
//!
//! # Usage
//!
//! ```rust
//! use m3u_catalog::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("country must not be empty"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
