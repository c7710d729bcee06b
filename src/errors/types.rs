//! Error type definitions for the catalog builder

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Filesystem errors (caches, logos, published catalog)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Source handling specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Non-success HTTP status from an upstream source
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// A reference table row that is missing a column or has a bad value
    #[error("Malformed row {line}: {message}")]
    MalformedRow { line: u64, message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for failures caused by an upstream server rather than by us
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Source(SourceError::Http { .. }))
    }
}

impl SourceError {
    /// Create an HTTP status error
    pub fn http<U: Into<String>>(status: u16, url: U) -> Self {
        Self::Http {
            status,
            url: url.into(),
        }
    }

    /// Create a malformed row error
    pub fn malformed_row<M: Into<String>>(line: u64, message: M) -> Self {
        Self::MalformedRow {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_classification() {
        assert!(AppError::from(SourceError::http(503, "http://x")).is_upstream());
        assert!(!AppError::not_found("channel", "RTP1").is_upstream());
        assert!(!AppError::from(SourceError::malformed_row(3, "missing id")).is_upstream());
    }

    #[test]
    fn messages_carry_context() {
        let err = AppError::not_found("channel", "SIC");
        assert_eq!(err.to_string(), "Not found: channel with id SIC");

        let err = AppError::from(SourceError::malformed_row(7, "missing field `country`"));
        assert_eq!(
            err.to_string(),
            "Source error: Malformed row 7: missing field `country`"
        );
    }
}
