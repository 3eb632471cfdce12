//! Insight request types

use thiserror::Error;

/// Insight-request failures. Always surfaced to the caller; the store never
/// caches a failed request.
#[derive(Debug, Error)]
pub enum InsightError {
    /// The provider endpoint could not be reached or refused the request
    #[error("Insight API error: {0}")]
    Api(String),

    /// The provider answered with something unusable
    #[error("Unusable insight response: {0}")]
    BadResponse(String),

    /// The provider is not configured or not running
    #[error("Insight provider unavailable")]
    Unavailable,
}

/// Result type alias for insight operations
pub type Result<T> = std::result::Result<T, InsightError>;
