// src/error.rs
// =============================================================================
// Error types for pushing URLs.
//
// Two families:
// - ValidationError: something is wrong with what we were asked to send.
//   Always raised BEFORE any network call.
// - PushError: everything that can go wrong while pushing one chunk
//   (validation or the HTTP transport).
//
// main.rs still uses anyhow for the "could not even start" errors; these typed
// errors are what the batch and push modules hand back per chunk.
// =============================================================================

use thiserror::Error;

/// The most URLs the indexing API accepts in one request.
pub const MAX_URLS_PER_PUSH: usize = 2000;

/// Problems detected before a request is built.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// More URLs in one chunk than the API allows
    #[error("too many URLs in one push: {count} (limit is {limit})")]
    TooManyUrls { count: usize, limit: usize },

    /// A required credential (site, appid, token) is empty
    #[error("missing required value: {0}")]
    MissingCredential(&'static str),

    /// Chunk size of zero
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,

    /// The beacon endpoint takes exactly one URL per call
    #[error("beacon push takes exactly one URL, got {0}")]
    BeaconNeedsOneUrl(usize),

    /// The endpoint we built does not parse as a URL
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Bad run settings (zero concurrency, zero timeout, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Everything that can fail while pushing a chunk.
#[derive(Debug, Error)]
pub enum PushError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connection failure, timeout, or body read failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Checks the per-request URL cap.
pub fn check_amount(count: usize) -> Result<(), ValidationError> {
    if count > MAX_URLS_PER_PUSH {
        return Err(ValidationError::TooManyUrls {
            count,
            limit: MAX_URLS_PER_PUSH,
        });
    }
    Ok(())
}

/// Checks a requested chunk size against the per-request cap.
pub fn check_batch_size(size: usize) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::InvalidChunkSize);
    }
    if size > MAX_URLS_PER_PUSH {
        return Err(ValidationError::InvalidConfig(format!(
            "--batch-size {} is over the limit of {} URLs per request",
            size, MAX_URLS_PER_PUSH
        )));
    }
    Ok(())
}

/// Checks that a credential is non-empty after trimming.
pub fn require(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingCredential(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_at_limit_is_ok() {
        assert!(check_amount(MAX_URLS_PER_PUSH).is_ok());
        assert!(check_amount(0).is_ok());
    }

    #[test]
    fn test_amount_over_limit_is_rejected() {
        let err = check_amount(MAX_URLS_PER_PUSH + 1).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooManyUrls { count: 2001, limit: 2000 }
        ));
        assert_eq!(err.to_string(), "too many URLs in one push: 2001 (limit is 2000)");
    }

    #[test]
    fn test_batch_size_bounds() {
        assert!(check_batch_size(1).is_ok());
        assert!(check_batch_size(MAX_URLS_PER_PUSH).is_ok());
        assert!(matches!(
            check_batch_size(0),
            Err(ValidationError::InvalidChunkSize)
        ));
        assert!(matches!(
            check_batch_size(3000),
            Err(ValidationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("token", "abc").is_ok());
        assert!(matches!(
            require("token", ""),
            Err(ValidationError::MissingCredential("token"))
        ));
        assert!(require("site", "   ").is_err());
    }
}
