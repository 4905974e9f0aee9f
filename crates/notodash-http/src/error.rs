//! HTTP client error types

use thiserror::Error;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP client errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network request failed
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error status
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Retry limit exceeded
    #[error("Retry limit exceeded after {attempts} attempts: {last}")]
    RetryLimitExceeded { attempts: u32, last: String },

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}

impl HttpError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::RequestFailed(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            HttpError::Timeout(_) => true,
            HttpError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Whether the server answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HttpError::HttpStatus { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_retryable_statuses() {
        let server_error = HttpError::HttpStatus {
            status: reqwest::StatusCode::BAD_GATEWAY,
            message: String::new(),
        };
        let rate_limited = HttpError::HttpStatus {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            message: String::new(),
        };
        let not_found = HttpError::HttpStatus {
            status: reqwest::StatusCode::NOT_FOUND,
            message: String::new(),
        };

        assert!(server_error.is_retryable());
        assert!(rate_limited.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(not_found.is_not_found());
        assert!(HttpError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!HttpError::InvalidUrl("x".into()).is_retryable());
    }
}
