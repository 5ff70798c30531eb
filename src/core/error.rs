//! Custom error types for the application.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each domain:
//!
//! - [`FetchError`] - Network/fetch-related errors for HTTP requests
//! - [`StorageError`] - Key-value persistence errors for the reading session
//! - [`DocError`] - Failures surfaced by the remote document service

use thiserror::Error;

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// Failed to create HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, connection reset, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// Invalid response content (not text)
    #[error("Invalid response content")]
    InvalidContent,
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

/// Errors writing to the durable key-value surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// localStorage not available.
    #[error("localStorage not available")]
    StorageUnavailable,
    /// Failed to serialize data to JSON.
    #[error("failed to serialize value for {0}")]
    SerializationFailed(String),
    /// Failed to write to storage.
    #[error("failed to write {0} to storage")]
    WriteFailed(String),
}

/// Errors returned by a [`DocService`](crate::core::DocService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    /// The backend has no document at this path.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// Transport-level failure talking to the backend.
    #[error(transparent)]
    Transport(#[from] FetchError),
}

impl DocError {
    /// Map a fetch failure for `path`, turning a 404 into [`DocError::NotFound`].
    pub fn from_fetch(path: &str, err: FetchError) -> Self {
        match err {
            FetchError::HttpError(404) => Self::NotFound(path.to_string()),
            other => Self::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::HttpError(502).to_string(), "HTTP error: 502");
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn test_doc_error_from_fetch() {
        assert_eq!(
            DocError::from_fetch("a/b.md", FetchError::HttpError(404)),
            DocError::NotFound("a/b.md".to_string())
        );
        let err = DocError::from_fetch("a", FetchError::Timeout);
        assert_eq!(err, DocError::Transport(FetchError::Timeout));
        assert_eq!(err.to_string(), "Request timed out");
    }
}
