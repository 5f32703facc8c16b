//! Guest data error types
//!
//! Every failure of a guest poll is non-fatal: the dashboard keeps the last
//! good snapshot, shows a status message and retries on the next tick.

use thiserror::Error;

/// Errors that can occur while polling the guest data endpoint
#[derive(Error, Debug)]
pub enum FetchError {
    /// Endpoint URL is empty or still the placeholder
    #[error("Guest data endpoint is not configured")]
    NotConfigured,

    /// Connection, timeout or body transfer failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// Body is not JSON or does not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Chart-shaped body whose total or categories are unusable
    #[error("Malformed category data: {0}")]
    MalformedCategories(String),
}

/// Coarse classification shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigurationMissing,
    NetworkFailure,
    MalformedResponse,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::NotConfigured => ErrorKind::ConfigurationMissing,
            FetchError::Transport(_) | FetchError::HttpStatus { .. } => ErrorKind::NetworkFailure,
            FetchError::Malformed(_) | FetchError::MalformedCategories(_) => {
                ErrorKind::MalformedResponse
            }
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FetchError::Malformed(reason.into())
    }

    pub(crate) fn malformed_categories(reason: impl Into<String>) -> Self {
        FetchError::MalformedCategories(reason.into())
    }
}

/// Result type alias for guest polling
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::HttpStatus { status: 404 };
        assert_eq!(err.to_string(), "Endpoint returned HTTP 404");

        let err = FetchError::malformed("missing 'categories'");
        assert_eq!(err.to_string(), "Malformed response: missing 'categories'");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(FetchError::NotConfigured.kind(), ErrorKind::ConfigurationMissing);
        assert_eq!(
            FetchError::HttpStatus { status: 500 }.kind(),
            ErrorKind::NetworkFailure
        );
        assert_eq!(
            FetchError::malformed("bad").kind(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(
            FetchError::malformed_categories("bad").kind(),
            ErrorKind::MalformedResponse
        );
    }
}
