//! API client errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response, or the body could not be decoded.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API responded {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, usually the JSON error envelope.
        body: String,
    },

    /// The call needs a session and the client has none.
    #[error("authentication required")]
    Unauthenticated,
}

impl ApiError {
    /// Whether retrying the same request can never succeed.
    ///
    /// Client errors are permanent except 401 (session may be refreshed), 408 and 429.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Status { status, .. } => {
                status.is_client_error()
                    && !matches!(
                        *status,
                        StatusCode::UNAUTHORIZED
                            | StatusCode::REQUEST_TIMEOUT
                            | StatusCode::TOO_MANY_REQUESTS
                    )
            }
            Self::Transport(_) | Self::Unauthenticated => false,
        }
    }

    /// Whether the request is worth retrying as-is.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unauthenticated => false,
            Self::Transport(_) | Self::Status { .. } => !self.is_permanent(),
        }
    }

    /// The response status, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Unauthenticated => None,
        }
    }
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: StatusCode) -> ApiError {
        ApiError::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn client_errors_are_permanent() {
        for code in [
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::CONFLICT,
            StatusCode::FORBIDDEN,
        ] {
            assert!(status(code).is_permanent(), "{code} should be permanent");
            assert!(!status(code).is_transient(), "{code} should not be retried");
        }
    }

    #[test]
    fn retryable_client_errors_are_transient() {
        for code in [
            StatusCode::UNAUTHORIZED,
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::TOO_MANY_REQUESTS,
        ] {
            assert!(!status(code).is_permanent(), "{code} should not be permanent");
            assert!(status(code).is_transient(), "{code} should be retried");
        }
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(status(StatusCode::INTERNAL_SERVER_ERROR).is_transient());
        assert!(status(StatusCode::SERVICE_UNAVAILABLE).is_transient());
    }

    #[test]
    fn missing_session_is_neither() {
        assert!(!ApiError::Unauthenticated.is_permanent());
        assert!(!ApiError::Unauthenticated.is_transient());
    }
}
