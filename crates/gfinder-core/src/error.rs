//! Normalized error type for every client operation.
//!
//! Whatever goes wrong (a 404, a dropped connection, a body that does not
//! decode) reaches the caller as an [`ApiError`] whose `Display` output is a
//! single human-readable message. The [`FailureKind`] is kept for
//! diagnostics only.

use thiserror::Error;

/// Fixed user-facing messages.
pub mod messages {
    pub const BAD_REQUEST: &str = "Invalid request parameters";
    pub const UNAUTHORIZED: &str = "Unauthorized, please log in again";
    pub const FORBIDDEN: &str = "Access denied";
    pub const NOT_FOUND: &str = "Requested resource not found";
    pub const SERVER_ERROR: &str = "Internal server error";
    pub const REQUEST_FAILED: &str = "Request failed";
    pub const NO_RESPONSE: &str = "Server not responding";
    pub const NETWORK_ERROR: &str = "Network error";
    pub const INVALID_RESPONSE: &str = "Invalid response from server";
    pub const DOWNLOAD_FAILED: &str = "Download failed";
}

/// Classification of a failure before it is collapsed into a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 400
    BadRequest,
    /// HTTP 401
    Unauthorized,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// HTTP 500
    ServerError,
    /// Any other error status
    UnknownStatus(u16),
    /// A success-range status other than 200
    UnexpectedSuccess(u16),
    /// Request sent but nothing came back (network failure, timeout)
    NoResponse,
    /// Request could not be built or dispatched
    RequestConstructionFailure,
    /// Download endpoint failed and its body carried no usable message
    DownloadParseFailure,
    /// A 200 body that does not match the expected shape
    MalformedBody,
    /// Rejected locally before any request was sent
    InvalidInput,
    /// The local save target refused the payload
    SaveFailed,
    /// The server supplied its own message; status kept for logs
    Reported(u16),
}

/// The one error shape callers ever observe.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: FailureKind,
    message: String,
}

impl ApiError {
    /// Build an error from a kind and message.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A required argument was empty.
    pub(crate) fn empty_field(field: &str) -> Self {
        Self::new(FailureKind::InvalidInput, format!("{field} must not be empty"))
    }

    /// The human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Failure classification, for logging.
    #[inline]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message_only() {
        let err = ApiError::new(FailureKind::NotFound, messages::NOT_FOUND);
        assert_eq!(err.to_string(), "Requested resource not found");
        assert_eq!(err.message(), err.to_string());
    }

    #[test]
    fn test_empty_field() {
        let err = ApiError::empty_field("name");
        assert_eq!(err.kind(), FailureKind::InvalidInput);
        assert_eq!(err.message(), "name must not be empty");
    }
}
