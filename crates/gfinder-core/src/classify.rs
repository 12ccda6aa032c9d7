//! Failure classification.
//!
//! An ordered chain of classifiers, each returning `Some` when it recognises
//! the failure. The first match wins:
//!
//! 1. [`structured_message`] - JSON body with an `error` string
//! 2. [`status_table`] - fixed message per status code
//! 3. [`no_response`] - request sent, nothing came back
//! 4. [`construction_failure`] - request never left
//!
//! [`classify`] is the only place that turns raw failures into [`ApiError`].

use serde::Deserialize;

use crate::error::{ApiError, FailureKind, messages};
use crate::transport::TransportError;

/// A failure as observed by the transport layer.
#[derive(Clone, Copy, Debug)]
pub enum RawFailure<'a> {
    /// A response arrived with an error status.
    Response { status: u16, body: &'a [u8] },
    /// No response arrived.
    Transport(&'a TransportError),
}

type Classifier = fn(&RawFailure<'_>) -> Option<ApiError>;

const CHAIN: &[Classifier] = &[
    structured_message,
    status_table,
    no_response,
    construction_failure,
];

/// Run the chain. Always yields an error.
pub fn classify(failure: &RawFailure<'_>) -> ApiError {
    CHAIN
        .iter()
        .find_map(|classifier| classifier(failure))
        .unwrap_or_else(|| {
            ApiError::new(FailureKind::RequestConstructionFailure, messages::NETWORK_ERROR)
        })
}

/// Extract a non-empty `error` string from a JSON body.
pub fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<serde_json::Value>,
    }

    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.error? {
        serde_json::Value::String(msg) if !msg.is_empty() => Some(msg),
        _ => None,
    }
}

/// Server-supplied message, verbatim.
pub fn structured_message(failure: &RawFailure<'_>) -> Option<ApiError> {
    let RawFailure::Response { status, body } = failure else {
        return None;
    };
    error_message(body).map(|msg| ApiError::new(FailureKind::Reported(*status), msg))
}

/// Fixed message per status code.
pub fn status_table(failure: &RawFailure<'_>) -> Option<ApiError> {
    let RawFailure::Response { status, .. } = failure else {
        return None;
    };
    let err = match status {
        400 => ApiError::new(FailureKind::BadRequest, messages::BAD_REQUEST),
        401 => ApiError::new(FailureKind::Unauthorized, messages::UNAUTHORIZED),
        403 => ApiError::new(FailureKind::Forbidden, messages::FORBIDDEN),
        404 => ApiError::new(FailureKind::NotFound, messages::NOT_FOUND),
        500 => ApiError::new(FailureKind::ServerError, messages::SERVER_ERROR),
        other => ApiError::new(
            FailureKind::UnknownStatus(*other),
            format!("{} ({})", messages::REQUEST_FAILED, other),
        ),
    };
    Some(err)
}

/// Sent but unanswered, timeouts included.
pub fn no_response(failure: &RawFailure<'_>) -> Option<ApiError> {
    match failure {
        RawFailure::Transport(TransportError::TimedOut | TransportError::NoResponse(_)) => {
            Some(ApiError::new(FailureKind::NoResponse, messages::NO_RESPONSE))
        }
        _ => None,
    }
}

/// Never sent: surface the underlying message.
pub fn construction_failure(failure: &RawFailure<'_>) -> Option<ApiError> {
    match failure {
        RawFailure::Transport(TransportError::Construction(msg)) if !msg.is_empty() => Some(
            ApiError::new(FailureKind::RequestConstructionFailure, msg.clone()),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiError {
        classify(&RawFailure::Response {
            status,
            body: body.as_bytes(),
        })
    }

    #[test]
    fn test_structured_message_wins_for_any_status() {
        for status in [400, 404, 409, 500, 502] {
            let err = response(status, r#"{"error": "already exists"}"#);
            assert_eq!(err.message(), "already exists");
            assert_eq!(err.kind(), FailureKind::Reported(status));
        }
    }

    #[test]
    fn test_status_table() {
        let cases = [
            (400, "Invalid request parameters", FailureKind::BadRequest),
            (401, "Unauthorized, please log in again", FailureKind::Unauthorized),
            (403, "Access denied", FailureKind::Forbidden),
            (404, "Requested resource not found", FailureKind::NotFound),
            (500, "Internal server error", FailureKind::ServerError),
        ];
        for (status, message, kind) in cases {
            let err = response(status, "");
            assert_eq!(err.message(), message);
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn test_unknown_status() {
        let err = response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.message(), "Request failed (502)");
        assert_eq!(err.kind(), FailureKind::UnknownStatus(502));
    }

    #[test]
    fn test_error_field_must_be_non_empty_string() {
        assert_eq!(response(404, r#"{"error": ""}"#).message(), messages::NOT_FOUND);
        assert_eq!(response(404, r#"{"error": 7}"#).message(), messages::NOT_FOUND);
        assert_eq!(response(404, r#"{"detail": "x"}"#).message(), messages::NOT_FOUND);
        assert_eq!(response(404, "[1, 2]").message(), messages::NOT_FOUND);
    }

    #[test]
    fn test_timeout_and_no_response() {
        for err in [TransportError::TimedOut, TransportError::NoResponse("reset".into())] {
            let classified = classify(&RawFailure::Transport(&err));
            assert_eq!(classified.message(), "Server not responding");
            assert_eq!(classified.kind(), FailureKind::NoResponse);
        }
    }

    #[test]
    fn test_construction_failure_keeps_message() {
        let err = TransportError::Construction("invalid URL".into());
        assert_eq!(classify(&RawFailure::Transport(&err)).message(), "invalid URL");
    }

    #[test]
    fn test_empty_construction_message_falls_through() {
        let err = TransportError::Construction(String::new());
        assert_eq!(classify(&RawFailure::Transport(&err)).message(), "Network error");
    }
}
