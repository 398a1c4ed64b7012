//! Error types produced by `Session`.
//!
//! # Design
//! `SessionError` is closed: every failure a call can hit is re-expressed as
//! one of its variants and delivered through the same completion channel as
//! a success. Transport-level failures keep their underlying error as the
//! `source` so callers can still inspect DNS/TLS/timeout details.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::http::HttpResponse;

/// Boxed lower-level error carried by `TransportError::Failed`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors delivered to a `Session::send` completion handler.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A response arrived but its body was empty where one was required.
    #[error("HTTP {} response carried no data", .0.status)]
    NoData(ResponseMetadata),

    /// The transport finished without producing a response.
    #[error("transport produced no response")]
    NoResponse,

    /// The status code was outside `200..300`. `message` holds the server's
    /// structured error body when it could be decoded.
    #[error("unacceptable status code {code}")]
    UnacceptableStatusCode {
        code: u16,
        message: Option<ErrorMessage>,
    },

    /// The composed URL could not be parsed into components.
    #[error("failed to build request components from {0}")]
    FailedToBuildRequestComponents(String),

    /// The components could not be turned into a requestable URL.
    #[error("failed to build final URL from {0}")]
    FailedToBuildFinalUrl(Url),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The body did not match the descriptor's response shape.
    #[error("decoding error: {0}")]
    Decoding(#[source] serde_json::Error),
}

/// Failures reported before any response exists.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request was cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(#[source] BoxError),
}

impl TransportError {
    pub fn failed(error: impl Into<BoxError>) -> Self {
        TransportError::Failed(error.into())
    }
}

/// The server's JSON shape for non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorMessage {
    pub documentation_url: Url,
    pub message: String,
}

/// Status line and headers of a response, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl From<&HttpResponse> for ResponseMetadata {
    fn from(response: &HttpResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_decodes_github_shape() {
        let message: ErrorMessage = serde_json::from_str(
            r#"{"message":"Validation Failed","documentation_url":"https://docs.github.com/v3/search"}"#,
        )
        .unwrap();
        assert_eq!(message.message, "Validation Failed");
        assert_eq!(message.documentation_url.host_str(), Some("docs.github.com"));
    }

    #[test]
    fn error_message_requires_documentation_url() {
        let result: Result<ErrorMessage, _> = serde_json::from_str(r#"{"message":"Not Found"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn display_includes_status_code() {
        let err = SessionError::UnacceptableStatusCode {
            code: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "unacceptable status code 502");

        let err = SessionError::NoData(ResponseMetadata {
            status: 204,
            headers: Vec::new(),
        });
        assert_eq!(err.to_string(), "HTTP 204 response carried no data");
    }
}
