//! Error taxonomy for API operations with HTTP status classification.

use thiserror::Error;

/// Boxed error used as the source of transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way an API operation can fail.
///
/// HTTP-derived variants keep the status code and the raw response body so
/// callers can inspect what the server actually said.
#[derive(Debug, Error)]
pub enum Error {
    /// The client could not be constructed (missing credentials, bad base URL, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller input was rejected before any request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The server rejected the credentials (HTTP 401/403)
    #[error("Authentication failed (HTTP {status}){}", detail(.body))]
    Authentication { status: u16, body: String },

    /// The requested resource does not exist (HTTP 404)
    #[error("Not found (HTTP {status}){}", detail(.body))]
    NotFound { status: u16, body: String },

    /// The server rejected a well-formed but invalid request (other 4xx)
    #[error("Request rejected (HTTP {status}){}", detail(.body))]
    Validation { status: u16, body: String },

    /// Required context is missing, e.g. no registrant to default to
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The server failed to handle the request (HTTP 5xx)
    #[error("Server error (HTTP {status}){}", detail(.body))]
    Server { status: u16, body: String },

    /// The HTTP exchange could not complete (DNS, connect, timeout, ...)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        timed_out: bool,
        #[source]
        source: Option<BoxError>,
    },

    /// The response could not be decoded into the expected shape
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        status: Option<u16>,
        body: String,
    },
}

impl Error {
    /// Builds a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            timed_out: false,
            source: None,
        }
    }

    /// Builds a transport error flagged as a timeout.
    pub fn timeout(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            timed_out: true,
            source: None,
        }
    }

    /// HTTP status code the error was derived from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. }
            | Error::NotFound { status, .. }
            | Error::Validation { status, .. }
            | Error::Server { status, .. } => Some(*status),
            Error::Protocol { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body the error was derived from, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Authentication { body, .. }
            | Error::NotFound { body, .. }
            | Error::Validation { body, .. }
            | Error::Server { body, .. }
            | Error::Protocol { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { timed_out: true, .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport {
            message: error.to_string(),
            timed_out: error.is_timeout(),
            source: Some(Box::new(error)),
        }
    }
}

/// Maps a non-success HTTP status to its error variant.
///
/// Returns `None` for 2xx statuses.
pub fn classify_status(status: u16, body: &[u8]) -> Option<Error> {
    let body = String::from_utf8_lossy(body).into_owned();
    match status {
        200..=299 => None,
        401 | 403 => Some(Error::Authentication { status, body }),
        404 => Some(Error::NotFound { status, body }),
        400..=499 => Some(Error::Validation { status, body }),
        500..=599 => Some(Error::Server { status, body }),
        _ => Some(Error::Protocol {
            message: format!("unexpected HTTP status {}", status),
            status: Some(status),
            body,
        }),
    }
}

/// Renders the server's explanation for an HTTP error, if the body has one.
fn detail(body: &str) -> String {
    match server_message(body) {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

/// Extracts a human readable message from an API error body.
///
/// The API answers with `{"message": "..."}` for most failures and
/// `{"errors": {"field": ["..."]}}` for rejected payloads.
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }
    if let Some(message) = value.get("error").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }

    let errors = value.get("errors")?.as_object()?;
    let parts: Vec<String> = errors
        .iter()
        .map(|(field, reasons)| {
            let reasons = match reasons {
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.as_str().unwrap_or_default().to_string(),
            };
            format!("{} {}", field, reasons)
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success_statuses() {
        assert!(classify_status(200, b"").is_none());
        assert!(classify_status(201, b"{}").is_none());
        assert!(classify_status(204, b"").is_none());
    }

    #[test]
    fn test_classify_auth_statuses() {
        assert!(matches!(
            classify_status(401, b""),
            Some(Error::Authentication { status: 401, .. })
        ));
        assert!(matches!(
            classify_status(403, b""),
            Some(Error::Authentication { status: 403, .. })
        ));
    }

    #[test]
    fn test_classify_not_found() {
        assert!(matches!(
            classify_status(404, b""),
            Some(Error::NotFound { status: 404, .. })
        ));
    }

    #[test]
    fn test_classify_other_client_errors() {
        for status in [400, 409, 422, 429] {
            let err = classify_status(status, b"").unwrap();
            assert!(matches!(err, Error::Validation { .. }), "{}", status);
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn test_classify_server_errors() {
        assert!(matches!(
            classify_status(500, b""),
            Some(Error::Server { status: 500, .. })
        ));
        assert!(matches!(
            classify_status(503, b""),
            Some(Error::Server { status: 503, .. })
        ));
    }

    #[test]
    fn test_classify_unexpected_status() {
        let err = classify_status(302, b"moved").unwrap();
        assert!(matches!(err, Error::Protocol { status: Some(302), .. }));
        assert_eq!(err.body(), Some("moved"));
    }

    #[test]
    fn test_body_preserved() {
        let err = classify_status(422, br#"{"message":"Domain is taken"}"#).unwrap();
        assert_eq!(err.body(), Some(r#"{"message":"Domain is taken"}"#));
    }

    #[test]
    fn test_display_includes_server_message() {
        let err = classify_status(422, br#"{"message":"Domain is taken"}"#).unwrap();
        assert_eq!(err.to_string(), "Request rejected (HTTP 422): Domain is taken");

        let err = classify_status(500, b"<html>oops</html>").unwrap();
        assert_eq!(err.to_string(), "Server error (HTTP 500)");
    }

    #[test]
    fn test_server_message_from_errors_object() {
        let body = r#"{"errors":{"name":["is invalid","is too short"]}}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("name is invalid, is too short")
        );
    }

    #[test]
    fn test_server_message_missing() {
        assert_eq!(server_message(""), None);
        assert_eq!(server_message("not json"), None);
        assert_eq!(server_message(r#"{"domain":{}}"#), None);
        assert_eq!(server_message(r#"{"errors":{}}"#), None);
    }

    #[test]
    fn test_transport_helpers() {
        let err = Error::transport("connection refused");
        assert!(!err.is_timeout());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Transport error: connection refused");

        let err = Error::timeout("operation timed out");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        assert_eq!(Error::Configuration("x".into()).status(), None);
        assert_eq!(Error::InvalidArgument("x".into()).body(), None);
        assert_eq!(Error::Precondition("x".into()).status(), None);
    }
}
