//! Error types for Operations Center API calls.
//!
//! Every failure is an ordinary [`Error`] value returned to the caller. Nothing
//! is retried and nothing is logged-and-dropped on the way up.

use http::{Method, StatusCode};
use serde::Deserialize;
use std::fmt;
use url::Url;

use crate::scheme::UrlScheme;

/// The main error type for Operations Center API calls.
///
/// # Examples
///
/// ```no_run
/// use spoc_client::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .credentials("admin", "secret")
///     .host("oc.example.com:11090")
///     .build()?;
///
/// match client.servers().get("SERVER1").await {
///     Ok(server) => println!("{} is at {}", server.name, server.vrmf),
///     Err(Error::Api(api)) => eprintln!("server said {}: {}", api.status, api.message),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client configuration is invalid. The client is never created.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required call parameter was missing or empty.
    ///
    /// Raised before any request is built.
    #[error("{argument} is invalid because {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        argument: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The relative request path is unusable (empty or absolute).
    #[error("Invalid request path {path:?}: {reason}")]
    InvalidPath {
        /// The path as supplied
        path: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// An invalid URL was produced while resolving a path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// A network-level error occurred (connection refused, DNS, TLS, etc.).
    ///
    /// Carries no remote error context.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The call did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a status outside 200..=299.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A success response body did not match the expected shape.
    ///
    /// The raw text is kept so contract mismatches can be debugged.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A raw response body could not be copied into the caller's sink.
    #[error("Failed to write response body: {0}")]
    Io(#[from] std::io::Error),

    /// The operation has no endpoint under the active URL scheme.
    #[error("{operation} is not supported with the {scheme} URL scheme")]
    Unsupported {
        /// The operation that was requested
        operation: &'static str,
        /// The scheme the client is configured with
        scheme: UrlScheme,
    },
}

impl Error {
    pub(crate) fn empty_argument(argument: &'static str) -> Self {
        Error::InvalidArgument {
            argument,
            reason: "cannot be empty",
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(api) => Some(api.status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Api(api) => api.message.raw(),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the remote error if the server rejected the call.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }
}

/// A non-2xx answer from the Operations Center.
///
/// Only constructed for statuses outside `200..=299`. Compared by content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{method} {url}: {} {message}", .status.as_u16())]
pub struct ApiError {
    /// The HTTP status code
    pub status: StatusCode,
    /// Method of the request that produced this error
    pub method: Method,
    /// URL of the request that produced this error
    pub url: Url,
    /// What the body said, and how it was read
    pub message: ErrorMessage,
}

impl ApiError {
    /// Builds an error from a non-success status and its (possibly empty) body.
    pub(crate) fn from_body(status: StatusCode, method: Method, url: Url, body: &[u8]) -> Self {
        debug_assert!(!status.is_success());
        Self {
            status,
            method,
            url,
            message: ErrorMessage::decode(body),
        }
    }
}

/// The message carried by an [`ApiError`].
///
/// Decoding is a two-step attempt: the body is first read as the service's
/// structured error document, and only if that fails is it kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// The response had no body.
    Empty,
    /// The `message` field of a structured error document.
    Structured(String),
    /// The body was not a structured error document; this is its text.
    Raw(String),
}

#[derive(Deserialize)]
struct ErrorDocument {
    #[serde(default, alias = "Message", alias = "MESSAGE")]
    message: String,
}

impl ErrorMessage {
    fn decode(body: &[u8]) -> Self {
        if body.is_empty() {
            return ErrorMessage::Empty;
        }
        match serde_json::from_slice::<ErrorDocument>(body) {
            Ok(doc) => ErrorMessage::Structured(doc.message),
            Err(_) => ErrorMessage::Raw(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// The message text, whichever way it was obtained.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorMessage::Empty => "",
            ErrorMessage::Structured(message) | ErrorMessage::Raw(message) => message,
        }
    }

    fn raw(&self) -> Option<&str> {
        match self {
            ErrorMessage::Raw(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specialized `Result` type for Operations Center API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://oc.example.com/oc/api/servers").unwrap()
    }

    #[test]
    fn test_structured_message() {
        let err = ApiError::from_body(
            StatusCode::NOT_FOUND,
            Method::GET,
            url(),
            br#"{"message": "server not found"}"#,
        );
        assert_eq!(
            err.message,
            ErrorMessage::Structured("server not found".to_string())
        );
        assert_eq!(
            err.to_string(),
            "GET https://oc.example.com/oc/api/servers: 404 server not found"
        );
    }

    #[test]
    fn test_object_without_message_is_structured() {
        let err = ApiError::from_body(StatusCode::BAD_REQUEST, Method::PUT, url(), b"{}");
        assert_eq!(err.message, ErrorMessage::Structured(String::new()));
    }

    #[test]
    fn test_unstructured_body_kept_verbatim() {
        let body = "<html>Service Unavailable</html>";
        let err = ApiError::from_body(
            StatusCode::SERVICE_UNAVAILABLE,
            Method::GET,
            url(),
            body.as_bytes(),
        );
        assert_eq!(err.message, ErrorMessage::Raw(body.to_string()));
        assert_eq!(err.message.as_str(), body);
        assert_eq!(Error::Api(err).raw_response(), Some(body));
    }

    #[test]
    fn test_wrongly_typed_message_field_is_raw() {
        let body = r#"{"message": 42}"#;
        let err = ApiError::from_body(StatusCode::CONFLICT, Method::POST, url(), body.as_bytes());
        assert_eq!(err.message, ErrorMessage::Raw(body.to_string()));
    }

    #[test]
    fn test_empty_body() {
        let err = ApiError::from_body(StatusCode::UNAUTHORIZED, Method::GET, url(), b"");
        assert_eq!(err.message, ErrorMessage::Empty);
        assert_eq!(
            err.to_string(),
            "GET https://oc.example.com/oc/api/servers: 401 "
        );
    }

    #[test]
    fn test_equality_is_by_content() {
        let a = ApiError::from_body(StatusCode::NOT_FOUND, Method::GET, url(), b"gone");
        let b = ApiError::from_body(StatusCode::NOT_FOUND, Method::GET, url(), b"gone");
        assert_eq!(a, b);
    }

    #[test]
    fn test_status_accessor() {
        let err = Error::Api(ApiError::from_body(
            StatusCode::FORBIDDEN,
            Method::GET,
            url(),
            b"",
        ));
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(err.api_error().is_some());
        assert_eq!(Error::Timeout.status(), None);
        assert_eq!(
            Error::empty_argument("serverName").to_string(),
            "serverName is invalid because cannot be empty"
        );
    }
}
