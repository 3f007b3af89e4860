//! Connection parameters for an Operations Center.

use serde::Deserialize;
use std::fmt;

use crate::scheme::UrlScheme;

/// API version sent in the `OC-API-Version` header when none is configured.
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Immutable connection parameters of a [`Client`](crate::Client).
///
/// Usually produced by [`ClientBuilder::build`](crate::ClientBuilder::build).
/// It can also be deserialized from any serde format and handed to
/// [`Client::from_config`](crate::Client::from_config); an unknown
/// `url_scheme` is rejected while deserializing.
///
/// ```
/// use spoc_client::{ClientConfig, UrlScheme};
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{"username": "admin", "password": "secret", "host": "oc.example.com:11090"}"#,
/// ).unwrap();
/// assert_eq!(config.api_version, "1.0");
/// assert_eq!(config.url_scheme, UrlScheme::V7_1_4);
/// assert!(config.ssl_verify);
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Operations Center administrator name.
    pub username: String,
    /// Operations Center administrator password.
    pub password: String,
    /// Host (and optional port) of the Operations Center, without a scheme.
    pub host: String,
    /// Value of the `OC-API-Version` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// URL layout of the target server.
    #[serde(default)]
    pub url_scheme: UrlScheme,
    /// Validate the server's TLS certificate. Only affects this client.
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_ssl_verify() -> bool {
    true
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("url_scheme", &self.url_scheme)
            .field("ssl_verify", &self.ssl_verify)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            host: "oc.example.com".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            url_scheme: UrlScheme::V8_1_0,
            ssl_verify: false,
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("V8_1_0"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_scheme() {
        let result = serde_json::from_str::<ClientConfig>(
            r#"{"username": "a", "password": "b", "host": "h", "url_scheme": "6.4.0"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_explicit_values() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"username": "a", "password": "b", "host": "h", "api_version": "2.0",
                "url_scheme": "8.1.0", "ssl_verify": false}"#,
        )
        .unwrap();
        assert_eq!(config.api_version, "2.0");
        assert_eq!(config.url_scheme, UrlScheme::V8_1_0);
        assert!(!config.ssl_verify);
    }
}
