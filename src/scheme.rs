//! URL layouts of the two Operations Center API generations.
//!
//! Resource wrappers never spell out a path prefix themselves. They ask the
//! client's [`SchemeRules`] for it, so switching [`UrlScheme`] changes every
//! constructed path at once.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// One of the two URL layouts exposed by the Operations Center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UrlScheme {
    /// The 7.1.4 layout. Client actions are dedicated sub-resources.
    #[default]
    V7_1_4,
    /// The 8.1.0 layout. Client actions go through a general update document.
    V8_1_0,
}

impl UrlScheme {
    /// Every recognised scheme, oldest first.
    pub const ALL: [UrlScheme; 2] = [UrlScheme::V7_1_4, UrlScheme::V8_1_0];

    /// The identifier used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlScheme::V7_1_4 => "7.1.4",
            UrlScheme::V8_1_0 => "8.1.0",
        }
    }

    /// Path rules for this scheme.
    pub fn rules(&self) -> SchemeRules {
        match self {
            UrlScheme::V7_1_4 => SchemeRules {
                scheme: *self,
                api_prefix: "oc/api/",
                servers_base: "oc/api/servers/",
                server_separator: "",
                dedicated_client_actions: true,
                general_client_update: false,
                vm_segment: "vm",
                schedule_domain_required: false,
            },
            UrlScheme::V8_1_0 => SchemeRules {
                scheme: *self,
                api_prefix: "oc/api/v1/",
                servers_base: "oc/api/v1/servers",
                server_separator: "/",
                dedicated_client_actions: false,
                general_client_update: true,
                vm_segment: "vms",
                schedule_domain_required: true,
            },
        }
    }
}

impl fmt::Display for UrlScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrlScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UrlScheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == s)
            .ok_or_else(|| Error::Configuration(format!("Invalid URL Scheme {} specified", s)))
    }
}

impl TryFrom<String> for UrlScheme {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UrlScheme> for String {
    fn from(scheme: UrlScheme) -> Self {
        scheme.as_str().to_string()
    }
}

/// Path construction rules and capabilities of one [`UrlScheme`].
///
/// All paths are relative (no leading `/`) so they resolve beneath the
/// client's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeRules {
    scheme: UrlScheme,
    api_prefix: &'static str,
    servers_base: &'static str,
    server_separator: &'static str,
    dedicated_client_actions: bool,
    general_client_update: bool,
    vm_segment: &'static str,
    schedule_domain_required: bool,
}

impl SchemeRules {
    /// The scheme these rules were derived from.
    pub fn scheme(&self) -> UrlScheme {
        self.scheme
    }

    /// A collection hanging directly off the API prefix, e.g. `clients`.
    pub fn api_path(&self, resource: &str) -> String {
        format!("{}{}", self.api_prefix, resource)
    }

    /// The backup server collection.
    pub fn servers_path(&self) -> String {
        self.servers_base.trim_end_matches('/').to_string()
    }

    /// A single backup server. The name is percent-encoded.
    pub fn server_path(&self, server: &str) -> String {
        format!(
            "{}{}{}",
            self.servers_base,
            self.server_separator,
            segment(server)
        )
    }

    /// A single backup client registered on `server`. Both names are
    /// percent-encoded.
    pub fn client_path(&self, server: &str, client: &str) -> String {
        format!("{}/clients/{}", self.server_path(server), segment(client))
    }

    /// A CLI endpoint. Command issuance lives under `oc/api/cli` in every
    /// layout.
    pub fn cli_path(&self, endpoint: &str) -> String {
        format!("{}{}", CLI_PREFIX, endpoint)
    }

    /// Whether lock, unlock, decommission, schedule assignment and password
    /// changes have their own sub-resource endpoints.
    pub fn has_dedicated_client_actions(&self) -> bool {
        self.dedicated_client_actions
    }

    /// Whether a client can be changed through a general update document.
    pub fn has_general_client_update(&self) -> bool {
        self.general_client_update
    }

    /// Path segment naming a client's virtual machines.
    pub fn vm_segment(&self) -> &'static str {
        self.vm_segment
    }

    /// Whether assigning a schedule needs the schedule's policy domain.
    pub fn schedule_domain_required(&self) -> bool {
        self.schedule_domain_required
    }
}

const CLI_PREFIX: &str = "oc/api/cli/";

/// Percent-encodes a resource name for use as a single path segment, so
/// `/`, `?` and `#` inside a name cannot change the resolved URL.
pub(crate) fn segment(name: &str) -> Cow<'_, str> {
    urlencoding::encode(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_schemes() {
        assert_eq!("7.1.4".parse::<UrlScheme>().unwrap(), UrlScheme::V7_1_4);
        assert_eq!("8.1.0".parse::<UrlScheme>().unwrap(), UrlScheme::V8_1_0);
        assert_eq!(UrlScheme::default(), UrlScheme::V7_1_4);
    }

    #[test]
    fn test_parse_rejects_unknown_schemes() {
        for candidate in ["", "7.1.3", "8.1", "8.1.0 ", "v8.1.0", "latest"] {
            match candidate.parse::<UrlScheme>() {
                Err(Error::Configuration(msg)) => assert!(msg.contains("Invalid URL Scheme")),
                other => panic!("expected configuration error for {candidate:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_older_scheme_paths() {
        let rules = UrlScheme::V7_1_4.rules();
        assert_eq!(rules.servers_path(), "oc/api/servers");
        assert_eq!(rules.server_path("S1"), "oc/api/servers/S1");
        assert_eq!(rules.client_path("S1", "C1"), "oc/api/servers/S1/clients/C1");
        assert_eq!(rules.api_path("clients"), "oc/api/clients");
        assert!(rules.has_dedicated_client_actions());
        assert!(!rules.has_general_client_update());
        assert_eq!(rules.vm_segment(), "vm");
    }

    #[test]
    fn test_newer_scheme_paths() {
        let rules = UrlScheme::V8_1_0.rules();
        assert_eq!(rules.servers_path(), "oc/api/v1/servers");
        assert_eq!(rules.server_path("S1"), "oc/api/v1/servers/S1");
        assert_eq!(
            rules.client_path("S1", "C1"),
            "oc/api/v1/servers/S1/clients/C1"
        );
        assert_eq!(rules.cli_path("issueCommand"), "oc/api/cli/issueCommand");
        assert!(!rules.has_dedicated_client_actions());
        assert!(rules.has_general_client_update());
        assert!(rules.schedule_domain_required());
        assert_eq!(rules.vm_segment(), "vms");
    }

    #[test]
    fn test_names_are_single_segments() {
        let rules = UrlScheme::V8_1_0.rules();
        assert_eq!(
            rules.client_path("S 1", "NODE#1?x"),
            "oc/api/v1/servers/S%201/clients/NODE%231%3Fx"
        );
        assert_eq!(
            UrlScheme::V7_1_4.rules().server_path("a/b"),
            "oc/api/servers/a%2Fb"
        );
    }

    #[test]
    fn test_paths_are_relative() {
        for scheme in UrlScheme::ALL {
            let rules = scheme.rules();
            assert!(!rules.servers_path().starts_with('/'));
            assert!(!rules.api_path("domains").starts_with('/'));
            assert_eq!(rules.scheme(), scheme);
        }
    }

    #[test]
    fn test_serde_uses_identifier() {
        let scheme: UrlScheme = serde_json::from_str("\"8.1.0\"").unwrap();
        assert_eq!(scheme, UrlScheme::V8_1_0);
        assert_eq!(serde_json::to_string(&scheme).unwrap(), "\"8.1.0\"");
        assert!(serde_json::from_str::<UrlScheme>("\"9.9.9\"").is_err());
    }
}
