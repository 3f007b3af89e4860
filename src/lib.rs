//! # spoc-client - IBM Spectrum Protect Operations Center REST client
//!
//! An async client for the Operations Center REST API built on top of
//! `reqwest`. Two generations of the service are in the field with different
//! URL layouts (`7.1.4` and `8.1.0`); the client is configured with one of
//! them and every path it builds follows that layout.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spoc_client::Client;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), spoc_client::Error> {
//!     let client = Client::builder()
//!         .credentials("admin", "secret")
//!         .host("oc.example.com:11090")
//!         .url_scheme("7.1.4")
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let servers = client.servers().list().await?;
//!     for server in &servers.servers {
//!         println!("{}: {} clients", server.name, server.num_clients);
//!     }
//!
//!     // A dedicated PUT .../lock under 7.1.4, an update document under 8.1.0.
//!     client.clients().lock("SERVER1", "NODE1").await?;
//!
//!     let output = client.cli().issue_command(Some("SERVER1"), "query status").await?;
//!     println!("{}", output.data);
//!     Ok(())
//! }
//! ```
//!
//! ## Request pipeline
//!
//! Every resource call goes through the same three steps, which are also
//! public for endpoints that have no wrapper:
//!
//! 1. [`SchemeRules`] (from [`Client::rules`]) gives the relative path.
//! 2. [`Client::build_request`] resolves it against the base URL, encodes the
//!    body as JSON and adds Basic auth, `Content-Type`/`Accept`,
//!    `User-Agent` and `OC-API-Version`.
//! 3. [`Client::execute`], [`Client::execute_json`] or [`Client::execute_raw`]
//!    send it and classify the outcome.
//!
//! ## Error Handling
//!
//! Any status outside 200..=299 becomes [`Error::Api`]. Its message is the
//! `message` field of the service's error document when the body is one, and
//! the body text verbatim when it is not:
//!
//! ```no_run
//! use spoc_client::{Client, Error, ErrorMessage};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().host("oc.example.com").build()?;
//! match client.servers().get("SERVER1").await {
//!     Ok(server) => println!("{}", server.vrmf),
//!     Err(Error::Api(api)) => match &api.message {
//!         ErrorMessage::Structured(message) => eprintln!("{}: {}", api.status, message),
//!         ErrorMessage::Raw(body) => eprintln!("{}: unexpected body {}", api.status, body),
//!         ErrorMessage::Empty => eprintln!("{}", api.status),
//!     },
//!     Err(Error::DeserializationFailed { raw_response, .. }) => {
//!         eprintln!("server answered with an unexpected document: {}", raw_response);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is retried automatically, and redirects are not followed: a 3xx
//! response is an [`Error::Api`] like any other non-2xx status.
//!
//! ## TLS
//!
//! `ssl_verify(false)` turns off certificate validation for that client's own
//! transport only. Other clients in the process are unaffected.

mod client;
pub mod config;
mod error;
pub mod models;
mod request;
pub mod resources;
mod response;
pub mod scheme;

pub use client::{
    Client, ClientBuilder, RequestCompletionCallback, API_VERSION_HEADER, MEDIA_TYPE,
    TEXT_MEDIA_TYPE,
};
pub use config::ClientConfig;
pub use error::{ApiError, Error, ErrorMessage, Result};
pub use models::{
    BackupClient, BackupClientAtRisk, BackupDomain, BackupServer, ClientList, ClientSchedule,
    DomainList, Flag, RegisterClientRequest, ServerList, UpdateClientRequest,
};
pub use request::RequestSpec;
pub use response::Response;
pub use scheme::{SchemeRules, UrlScheme};
