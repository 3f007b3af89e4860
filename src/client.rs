//! Operations Center client: request building and response dispatch.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure and create clients, then either reach the typed resource
//! wrappers ([`Client::servers`], [`Client::clients`], [`Client::domains`],
//! [`Client::cli`]) or drive the pipeline directly with
//! [`Client::build_request`] and the `execute*` family.

use crate::{
    config::{ClientConfig, DEFAULT_API_VERSION},
    error::ApiError,
    request::RequestSpec,
    resources::{BackupClients, Cli, Domains, Servers},
    scheme::{SchemeRules, UrlScheme},
    Error, Response, Result,
};
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Media type of every structured request and response body.
pub const MEDIA_TYPE: &str = "application/json";

/// Content type of CLI command bodies.
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// Header carrying the configured API version (`OC-API-Version`).
pub const API_VERSION_HEADER: &str = "oc-api-version";

const USER_AGENT_VALUE: &str = concat!("spoc-client/", env!("CARGO_PKG_VERSION"));

/// Observer invoked with every completed request/response pair.
///
/// Called once a response has arrived, whatever its status, and before its
/// body is read. It cannot influence the outcome of the call.
pub type RequestCompletionCallback =
    Arc<dyn Fn(&reqwest::Request, &reqwest::Response) + Send + Sync>;

/// An Operations Center REST API client.
///
/// The client is cheap to clone and safe to share between tasks. Clones share
/// the transport (and its connection pool), the configuration and the scheme
/// rules; nothing else is shared between calls.
///
/// # Examples
///
/// ```no_run
/// use spoc_client::Client;
///
/// # async fn example() -> Result<(), spoc_client::Error> {
/// let client = Client::builder()
///     .credentials("admin", "secret")
///     .host("oc.example.com:11090")
///     .url_scheme("8.1.0")
///     .build()?;
///
/// for server in client.servers().list().await?.servers.iter() {
///     println!("{} ({} clients)", server.name, server.num_clients);
/// }
///
/// client.clients().lock("SERVER1", "NODE1").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
    rules: SchemeRules,
    api_version: HeaderValue,
    timeout: Option<Duration>,
    on_request_completed: Option<RequestCompletionCallback>,
}

/// A received 2xx response whose body has been read in full.
struct Completed {
    status: StatusCode,
    headers: HeaderMap,
    method: Method,
    url: Url,
    latency: Duration,
    body: Vec<u8>,
}

impl Completed {
    fn into_response<T>(self, data: T) -> Response<T> {
        Response::new(
            data,
            self.status,
            self.headers,
            self.method,
            self.url,
            self.latency,
        )
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from an already validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the host does not form a valid URL
    /// or the transport cannot be created.
    pub fn from_config(config: ClientConfig) -> Result<Client> {
        ClientBuilder::from_config(config).build()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The URL scheme this client talks.
    pub fn scheme(&self) -> UrlScheme {
        self.inner.config.url_scheme
    }

    /// Path rules for the configured URL scheme.
    pub fn rules(&self) -> &SchemeRules {
        &self.inner.rules
    }

    /// The endpoint every relative path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Backup server operations.
    pub fn servers(&self) -> Servers<'_> {
        Servers::new(self)
    }

    /// Backup client (node) operations.
    pub fn clients(&self) -> BackupClients<'_> {
        BackupClients::new(self)
    }

    /// Policy domain operations.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self)
    }

    /// Administrative command issuance.
    pub fn cli(&self) -> Cli<'_> {
        Cli::new(self)
    }

    /// Builds an authenticated request with an optional JSON body.
    ///
    /// The path is resolved against [`Client::base_url`] and must therefore be
    /// relative: no leading `/`. Nothing is sent.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidPath`] / [`Error::InvalidUrl`] if the path cannot be
    ///   resolved beneath the base URL.
    /// * [`Error::SerializationFailed`] if the body cannot be encoded.
    pub fn build_request<B>(&self, spec: &RequestSpec, body: Option<&B>) -> Result<reqwest::Request>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve(&spec.path)?;

        let payload = match body {
            Some(body) => Some(
                serde_json::to_vec(body).map_err(Error::SerializationFailed)?,
            ),
            None => None,
        };

        self.assemble(spec, url, payload, MEDIA_TYPE)
    }

    /// Builds an authenticated request carrying a plain-text body.
    ///
    /// Used for CLI command issuance, which takes the command verbatim.
    pub fn build_text_request(&self, spec: &RequestSpec, text: &str) -> Result<reqwest::Request> {
        let url = self.resolve(&spec.path)?;
        self.assemble(spec, url, Some(text.as_bytes().to_vec()), TEXT_MEDIA_TYPE)
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        if path.is_empty() {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "cannot be empty",
            });
        }
        if path.starts_with('/') {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "must be relative to the base URL",
            });
        }

        let url = self.inner.base_url.join(path)?;
        if url.origin() != self.inner.base_url.origin() {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "resolves outside the base URL",
            });
        }
        Ok(url)
    }

    fn assemble(
        &self,
        spec: &RequestSpec,
        url: Url,
        payload: Option<Vec<u8>>,
        content_type: &'static str,
    ) -> Result<reqwest::Request> {
        let config = &self.inner.config;

        let mut request = self
            .inner
            .http_client
            .request(spec.method.clone(), url)
            .basic_auth(&config.username, Some(&config.password))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build request: {}", e)))?;

        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(API_VERSION_HEADER, self.inner.api_version.clone());
        for (name, value) in &spec.headers {
            headers.insert(name, value.clone());
        }

        if let Some(payload) = payload {
            *request.body_mut() = Some(payload.into());
        }

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Built HTTP request"
        );

        Ok(request)
    }

    /// Sends a request and discards the body of a success response.
    ///
    /// # Errors
    ///
    /// [`Error::Network`] or [`Error::Timeout`] if no response arrived,
    /// [`Error::Api`] for any status outside 200..=299.
    pub async fn execute(&self, request: reqwest::Request) -> Result<Response<()>> {
        let completed = self.dispatch(request).await?;
        Ok(completed.into_response(()))
    }

    /// Sends a request and decodes the success body as JSON into `T`.
    ///
    /// A 2xx response whose body is not a valid `T` (including an empty body)
    /// fails with [`Error::DeserializationFailed`].
    pub async fn execute_json<T>(&self, request: reqwest::Request) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let completed = self.dispatch(request).await?;

        match serde_json::from_slice::<T>(&completed.body) {
            Ok(data) => Ok(completed.into_response(data)),
            Err(e) => Err(Error::DeserializationFailed {
                raw_response: String::from_utf8_lossy(&completed.body).into_owned(),
                serde_error: e.to_string(),
                status: completed.status,
            }),
        }
    }

    /// Sends a request and copies the success body verbatim into `sink`.
    ///
    /// The response data is the number of bytes written.
    pub async fn execute_raw<W>(
        &self,
        request: reqwest::Request,
        sink: &mut W,
    ) -> Result<Response<u64>>
    where
        W: Write + ?Sized,
    {
        let completed = self.dispatch(request).await?;
        sink.write_all(&completed.body)?;
        let written = completed.body.len() as u64;
        Ok(completed.into_response(written))
    }

    async fn dispatch(&self, request: reqwest::Request) -> Result<Completed> {
        match self.inner.timeout {
            Some(limit) => tokio::time::timeout(limit, self.round_trip(request))
                .await
                .map_err(|_| Error::Timeout)?,
            None => self.round_trip(request).await,
        }
    }

    async fn round_trip(&self, request: reqwest::Request) -> Result<Completed> {
        let method = request.method().clone();
        let url = request.url().clone();
        let observed = self
            .inner
            .on_request_completed
            .as_ref()
            .and_then(|_| request.try_clone());

        tracing::debug!(method = %method, url = %url, "Executing HTTP request");

        let start_time = Instant::now();
        let response = self
            .inner
            .http_client
            .execute(request)
            .await
            .map_err(transport_error)?;

        if let (Some(callback), Some(observed)) = (&self.inner.on_request_completed, &observed) {
            callback(observed, &response);
        }

        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            // An unreadable error body still yields the status-bearing error.
            let body = response.bytes().await.map(|b| b.to_vec()).unwrap_or_default();

            tracing::debug!(
                status = status.as_u16(),
                latency_ms = start_time.elapsed().as_millis(),
                "Received HTTP error response"
            );

            return Err(ApiError::from_body(status, method, url, &body).into());
        }

        let body = response.bytes().await.map_err(transport_error)?.to_vec();
        let latency = start_time.elapsed();

        tracing::debug!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        Ok(Completed {
            status,
            headers,
            method,
            url,
            latency,
            body,
        })
    }

    /// Builds and sends a request, decoding the success body into `Res`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use spoc_client::{Client, RequestSpec};
    ///
    /// # async fn example() -> Result<(), spoc_client::Error> {
    /// let client = Client::builder()
    ///     .credentials("admin", "secret")
    ///     .host("oc.example.com:11090")
    ///     .build()?;
    ///
    /// let spec = RequestSpec::get("oc/api/servers/SERVER1/details");
    /// let details = client.call::<(), serde_json::Value>(spec, None).await?;
    /// println!("{}", details.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Req, Res>(
        &self,
        spec: RequestSpec,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let request = self.build_request(&spec, body)?;
        self.execute_json(request).await
    }

    /// Builds and sends a request whose success body is of no interest.
    pub async fn submit<Req>(&self, spec: RequestSpec, body: Option<&Req>) -> Result<Response<()>>
    where
        Req: Serialize + ?Sized,
    {
        let request = self.build_request(&spec, body)?;
        self.execute(request).await
    }

    /// Makes a GET request to the specified relative path.
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        self.call::<(), Res>(RequestSpec::get(path), None).await
    }

    /// Makes a POST request to the specified relative path with a JSON body.
    pub async fn post<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.call(RequestSpec::post(path), Some(body)).await
    }

    /// Makes a PUT request to the specified relative path with a JSON body.
    pub async fn put<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.call(RequestSpec::put(path), Some(body)).await
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(e)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use spoc_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), spoc_client::Error> {
/// let client = ClientBuilder::new()
///     .credentials("admin", "secret")
///     .host("oc.example.com:11090")
///     .api_version("1.0")
///     .url_scheme("7.1.4")
///     .ssl_verify(false)
///     .timeout(Duration::from_secs(30))
///     .on_request_completed(|request, response| {
///         println!("{} {} -> {}", request.method(), request.url(), response.status());
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    username: String,
    password: String,
    host: String,
    api_version: String,
    url_scheme: Option<String>,
    ssl_verify: bool,
    base_url: Option<Url>,
    timeout: Option<Duration>,
    on_request_completed: Option<RequestCompletionCallback>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            host: String::new(),
            api_version: String::new(),
            url_scheme: None,
            ssl_verify: true,
            base_url: None,
            timeout: None,
            on_request_completed: None,
        }
    }

    fn from_config(config: ClientConfig) -> Self {
        Self {
            username: config.username,
            password: config.password,
            host: config.host,
            api_version: config.api_version,
            url_scheme: Some(config.url_scheme.as_str().to_string()),
            ssl_verify: config.ssl_verify,
            ..Self::new()
        }
    }

    /// Sets the HTTP Basic credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the Operations Center host, e.g. `oc.example.com:11090`.
    ///
    /// Requests go to `https://<host>/`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the `OC-API-Version` header value. Defaults to `1.0`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the URL scheme identifier, `7.1.4` (default) or `8.1.0`.
    ///
    /// The identifier is validated by [`ClientBuilder::build`].
    pub fn url_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.url_scheme = Some(scheme.into());
        self
    }

    /// Enables or disables TLS certificate validation for this client.
    pub fn ssl_verify(mut self, verify: bool) -> Self {
        self.ssl_verify = verify;
        self
    }

    /// Overrides the endpoint derived from the host.
    ///
    /// Useful for plain-HTTP deployments, proxies mounted under a path, and
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Bounds every call, from sending the request to reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Registers an observer called after every received response.
    pub fn on_request_completed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&reqwest::Request, &reqwest::Response) + Send + Sync + 'static,
    {
        self.on_request_completed = Some(Arc::new(callback));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the URL scheme is not one of the
    /// recognised identifiers, if neither a host nor a base URL was given, or
    /// if the transport cannot be created. No request is ever sent.
    pub fn build(self) -> Result<Client> {
        let url_scheme = match self.url_scheme.as_deref() {
            None | Some("") => UrlScheme::default(),
            Some(identifier) => identifier.parse()?,
        };

        let api_version = if self.api_version.is_empty() {
            DEFAULT_API_VERSION.to_string()
        } else {
            self.api_version
        };
        let api_version_header = HeaderValue::from_str(&api_version)
            .map_err(|e| Error::Configuration(format!("Invalid API version: {}", e)))?;

        let mut base_url = match self.base_url {
            Some(url) => url,
            None if self.host.is_empty() => {
                return Err(Error::Configuration(
                    "Host or base URL is required".to_string(),
                ))
            }
            None => Url::parse(&format!("https://{}/", self.host))?,
        };
        if base_url.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        if !self.ssl_verify {
            tracing::warn!(
                base_url = %base_url,
                "TLS certificate validation disabled for this client"
            );
        }

        // 3xx responses are surfaced to the caller as remote errors.
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(!self.ssl_verify)
            .build()
            .map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        let config = ClientConfig {
            username: self.username,
            password: self.password,
            host: self.host,
            api_version,
            url_scheme,
            ssl_verify: self.ssl_verify,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                rules: url_scheme.rules(),
                config,
                api_version: api_version_header,
                timeout: self.timeout,
                on_request_completed: self.on_request_completed,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;

    fn client(scheme: &str) -> Client {
        Client::builder()
            .credentials("admin", "secret")
            .host("oc.example.com:11090")
            .url_scheme(scheme)
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let client = Client::builder()
            .credentials("admin", "secret")
            .host("oc.example.com:11090")
            .build()
            .unwrap();
        assert_eq!(client.config().api_version, "1.0");
        assert_eq!(client.scheme(), UrlScheme::V7_1_4);
        assert_eq!(client.base_url().as_str(), "https://oc.example.com:11090/");
        assert!(client.config().ssl_verify);
    }

    #[test]
    fn test_invalid_scheme_fails_construction() {
        let result = Client::builder()
            .host("oc.example.com")
            .url_scheme("7.2.0")
            .build();
        match result {
            Err(Error::Configuration(msg)) => assert_eq!(msg, "Invalid URL Scheme 7.2.0 specified"),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_host_fails_construction() {
        assert!(matches!(
            Client::builder().build(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let client = Client::builder()
            .base_url("http://127.0.0.1:8080/proxy")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8080/proxy/");

        let request = client
            .build_request::<()>(&RequestSpec::get("oc/api/servers"), None)
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://127.0.0.1:8080/proxy/oc/api/servers"
        );
    }

    #[test]
    fn test_build_request_sets_standard_headers() {
        let client = client("7.1.4");
        let request = client
            .build_request::<()>(&RequestSpec::get("oc/api/servers"), None)
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://oc.example.com:11090/oc/api/servers"
        );
        let headers = request.headers();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), MEDIA_TYPE);
        assert_eq!(headers.get(ACCEPT).unwrap(), MEDIA_TYPE);
        assert_eq!(headers.get(USER_AGENT).unwrap(), USER_AGENT_VALUE);
        assert_eq!(headers.get(API_VERSION_HEADER).unwrap(), "1.0");
        // base64("admin:secret")
        assert_eq!(
            headers.get(http::header::AUTHORIZATION).unwrap(),
            "Basic YWRtaW46c2VjcmV0"
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn test_build_request_encodes_body() {
        let client = client("8.1.0");
        let body = serde_json::json!({"lock": "yes"});
        let request = client
            .build_request(&RequestSpec::put("oc/api/v1/servers/S1/clients/C1"), Some(&body))
            .unwrap();
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(bytes).unwrap(),
            body
        );
    }

    #[test]
    fn test_build_text_request() {
        let client = client("7.1.4");
        let request = client
            .build_text_request(&RequestSpec::post("oc/api/cli/issueCommand"), "q status")
            .unwrap();
        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), TEXT_MEDIA_TYPE);
        assert_eq!(request.headers().get(ACCEPT).unwrap(), MEDIA_TYPE);
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()).unwrap(),
            b"q status"
        );
    }

    #[test]
    fn test_spec_headers_override_defaults() {
        let client = client("7.1.4");
        let spec = RequestSpec::get("oc/api/servers")
            .with_header(API_VERSION_HEADER, "2.0")
            .unwrap();
        let request = client.build_request::<()>(&spec, None).unwrap();
        let values: Vec<_> = request.headers().get_all(API_VERSION_HEADER).iter().collect();
        assert_eq!(values, vec!["2.0"]);
    }

    #[test]
    fn test_rejects_unusable_paths() {
        let client = client("7.1.4");
        for path in ["", "/oc/api/servers", "https://elsewhere.example.com/x"] {
            match client.build_request::<()>(&RequestSpec::get(path), None) {
                Err(Error::InvalidPath { .. }) => {}
                other => panic!("expected invalid path for {path:?}, got {other:?}"),
            }
        }
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_serialization_failure_is_reported_before_sending() {
        let client = client("7.1.4");
        match client.build_request(&RequestSpec::post("oc/api/clients"), Some(&Unserializable)) {
            Err(Error::SerializationFailed(e)) => {
                assert!(e.to_string().contains("not representable"));
                assert!(std::error::Error::source(&Error::SerializationFailed(e)).is_some());
            }
            other => panic!("expected serialization failure, got {other:?}"),
        }
    }
}
