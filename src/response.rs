//! Response wrapper that keeps the HTTP context next to the decoded data.
//!
//! Every successful call returns a [`Response`] so that callers get both the
//! value they asked for and the details of the exchange that produced it.

use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// A successful (2xx) Operations Center response.
///
/// # Type Parameters
///
/// * `T` - What was decoded from the body: a typed value, `()` when the body
///   was discarded, or the byte count when it was copied to a raw sink.
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
///     .build()?;
///
/// let response = client.get::<serde_json::Value>("oc/api/servers").await?;
/// println!("{} {} took {:?}", response.method, response.url, response.latency);
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response data.
    pub data: T,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Method of the request.
    pub method: Method,

    /// Fully resolved URL of the request.
    pub url: Url,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        status: StatusCode,
        headers: HeaderMap,
        method: Method,
        url: Url,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            status,
            headers,
            method,
            url,
            latency,
        }
    }

    /// Maps the response data to a different type using the provided function.
    ///
    /// Resource wrappers use this to unwrap the envelope documents the
    /// service returns while keeping the exchange details.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spoc_client::Response;
    /// # use http::{HeaderMap, Method, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     42,
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Method::GET,
    ///     url::Url::parse("https://oc.example.com/").unwrap(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
            method: self.method,
            url: self.url,
            latency: self.latency,
        }
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Discards the data, keeping only the exchange details.
    pub fn into_unit(self) -> Response<()> {
        self.map(|_| ())
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn response() -> Response<u32> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Response::new(
            7,
            StatusCode::OK,
            headers,
            Method::PUT,
            Url::parse("https://oc.example.com/oc/api/servers/S1").unwrap(),
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_header_lookup() {
        let response = response();
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_deref_and_into_unit() {
        let response = response();
        assert_eq!(*response, 7);
        let unit = response.into_unit();
        assert_eq!(unit.method, Method::PUT);
        assert_eq!(unit.status, StatusCode::OK);
    }
}
