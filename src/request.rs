//! Description of a single API call.

use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Method, relative path and extra headers for one call.
///
/// A `RequestSpec` is handed to [`Client::build_request`](crate::Client::build_request)
/// together with an optional body and discarded afterwards.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// The HTTP method (GET, POST, PUT).
    pub method: Method,

    /// The request path, relative to the base URL. Must not start with `/`.
    pub path: String,

    /// Headers added on top of the standard ones. These win over the defaults.
    pub headers: HeaderMap,
}

impl RequestSpec {
    /// Creates a new `RequestSpec` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
        }
    }

    /// A read.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A create.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A mutation.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(RequestSpec::get("a").method, Method::GET);
        assert_eq!(RequestSpec::post("a").method, Method::POST);
        assert_eq!(RequestSpec::put("a").method, Method::PUT);
        assert_eq!(RequestSpec::put("a/b").path, "a/b");
    }

    #[test]
    fn test_with_header() {
        let spec = RequestSpec::post("x")
            .with_header("Content-Type", "text/plain")
            .unwrap();
        assert_eq!(spec.headers.get("content-type").unwrap(), "text/plain");

        assert!(RequestSpec::get("x").with_header("bad header", "v").is_err());
    }
}
