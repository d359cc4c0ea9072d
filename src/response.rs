//! Response wrapper that keeps HTTP details next to the decoded data.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful (`200 OK`) round-trip.
///
/// Holds the decoded body along with the status, headers and latency of the
/// exchange.
///
/// # Examples
///
/// ```no_run
/// use soapbus::BusClient;
///
/// # async fn example() -> Result<(), soapbus::Error> {
/// let client = BusClient::builder()
///     .base_url("https://bus.example.com/")
///     .method_name("orders/list")
///     .build()?;
///
/// let response = client.round_trip(br#"{"page":1}"#.to_vec()).await?;
///
/// println!("Got {} bytes in {:?}", response.data.len(), response.latency);
/// println!("Content-Type: {:?}", response.header("content-type"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response body.
    pub data: T,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(data: T, status: StatusCode, headers: HeaderMap, latency: Duration) -> Self {
        Self {
            data,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type using the provided function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use soapbus::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     b"42".to_vec(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let text = response.map(|bytes| String::from_utf8(bytes).unwrap());
    /// assert_eq!(text.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns a reference to a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use soapbus::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("text/xml"));
    ///
    /// let response = Response::new((), StatusCode::OK, headers, Duration::from_millis(100));
    ///
    /// assert_eq!(response.header("content-type").unwrap(), "text/xml");
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Consumes the response and returns the decoded data.
    pub fn into_inner(self) -> T {
        self.data
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
