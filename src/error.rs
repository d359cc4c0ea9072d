//! Error types for SOAP and bus round-trips.
//!
//! Every failure of a round-trip surfaces as an [`Error`]. Non-200 responses are
//! reported as [`Error::Http`] carrying an [`HttpError`], so callers can branch on
//! the status code without parsing strings.

use http::{HeaderMap, StatusCode};

/// A non-200 HTTP response.
///
/// The message is an excerpt of the response body, capped at
/// [`MAX_ERROR_BODY_BYTES`](crate::MAX_ERROR_BODY_BYTES).
///
/// # Examples
///
/// ```
/// use soapbus::HttpError;
/// use http::{HeaderMap, StatusCode};
///
/// let err = HttpError {
///     status_code: StatusCode::INTERNAL_SERVER_ERROR,
///     status: "500 Internal Server Error".to_string(),
///     message: "internal error".to_string(),
///     headers: HeaderMap::new(),
/// };
///
/// assert_eq!(err.to_string(), r#""500 Internal Server Error": "internal error""#);
/// ```
#[derive(thiserror::Error, Debug, Clone)]
#[error("{status:?}: {message:?}")]
pub struct HttpError {
    /// The HTTP status code.
    pub status_code: StatusCode,
    /// The status line text, e.g. `500 Internal Server Error`.
    pub status: String,
    /// The first bytes of the response body.
    pub message: String,
    /// The response headers.
    pub headers: HeaderMap,
}

/// The main error type for round-trips.
///
/// # Examples
///
/// ```no_run
/// use soapbus::{Error, SoapClient};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct GetUser {
///     #[serde(rename = "Id")]
///     id: u32,
/// }
/// soapbus::xml_typed!(GetUser);
///
/// #[derive(Deserialize)]
/// struct GetUserResponse {
///     #[serde(rename = "Name")]
///     name: String,
/// }
///
/// # async fn example() -> Result<(), Error> {
/// let client = SoapClient::builder().url("https://soap.example.com/users")?.build()?;
///
/// match client.round_trip::<_, GetUserResponse>(&mut GetUser { id: 7 }).await {
///     Ok(response) => println!("Name: {}", response.data.name),
///     Err(Error::Http(err)) if err.status_code.as_u16() == 404 => eprintln!("no such user"),
///     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
///         eprintln!("Bad envelope: {}", serde_error);
///         eprintln!("  Raw response: {}", raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS lookup failed, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a status other than `200 OK`.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Failed to decode the response body into the destination type.
    ///
    /// The raw body is preserved for debugging.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The decoder's error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Invalid configuration was provided, such as a malformed header value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to encode the request payload.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Builds the error for a failed exchange, separating client timeouts
    /// from other network failures.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }

    /// Returns the HTTP status code if this error has one.
    ///
    /// Returns `Some(status)` for `Http` and `DeserializationFailed` errors,
    /// `None` for other error types.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http(err) => Some(err.status_code),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the response body (or body excerpt) if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Http(err) => Some(&err.message),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the [`HttpError`] if the server answered with a non-200 status.
    pub fn http_error(&self) -> Option<&HttpError> {
        match self {
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

/// A specialized `Result` type for round-trips.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(code: u16, message: &str) -> Error {
        let status_code = StatusCode::from_u16(code).unwrap();
        Error::Http(HttpError {
            status_code,
            status: status_code.to_string(),
            message: message.to_string(),
            headers: HeaderMap::new(),
        })
    }

    #[test]
    fn test_http_error_display_quotes_both_parts() {
        let err = http_error(503, "down \"for\" maintenance");
        assert_eq!(
            err.to_string(),
            r#""503 Service Unavailable": "down \"for\" maintenance""#
        );
    }

    #[test]
    fn test_accessors() {
        let err = http_error(500, "boom");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.raw_response(), Some("boom"));
        assert_eq!(err.http_error().map(|e| e.status_code.as_u16()), Some(500));

        let err = Error::DeserializationFailed {
            raw_response: "<x/>".to_string(),
            serde_error: "missing field `Body`".to_string(),
            status: StatusCode::OK,
        };
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert_eq!(err.raw_response(), Some("<x/>"));
        assert!(err.http_error().is_none());

        let err = Error::Timeout;
        assert_eq!(err.status(), None);
        assert_eq!(err.raw_response(), None);
    }
}
