//! Bus client: raw byte payloads, usually JSON, POSTed to `base_url + method`.

use crate::{
    action::{header_value, HeaderStrategy},
    transport::{Exchange, Hooks},
    Error, Response, Result,
};
use http::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, HOST, USER_AGENT,
};
use http::{HeaderMap, HeaderName};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A client for the bus variant.
///
/// Requests and responses are opaque bytes; no envelope is built or
/// unwrapped. The target URL is the plain concatenation of the base URL and
/// the method name.
///
/// # Examples
///
/// ```no_run
/// use soapbus::BusClient;
///
/// # async fn example() -> Result<(), soapbus::Error> {
/// let client = BusClient::builder()
///     .base_url("http://bus.internal/")
///     .method_name("api/call")
///     .user_agent("billing/1.0")
///     .build()?;
///
/// // POST http://bus.internal/api/call
/// let response = client.round_trip(br#"{"a":1}"#.to_vec()).await?;
/// println!("{}", String::from_utf8_lossy(&response.data));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BusClient {
    inner: Arc<BusConfig>,
}

struct BusConfig {
    http_client: reqwest::Client,
    base_url: String,
    method_name: String,
    content_type: Option<String>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    hooks: Hooks,
}

impl BusClient {
    /// Creates a new `BusClientBuilder` for configuring a client.
    pub fn builder() -> BusClientBuilder {
        BusClientBuilder::new()
    }

    /// POSTs `body` to the configured method and returns the response body
    /// verbatim.
    pub async fn round_trip(&self, body: impl Into<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        self.execute(&self.inner.method_name, body.into()).await
    }

    /// Like [`round_trip`](Self::round_trip), but calls `method` instead of
    /// the configured method name.
    pub async fn round_trip_method(
        &self,
        method: &str,
        body: impl Into<Vec<u8>>,
    ) -> Result<Response<Vec<u8>>> {
        self.execute(method, body.into()).await
    }

    /// Serializes `request` as JSON, performs a round-trip on the configured
    /// method and decodes the JSON response.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use soapbus::BusClient;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Serialize)]
    /// struct Query { a: u32 }
    ///
    /// #[derive(Deserialize)]
    /// struct Answer { sum: u32 }
    ///
    /// # async fn example() -> Result<(), soapbus::Error> {
    /// let client = BusClient::builder()
    ///     .base_url("http://bus.internal/")
    ///     .method_name("math/add")
    ///     .build()?;
    ///
    /// let answer = client.call_json::<_, Answer>(&Query { a: 1 }).await?;
    /// println!("sum = {}", answer.data.sum);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call_json<Req, Res>(&self, request: &Req) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let body =
            serde_json::to_vec(request).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        let response = self.round_trip(body).await?;

        match serde_json::from_slice::<Res>(&response.data) {
            Ok(data) => Ok(Response::new(
                data,
                response.status,
                response.headers,
                response.latency,
            )),
            Err(e) => {
                let raw_response = String::from_utf8_lossy(&response.data).into_owned();
                tracing::error!(
                    error = %e,
                    raw_response = %raw_response,
                    "Failed to deserialize response"
                );

                Err(Error::DeserializationFailed {
                    raw_response,
                    serde_error: e.to_string(),
                    status: response.status,
                })
            }
        }
    }

    async fn execute(&self, method: &str, body: Vec<u8>) -> Result<Response<Vec<u8>>> {
        let config = &*self.inner;
        let url = Url::parse(&format!("{}{}", config.base_url, method))?;

        let start_time = Instant::now();
        let exchange = Exchange {
            http: &config.http_client,
            url,
            default_headers: &config.default_headers,
            strategy: HeaderStrategy::Bus,
            content_type: config.content_type.as_deref(),
            timeout: config.timeout,
            hooks: &config.hooks,
        };
        let response = exchange.send(body).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let data = response.bytes().await.map_err(Error::from_transport)?;

        Ok(Response::new(
            data.to_vec(),
            status,
            headers,
            start_time.elapsed(),
        ))
    }
}

/// Builder for configuring and creating a [`BusClient`].
///
/// The header settings (user agent, host, accept family, cache control) are
/// only sent when set. Keep-alive is on by default and is sent as
/// `Connection: keep-alive`; turning it off sends `Connection: close`.
pub struct BusClientBuilder {
    base_url: String,
    method_name: String,
    content_type: Option<String>,
    user_agent: Option<String>,
    host: Option<String>,
    accept: Option<String>,
    accept_encoding: Option<String>,
    accept_language: Option<String>,
    cache_control: Option<String>,
    keepalive: bool,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    hooks: Hooks,
}

impl BusClientBuilder {
    /// Creates a new `BusClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: String::new(),
            method_name: String::new(),
            content_type: None,
            user_agent: None,
            host: None,
            accept: None,
            accept_encoding: None,
            accept_language: None,
            cache_control: None,
            keepalive: true,
            http_client: None,
            timeout: None,
            hooks: Hooks::default(),
        }
    }

    /// Sets the base URL. The method name is appended to it as-is, so it
    /// usually ends with `/`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the method called by [`BusClient::round_trip`].
    pub fn method_name(mut self, method: impl Into<String>) -> Self {
        self.method_name = method.into();
        self
    }

    /// Overrides the Content-Type, which defaults to `application/json`.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn accept_encoding(mut self, accept_encoding: impl Into<String>) -> Self {
        self.accept_encoding = Some(accept_encoding.into());
        self
    }

    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = Some(accept_language.into());
        self
    }

    pub fn cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }

    pub fn keepalive(mut self, keepalive: bool) -> Self {
        self.keepalive = keepalive;
        self
    }

    /// Uses the given HTTP client instead of a default one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a hook that may modify every request right before it is sent.
    pub fn pre_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut reqwest::Request) + Send + Sync + 'static,
    {
        self.hooks.pre = Some(Arc::new(hook));
        self
    }

    /// Sets a hook that sees every response before its status is checked.
    pub fn post_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&reqwest::Response) + Send + Sync + 'static,
    {
        self.hooks.post = Some(Arc::new(hook));
        self
    }

    /// Builds the configured `BusClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if a header setting is not a valid header value or
    /// the default HTTP client could not be built.
    pub fn build(self) -> Result<BusClient> {
        let mut default_headers = HeaderMap::new();
        let settings: [(HeaderName, &Option<String>); 6] = [
            (USER_AGENT, &self.user_agent),
            (HOST, &self.host),
            (ACCEPT, &self.accept),
            (ACCEPT_ENCODING, &self.accept_encoding),
            (ACCEPT_LANGUAGE, &self.accept_language),
            (CACHE_CONTROL, &self.cache_control),
        ];
        for (name, value) in settings {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                default_headers.insert(name, header_value(value)?);
            }
        }
        let connection = if self.keepalive { "keep-alive" } else { "close" };
        default_headers.insert(CONNECTION, header_value(connection)?);

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        Ok(BusClient {
            inner: Arc::new(BusConfig {
                http_client,
                base_url: self.base_url,
                method_name: self.method_name,
                content_type: self.content_type,
                default_headers,
                timeout: self.timeout,
                hooks: self.hooks,
            }),
        })
    }
}

impl Default for BusClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_settings_become_default_headers() {
        let client = BusClient::builder()
            .base_url("http://host/")
            .user_agent("billing/1.0")
            .cache_control("no-cache")
            .accept("")
            .keepalive(false)
            .build()
            .unwrap();

        let headers = &client.inner.default_headers;
        assert_eq!(headers.get(USER_AGENT).unwrap(), "billing/1.0");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-cache");
        assert_eq!(headers.get(CONNECTION).unwrap(), "close");
        assert!(headers.get(ACCEPT).is_none());
        assert!(headers.get(HOST).is_none());
    }

    #[test]
    fn test_keepalive_by_default() {
        let client = BusClient::builder().build().unwrap();
        assert_eq!(
            client.inner.default_headers.get(CONNECTION).unwrap(),
            "keep-alive"
        );
    }

    #[test]
    fn test_invalid_header_setting() {
        let result = BusClient::builder().user_agent("bad\r\nagent").build();
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }
}
