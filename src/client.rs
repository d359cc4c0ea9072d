//! SOAP client and its builder.
//!
//! The [`SoapClient`] type is the main entry point for SOAP round-trips.
//! Use [`SoapClientBuilder`] to configure and create clients.

use crate::{
    action::{action_name, header_name, header_value, qualify, HeaderStrategy},
    decode::decode_envelope,
    envelope::Envelope,
    transport::{Exchange, Hooks},
    typing::{set_xml_types, XmlTyped},
    Error, Response, Result,
};
use http::HeaderMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A SOAP client.
///
/// Every round-trip wraps the request in an envelope, POSTs it to the
/// configured URL and decodes the `Body` of the response envelope. The
/// client is cheap to clone and is meant to be reused; its configuration
/// never changes after [`SoapClientBuilder::build`].
///
/// `H` is the type of the optional envelope header.
///
/// # Examples
///
/// ```no_run
/// use soapbus::{xml_typed, SoapClient};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct GetUser {
///     #[serde(rename = "tns:Id")]
///     id: u32,
/// }
/// xml_typed!(GetUser);
///
/// #[derive(Deserialize)]
/// struct GetUserResponse {
///     #[serde(rename = "Name")]
///     name: String,
/// }
///
/// # async fn example() -> Result<(), soapbus::Error> {
/// let client = SoapClient::builder()
///     .url("https://soap.example.com/users")?
///     .this_namespace("urn:users")
///     .build()?;
///
/// // Sent with `SOAPAction: urn:users/GetUser`.
/// let user = client
///     .round_trip::<_, GetUserResponse>(&mut GetUser { id: 7 })
///     .await?;
/// println!("User: {}", user.data.name);
/// # Ok(())
/// # }
/// ```
pub struct SoapClient<H = ()> {
    inner: Arc<ClientConfig<H>>,
}

impl<H> Clone for SoapClient<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ClientConfig<H> {
    http_client: reqwest::Client,
    url: Url,
    namespace: String,
    this_namespace: String,
    exclude_action_namespace: bool,
    envelope_namespace: String,
    declare_xsd: bool,
    header: Option<H>,
    content_type: Option<String>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    hooks: Hooks,
}

impl SoapClient {
    /// Creates a new `SoapClientBuilder` for configuring a client.
    pub fn builder() -> SoapClientBuilder {
        SoapClientBuilder::new()
    }
}

impl<H: Serialize> SoapClient<H> {
    /// Performs a SOAP 1.1 round-trip, deriving the action from the request
    /// type.
    ///
    /// The SOAPAction header is `{this_namespace}/{TypeName}`, or just
    /// `TypeName` when the action namespace is excluded. Content-Type
    /// defaults to `text/xml;charset=utf-8`.
    ///
    /// `request` is walked with [`set_xml_types`] before it is serialized,
    /// which may modify it.
    ///
    /// A `200 OK` body is read fully into memory before it is decoded, so its
    /// size is not bounded. Only error bodies are capped, at
    /// [`MAX_ERROR_BODY_BYTES`](crate::MAX_ERROR_BODY_BYTES).
    pub async fn round_trip<Req, Res>(&self, request: &mut Req) -> Result<Response<Res>>
    where
        Req: Serialize + XmlTyped,
        Res: DeserializeOwned,
    {
        let action = qualify(
            &self.inner.this_namespace,
            action_name::<Req>(),
            self.inner.exclude_action_namespace,
        );
        self.execute(HeaderStrategy::Implicit { action }, request)
            .await
    }

    /// Performs a SOAP 1.1 round-trip with a caller-supplied action.
    ///
    /// The SOAPAction header is `{namespace}/{action}`, or just `action` when
    /// the action namespace is excluded, and is appended to any SOAPAction
    /// already present on the request. Content-Type defaults to `text/xml`.
    pub async fn round_trip_with_action<Req, Res>(
        &self,
        action: &str,
        request: &mut Req,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + XmlTyped,
        Res: DeserializeOwned,
    {
        let action = qualify(
            &self.inner.namespace,
            action,
            self.inner.exclude_action_namespace,
        );
        self.execute(HeaderStrategy::Explicit { action }, request)
            .await
    }

    /// Performs a SOAP 1.2 round-trip.
    ///
    /// No SOAPAction header is sent; the action is a parameter of the
    /// Content-Type, `application/soap+xml; charset=utf-8; action="{action}"`.
    /// That value replaces any Content-Type from the client's defaults.
    pub async fn round_trip_soap12<Req, Res>(
        &self,
        action: &str,
        request: &mut Req,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + XmlTyped,
        Res: DeserializeOwned,
    {
        let strategy = HeaderStrategy::Soap12 {
            action: action.to_string(),
        };
        self.execute(strategy, request).await
    }

    async fn execute<Req, Res>(
        &self,
        strategy: HeaderStrategy,
        request: &mut Req,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + XmlTyped,
        Res: DeserializeOwned,
    {
        let config = &*self.inner;

        let tagged = set_xml_types(request);
        let xml = Envelope::new(
            &config.envelope_namespace,
            &config.this_namespace,
            config.declare_xsd,
            config.header.as_ref(),
            &*request,
        )
        .to_xml()?;

        tracing::debug!(
            tagged = tagged,
            bytes = xml.len(),
            "Serialized SOAP envelope"
        );

        let start_time = Instant::now();
        let exchange = Exchange {
            http: &config.http_client,
            url: config.url.clone(),
            default_headers: &config.default_headers,
            strategy,
            content_type: config.content_type.as_deref(),
            timeout: config.timeout,
            hooks: &config.hooks,
        };
        let response = exchange.send(xml.into_bytes()).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::from_transport)?;
        let latency = start_time.elapsed();

        match decode_envelope::<Res>(&body) {
            Ok(data) => Ok(Response::new(data, status, headers, latency)),
            Err(serde_error) => {
                let raw_response = String::from_utf8_lossy(&body).into_owned();
                tracing::error!(
                    error = %serde_error,
                    raw_response = %raw_response,
                    "Failed to deserialize response envelope"
                );

                Err(Error::DeserializationFailed {
                    raw_response,
                    serde_error,
                    status,
                })
            }
        }
    }
}

/// Builder for configuring and creating a [`SoapClient`].
///
/// # Examples
///
/// ```no_run
/// use soapbus::{AuthHeader, SoapClientBuilder};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), soapbus::Error> {
/// let client = SoapClientBuilder::new()
///     .url("https://soap.example.com/billing")?
///     .namespace("http://example.com/billing")
///     .this_namespace("http://example.com/billing/types")
///     .header(AuthHeader::new("http://example.com/auth", "bob", "secret"))
///     .timeout(Duration::from_secs(30))
///     .pre_hook(|request| {
///         request
///             .headers_mut()
///             .insert("x-request-id", http::HeaderValue::from_static("42"));
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SoapClientBuilder<H = ()> {
    url: Option<Url>,
    namespace: String,
    this_namespace: String,
    exclude_action_namespace: bool,
    envelope_namespace: String,
    declare_xsd: bool,
    header: Option<H>,
    content_type: Option<String>,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
    hooks: Hooks,
}

impl SoapClientBuilder {
    /// Creates a new `SoapClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            url: None,
            namespace: String::new(),
            this_namespace: String::new(),
            exclude_action_namespace: false,
            envelope_namespace: String::new(),
            declare_xsd: false,
            header: None,
            content_type: None,
            http_client: None,
            timeout: None,
            default_headers: HeaderMap::new(),
            hooks: Hooks::default(),
        }
    }
}

impl Default for SoapClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SoapClientBuilder<H> {
    /// Sets the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the namespace that prefixes explicit actions.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the target namespace. It prefixes implicit actions and, when
    /// non-empty, is declared on the envelope as `xmlns:tns`.
    pub fn this_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.this_namespace = namespace.into();
        self
    }

    /// Sends bare action names, without any namespace prefix.
    pub fn exclude_action_namespace(mut self, exclude: bool) -> Self {
        self.exclude_action_namespace = exclude;
        self
    }

    /// Overrides the `xmlns:soapenv` namespace, which defaults to
    /// [`SOAP_ENVELOPE_NAMESPACE`](crate::SOAP_ENVELOPE_NAMESPACE).
    pub fn envelope_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.envelope_namespace = namespace.into();
        self
    }

    /// Declares the XML Schema namespace as `xmlns:xsd` on the envelope.
    pub fn declare_xsd(mut self, declare: bool) -> Self {
        self.declare_xsd = declare;
        self
    }

    /// Sets the header written into every envelope.
    pub fn header<H2: Serialize>(self, header: H2) -> SoapClientBuilder<H2> {
        SoapClientBuilder {
            url: self.url,
            namespace: self.namespace,
            this_namespace: self.this_namespace,
            exclude_action_namespace: self.exclude_action_namespace,
            envelope_namespace: self.envelope_namespace,
            declare_xsd: self.declare_xsd,
            header: Some(header),
            content_type: self.content_type,
            http_client: self.http_client,
            timeout: self.timeout,
            default_headers: self.default_headers,
            hooks: self.hooks,
        }
    }

    /// Overrides the Content-Type of SOAP 1.1 requests.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
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

    /// Adds a header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = header_name(name.as_ref())?;
        let value = header_value(value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
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

    /// Builds the configured `SoapClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL was provided or the default HTTP client
    /// could not be built.
    pub fn build(self) -> Result<SoapClient<H>> {
        let url = self
            .url
            .ok_or_else(|| Error::ConfigurationError("URL is required".to_string()))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        Ok(SoapClient {
            inner: Arc::new(ClientConfig {
                http_client,
                url,
                namespace: self.namespace,
                this_namespace: self.this_namespace,
                exclude_action_namespace: self.exclude_action_namespace,
                envelope_namespace: self.envelope_namespace,
                declare_xsd: self.declare_xsd,
                header: self.header,
                content_type: self.content_type,
                default_headers: self.default_headers,
                timeout: self.timeout,
                hooks: self.hooks,
            }),
        })
    }
}
