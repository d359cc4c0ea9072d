//! The SOAP envelope written around every request payload.

use serde::Serialize;

/// Default namespace of the `soapenv` prefix (SOAP 1.1).
pub const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// The XML Schema instance namespace, always declared as `xsi`.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// The XML Schema namespace, declared as `xsd` when enabled on the client.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// A SOAP envelope borrowing its header and body.
///
/// Serializes as:
///
/// ```text
/// <soapenv:Envelope xmlns:soapenv=".." [xmlns:tns=".."] [xmlns:xsd=".."] xmlns:xsi="..">
///   [<soapenv:Header>..</soapenv:Header>]
///   <soapenv:Body>..</soapenv:Body>
/// </soapenv:Envelope>
/// ```
///
/// The body payload's fields become the children of `soapenv:Body`.
#[derive(Serialize)]
#[serde(rename = "soapenv:Envelope")]
pub struct Envelope<'a, H, B> {
    #[serde(rename = "@xmlns:soapenv")]
    pub envelope_attr: &'a str,
    #[serde(rename = "@xmlns:tns", skip_serializing_if = "Option::is_none")]
    pub tns_attr: Option<&'a str>,
    #[serde(rename = "@xmlns:xsd", skip_serializing_if = "Option::is_none")]
    pub xsd_attr: Option<&'static str>,
    #[serde(rename = "@xmlns:xsi")]
    pub xsi_attr: &'static str,
    #[serde(rename = "soapenv:Header", skip_serializing_if = "Option::is_none")]
    pub header: Option<&'a H>,
    #[serde(rename = "soapenv:Body")]
    pub body: &'a B,
}

impl<'a, H, B> Envelope<'a, H, B> {
    /// Wraps `body` in an envelope.
    ///
    /// An empty `envelope_namespace` falls back to
    /// [`SOAP_ENVELOPE_NAMESPACE`]; an empty `this_namespace` leaves the
    /// `xmlns:tns` attribute out entirely.
    pub fn new(
        envelope_namespace: &'a str,
        this_namespace: &'a str,
        declare_xsd: bool,
        header: Option<&'a H>,
        body: &'a B,
    ) -> Self {
        let envelope_attr = if envelope_namespace.is_empty() {
            SOAP_ENVELOPE_NAMESPACE
        } else {
            envelope_namespace
        };

        Self {
            envelope_attr,
            tns_attr: (!this_namespace.is_empty()).then_some(this_namespace),
            xsd_attr: declare_xsd.then_some(XSD_NAMESPACE),
            xsi_attr: XSI_NAMESPACE,
            header,
            body,
        }
    }
}

impl<H: Serialize, B: Serialize> Envelope<'_, H, B> {
    /// Serializes the envelope to an XML document.
    pub fn to_xml(&self) -> crate::Result<String> {
        quick_xml::se::to_string(self)
            .map_err(|e| crate::Error::SerializationFailed(e.to_string()))
    }
}

/// A header carrying a username and password.
///
/// ```
/// use soapbus::AuthHeader;
///
/// let header = AuthHeader::new("urn:auth", "bob", "secret");
/// assert_eq!(header.username, "bob");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuthHeader {
    #[serde(rename = "@xmlns:ns")]
    pub namespace: String,
    #[serde(rename = "ns:username")]
    pub username: String,
    #[serde(rename = "ns:password")]
    pub password: String,
}

impl AuthHeader {
    pub fn new(
        namespace: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}
