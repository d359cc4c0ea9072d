//! Content-Type and SOAPAction header conventions.

use crate::{Error, Result};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};

/// Default content type when the action is derived from the payload type.
pub const SOAP11_CONTENT_TYPE: &str = "text/xml;charset=utf-8";

/// Default content type when the caller names the action.
pub const SOAP11_EXPLICIT_CONTENT_TYPE: &str = "text/xml";

/// Default content type of bus requests.
pub const BUS_CONTENT_TYPE: &str = "application/json";

/// The SOAP 1.1 action header.
pub static SOAP_ACTION: HeaderName = HeaderName::from_static("soapaction");

/// How a request announces its content type and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderStrategy {
    /// SOAP 1.1 with the action derived from the payload type. Overwrites
    /// any SOAPAction already present.
    Implicit { action: String },
    /// SOAP 1.1 with a caller-supplied action. Appends to any SOAPAction
    /// already present.
    Explicit { action: String },
    /// SOAP 1.2: the action travels as a Content-Type parameter.
    Soap12 { action: String },
    /// Raw bus payloads.
    Bus,
}

impl HeaderStrategy {
    /// Sets this strategy's headers. A non-empty `content_type` replaces the
    /// default, except for SOAP 1.2 whose content type carries the action.
    pub(crate) fn apply(&self, content_type: Option<&str>, headers: &mut HeaderMap) -> Result<()> {
        let resolve = |default: &'static str| {
            header_value(content_type.filter(|ct| !ct.is_empty()).unwrap_or(default))
        };

        match self {
            HeaderStrategy::Implicit { action } => {
                headers.insert(CONTENT_TYPE, resolve(SOAP11_CONTENT_TYPE)?);
                headers.insert(SOAP_ACTION.clone(), header_value(action)?);
            }
            HeaderStrategy::Explicit { action } => {
                headers.insert(CONTENT_TYPE, resolve(SOAP11_EXPLICIT_CONTENT_TYPE)?);
                headers.append(SOAP_ACTION.clone(), header_value(action)?);
            }
            HeaderStrategy::Soap12 { action } => {
                let value = format!("application/soap+xml; charset=utf-8; action=\"{}\"", action);
                headers.insert(CONTENT_TYPE, header_value(&value)?);
            }
            HeaderStrategy::Bus => {
                headers.insert(CONTENT_TYPE, resolve(BUS_CONTENT_TYPE)?);
            }
        }

        Ok(())
    }
}

/// Joins an action name to its namespace as `namespace/name`, unless the
/// namespace is excluded.
pub(crate) fn qualify(namespace: &str, name: &str, exclude_namespace: bool) -> String {
    if exclude_namespace {
        name.to_string()
    } else {
        format!("{}/{}", namespace, name)
    }
}

/// Returns the bare name of `T`, without module path or generic arguments.
///
/// ```
/// struct GetUser;
/// assert_eq!(soapbus::action_name::<GetUser>(), "GetUser");
/// assert_eq!(soapbus::action_name::<Vec<GetUser>>(), "Vec");
/// ```
pub fn action_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

pub(crate) fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::try_from(name)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GetUser;

    mod nested {
        pub struct Lookup<T>(pub T);
    }

    fn values<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Vec<&'a str> {
        headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn test_action_name() {
        assert_eq!(action_name::<GetUser>(), "GetUser");
        assert_eq!(action_name::<nested::Lookup<GetUser>>(), "Lookup");
        assert_eq!(action_name::<String>(), "String");
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("urn:service", "GetUser", false), "urn:service/GetUser");
        assert_eq!(qualify("urn:service", "GetUser", true), "GetUser");
        assert_eq!(qualify("", "GetUser", false), "/GetUser");
    }

    #[test]
    fn test_implicit_overwrites_action() {
        let mut headers = HeaderMap::new();
        headers.insert(SOAP_ACTION.clone(), HeaderValue::from_static("stale"));

        HeaderStrategy::Implicit {
            action: "urn:service/GetUser".to_string(),
        }
        .apply(None, &mut headers)
        .unwrap();

        assert_eq!(values(&headers, &CONTENT_TYPE), vec![SOAP11_CONTENT_TYPE]);
        assert_eq!(values(&headers, &SOAP_ACTION), vec!["urn:service/GetUser"]);
    }

    #[test]
    fn test_explicit_appends_action() {
        let mut headers = HeaderMap::new();
        headers.insert(SOAP_ACTION.clone(), HeaderValue::from_static("first"));

        HeaderStrategy::Explicit {
            action: "urn:ns/Second".to_string(),
        }
        .apply(Some(""), &mut headers)
        .unwrap();

        assert_eq!(values(&headers, &CONTENT_TYPE), vec![SOAP11_EXPLICIT_CONTENT_TYPE]);
        assert_eq!(values(&headers, &SOAP_ACTION), vec!["first", "urn:ns/Second"]);
    }

    #[test]
    fn test_soap12_embeds_action_in_content_type() {
        let mut headers = HeaderMap::new();
        HeaderStrategy::Soap12 {
            action: "urn:ns/Op".to_string(),
        }
        .apply(Some("text/plain"), &mut headers)
        .unwrap();

        assert_eq!(
            values(&headers, &CONTENT_TYPE),
            vec![r#"application/soap+xml; charset=utf-8; action="urn:ns/Op""#]
        );
        assert!(headers.get(&SOAP_ACTION).is_none());
    }

    #[test]
    fn test_soap12_replaces_existing_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));
        HeaderStrategy::Soap12 {
            action: "urn:ns/Op".to_string(),
        }
        .apply(None, &mut headers)
        .unwrap();

        assert_eq!(
            values(&headers, &CONTENT_TYPE),
            vec![r#"application/soap+xml; charset=utf-8; action="urn:ns/Op""#]
        );
    }

    #[test]
    fn test_content_type_override() {
        let mut headers = HeaderMap::new();
        HeaderStrategy::Bus
            .apply(Some("application/octet-stream"), &mut headers)
            .unwrap();
        assert_eq!(values(&headers, &CONTENT_TYPE), vec!["application/octet-stream"]);

        let mut headers = HeaderMap::new();
        HeaderStrategy::Bus.apply(None, &mut headers).unwrap();
        assert_eq!(values(&headers, &CONTENT_TYPE), vec![BUS_CONTENT_TYPE]);
    }

    #[test]
    fn test_invalid_action_is_rejected() {
        let mut headers = HeaderMap::new();
        let result = HeaderStrategy::Explicit {
            action: "bad\naction".to_string(),
        }
        .apply(None, &mut headers);

        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }
}
