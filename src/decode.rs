//! Reading the body of a response envelope.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The response side of an envelope. Elements are matched by local name, so
/// `soap:Body`, `soapenv:Body` and a bare `Body` all bind. Anything else,
/// such as a header, is ignored.
#[derive(Deserialize)]
#[serde(rename = "Envelope")]
struct ResponseEnvelope<T> {
    #[serde(rename = "Body")]
    body: T,
}

/// Decodes an envelope and returns its body as `T`.
///
/// Returns the decoder's message when the document is not well-formed or the
/// body does not fit `T`.
pub(crate) fn decode_envelope<T: DeserializeOwned>(xml: &[u8]) -> Result<T, String> {
    let envelope: ResponseEnvelope<T> =
        quick_xml::de::from_reader(xml).map_err(|e| e.to_string())?;
    Ok(envelope.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct GetUserResponse {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Role", default)]
        roles: Vec<String>,
    }

    #[test]
    fn test_decodes_body_and_skips_header() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
            <soap:Header><Session>abc</Session></soap:Header>
            <soap:Body><Name>Alice</Name><Role>admin</Role><Role>ops</Role></soap:Body>
        </soap:Envelope>"#;

        let decoded: GetUserResponse = decode_envelope(xml.as_bytes()).unwrap();
        assert_eq!(
            decoded,
            GetUserResponse {
                name: "Alice".to_string(),
                roles: vec!["admin".to_string(), "ops".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let xml = "<Envelope><Header/></Envelope>";
        let err = decode_envelope::<GetUserResponse>(xml.as_bytes()).unwrap_err();
        assert!(err.contains("Body"), "unexpected error: {}", err);
    }

    #[test]
    fn test_body_shape_mismatch_is_an_error() {
        let xml = "<Envelope><Body><Other>1</Other></Body></Envelope>";
        assert!(decode_envelope::<GetUserResponse>(xml.as_bytes()).is_err());
    }
}
