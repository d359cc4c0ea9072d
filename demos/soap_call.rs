//! Calls a public SOAP 1.1 service and a SOAP 1.2 endpoint.
//!
//! This example shows how to:
//! - Build a client with a target namespace and hooks
//! - Let the SOAPAction be derived from the request type
//! - Name the action explicitly for SOAP 1.2
//! - Branch on HTTP status errors
//!
//! Run with: `cargo run --example soap_call`

use serde::{Deserialize, Serialize};
use soapbus::{xml_typed, Error, SoapClient};

/// The content of `soapenv:Body`; its type name is the SOAP 1.1 action.
#[derive(Debug, Serialize)]
struct NumberToWords {
    #[serde(rename = "NumberToWords")]
    call: NumberToWordsCall,
}

#[derive(Debug, Serialize)]
struct NumberToWordsCall {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "ubiNum")]
    ubi_num: u64,
}

impl NumberToWords {
    fn new(number: u64) -> Self {
        Self {
            call: NumberToWordsCall {
                xmlns: SERVICE_NAMESPACE,
                ubi_num: number,
            },
        }
    }
}

xml_typed!(NumberToWords);

#[derive(Debug, Deserialize)]
struct NumberToWordsResponse {
    #[serde(rename = "NumberToWordsResponse")]
    inner: NumberToWordsResult,
}

#[derive(Debug, Deserialize)]
struct NumberToWordsResult {
    #[serde(rename = "NumberToWordsResult")]
    words: String,
}

const SERVICE_NAMESPACE: &str = "http://www.dataaccess.com/webservicesserver/";

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("soapbus=debug,soap_call=info")
        .init();

    let client = SoapClient::builder()
        .url("https://www.dataaccess.com/webservicesserver/NumberConversion.wso")?
        .this_namespace(SERVICE_NAMESPACE)
        .exclude_action_namespace(true)
        .post_hook(|response| {
            tracing::info!(status = %response.status(), "service answered");
        })
        .build()?;

    println!("=== SOAP 1.1 ===");
    let mut request = NumberToWords::new(1234);
    let response = client
        .round_trip::<_, NumberToWordsResponse>(&mut request)
        .await?;
    println!("1234 = {}", response.data.inner.words.trim());
    println!("Request latency: {:?}", response.latency);
    println!();

    println!("=== SOAP 1.2 ===");
    let soap12 = SoapClient::builder()
        .url("https://www.dataaccess.com/webservicesserver/NumberConversion.wso")?
        .envelope_namespace("http://www.w3.org/2003/05/soap-envelope")
        .build()?;

    let mut request = NumberToWords::new(42);
    match soap12
        .round_trip_soap12::<_, NumberToWordsResponse>("NumberToWords", &mut request)
        .await
    {
        Ok(response) => println!("42 = {}", response.data.inner.words.trim()),
        Err(Error::Http(err)) => {
            eprintln!("HTTP {}: {}", err.status_code, err.message);
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
