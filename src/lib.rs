//! # soapbus - SOAP and bus round-trips over HTTP
//!
//! soapbus is a client-side transport helper built on top of `reqwest`. A
//! SOAP round-trip serializes a request payload into an envelope, POSTs it,
//! and decodes the response envelope's `Body` into a typed value. The bus
//! variant does the same for raw byte payloads, usually JSON, without any
//! envelope.
//!
//! ## Quick Start
//!
//! ```no_run
//! use soapbus::{xml_typed, SoapClient};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct GetUser {
//!     #[serde(rename = "Name")]
//!     name: String,
//! }
//! xml_typed!(GetUser { name });
//!
//! #[derive(Deserialize)]
//! struct GetUserResponse {
//!     #[serde(rename = "Name")]
//!     name: String,
//!     #[serde(rename = "Email")]
//!     email: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), soapbus::Error> {
//!     let client = SoapClient::builder()
//!         .url("https://soap.example.com/users")?
//!         .this_namespace("urn:service")
//!         .build()?;
//!
//!     let mut request = GetUser { name: "Alice".to_string() };
//!
//!     // SOAPAction: urn:service/GetUser
//!     let user = client.round_trip::<_, GetUserResponse>(&mut request).await?;
//!     println!("{} <{}>", user.data.name, user.data.email);
//!     println!("Request took {:?}", user.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Actions
//!
//! Three entry points share one exchange and differ only in headers:
//!
//! - [`SoapClient::round_trip`] derives the SOAPAction from the request type.
//! - [`SoapClient::round_trip_with_action`] takes the action from the caller.
//! - [`SoapClient::round_trip_soap12`] sends the action inside the SOAP 1.2
//!   Content-Type.
//!
//! ## Error Handling
//!
//! Only `200 OK` counts as success. Any other status becomes
//! [`Error::Http`], which carries the status code, the status text and at most
//! [`MAX_ERROR_BODY_BYTES`] of the body:
//!
//! ```no_run
//! use soapbus::{BusClient, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = BusClient::builder().base_url("http://bus/").method_name("x").build()?;
//! match client.round_trip(b"{}".to_vec()).await {
//!     Ok(response) => println!("{} bytes", response.data.len()),
//!     Err(Error::Http(err)) => eprintln!("HTTP {}: {}", err.status_code, err.message),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Type tagging
//!
//! Requests implement [`XmlTyped`] so that nested values implementing
//! [`XmlTyper`] can set their own `xsi:type` before serialization. See the
//! [`typing`] module.

mod action;
mod bus;
mod client;
mod decode;
mod envelope;
mod error;
mod response;
mod transport;
pub mod typing;

pub use action::{
    action_name, BUS_CONTENT_TYPE, SOAP11_CONTENT_TYPE, SOAP11_EXPLICIT_CONTENT_TYPE, SOAP_ACTION,
};
pub use bus::{BusClient, BusClientBuilder};
pub use client::{SoapClient, SoapClientBuilder};
pub use envelope::{AuthHeader, Envelope, SOAP_ENVELOPE_NAMESPACE, XSD_NAMESPACE, XSI_NAMESPACE};
pub use error::{Error, HttpError, Result};
pub use response::Response;
pub use transport::{PostHook, PreHook, MAX_ERROR_BODY_BYTES};
pub use typing::{set_xml_types, Node, XmlTyped, XmlTyper};
