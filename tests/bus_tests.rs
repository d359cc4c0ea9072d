//! Integration tests for the bus client.

use serde::{Deserialize, Serialize};
use soapbus::{BusClient, Error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Sum {
    a: u32,
    b: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Total {
    total: u32,
}

#[tokio::test]
async fn test_bus_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/call"))
        .and(header("content-type", "application/json"))
        .and(body_bytes(br#"{"a":1}"#.to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(br#"{"ok":true}"#.to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BusClient::builder()
        .base_url(format!("{}/", mock_server.uri()))
        .method_name("api/call")
        .build()
        .unwrap();

    let response = client.round_trip(br#"{"a":1}"#.to_vec()).await.unwrap();

    assert_eq!(response.data, br#"{"ok":true}"#.to_vec());
    assert_eq!(response.status.as_u16(), 200);
}

#[tokio::test]
async fn test_bus_returns_non_utf8_bytes_verbatim() {
    let mock_server = MockServer::start().await;
    let payload = vec![0u8, 159, 146, 150, 255];

    Mock::given(method("POST"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&mock_server)
        .await;

    let client = BusClient::builder()
        .base_url(format!("{}/", mock_server.uri()))
        .content_type("application/octet-stream")
        .build()
        .unwrap();

    let response = client.round_trip_method("blob", vec![1, 2, 3]).await.unwrap();
    assert_eq!(response.data, payload);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/octet-stream"
    );
}

#[tokio::test]
async fn test_bus_header_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/status"))
        .and(header("user-agent", "billing/1.0"))
        .and(header("accept-language", "en"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BusClient::builder()
        .base_url(format!("{}/", mock_server.uri()))
        .method_name("status")
        .user_agent("billing/1.0")
        .accept_language("en")
        .cache_control("no-cache")
        .build()
        .unwrap();

    let response = client.round_trip(Vec::new()).await.unwrap();
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn test_bus_http_error() {
    let mock_server = MockServer::start().await;
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_clone = seen.clone();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such method"))
        .mount(&mock_server)
        .await;

    let client = BusClient::builder()
        .base_url(format!("{}/", mock_server.uri()))
        .method_name("missing")
        .post_hook(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let result = client.round_trip(b"{}".to_vec()).await;

    match result {
        Err(Error::Http(err)) => {
            assert_eq!(err.status_code.as_u16(), 404);
            assert_eq!(err.status, "404 Not Found");
            assert_eq!(err.message, "no such method");
        }
        _ => panic!("Expected Http error, got {:?}", result),
    }
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bus_pre_hook_runs_after_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("content-type", "application/vnd.bus+json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BusClient::builder()
        .base_url(mock_server.uri())
        .method_name("/rewrite")
        .pre_hook(|request| {
            request.headers_mut().insert(
                "content-type",
                http::HeaderValue::from_static("application/vnd.bus+json"),
            );
        })
        .build()
        .unwrap();

    client.round_trip(b"{}".to_vec()).await.unwrap();
}

#[tokio::test]
async fn test_call_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/math/add"))
        .and(body_bytes(serde_json::to_vec(&Sum { a: 2, b: 3 }).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(Total { total: 5 }))
        .mount(&mock_server)
        .await;

    let client = BusClient::builder()
        .base_url(format!("{}/math/", mock_server.uri()))
        .method_name("add")
        .build()
        .unwrap();

    let response = client.call_json::<_, Total>(&Sum { a: 2, b: 3 }).await.unwrap();
    assert_eq!(response.data, Total { total: 5 });
}

#[tokio::test]
async fn test_call_json_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client = BusClient::builder()
        .base_url(format!("{}/", mock_server.uri()))
        .method_name("math/add")
        .build()
        .unwrap();

    let result = client.call_json::<_, Total>(&Sum { a: 2, b: 3 }).await;

    match result {
        Err(Error::DeserializationFailed {
            raw_response,
            serde_error,
            status,
        }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, "invalid json");
            assert!(serde_error.contains("expected"));
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_bus_invalid_url() {
    let client = BusClient::builder()
        .base_url("not a url/")
        .method_name("call")
        .build()
        .unwrap();

    let result = client.round_trip(Vec::new()).await;
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
