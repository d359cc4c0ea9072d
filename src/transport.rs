//! The HTTP exchange shared by the SOAP and bus clients.

use crate::action::HeaderStrategy;
use crate::{Error, HttpError, Result};
use http::{HeaderMap, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Upper bound on how much of an error response body is read, in bytes.
pub const MAX_ERROR_BODY_BYTES: usize = 1024 * 1024;

/// Hook run on every outbound request right before it is sent.
///
/// It sees the fully built request, headers included, and may change it
/// freely, for instance to add authentication.
pub type PreHook = Arc<dyn Fn(&mut reqwest::Request) + Send + Sync>;

/// Hook run on every response as soon as it arrives, before its status is
/// checked.
pub type PostHook = Arc<dyn Fn(&reqwest::Response) + Send + Sync>;

/// The optional pre-request and post-response hooks of a client.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) pre: Option<PreHook>,
    pub(crate) post: Option<PostHook>,
}

/// One POST exchange.
pub(crate) struct Exchange<'a> {
    pub(crate) http: &'a reqwest::Client,
    pub(crate) url: Url,
    pub(crate) default_headers: &'a HeaderMap,
    pub(crate) strategy: HeaderStrategy,
    pub(crate) content_type: Option<&'a str>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) hooks: &'a Hooks,
}

impl Exchange<'_> {
    /// Sends `body` and returns the response if its status is `200 OK`.
    ///
    /// Any other status is read into an [`HttpError`], keeping at most
    /// [`MAX_ERROR_BODY_BYTES`] of the body, and the response is dropped.
    pub(crate) async fn send(self, body: Vec<u8>) -> Result<reqwest::Response> {
        let mut builder = self.http.post(self.url.clone()).body(body);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let mut request = builder.build()?;

        let headers = request.headers_mut();
        for (name, value) in self.default_headers {
            headers.append(name, value.clone());
        }
        self.strategy.apply(self.content_type, headers)?;

        if let Some(pre) = &self.hooks.pre {
            pre(&mut request);
        }

        tracing::debug!(
            url = %self.url,
            strategy = ?self.strategy,
            "Executing HTTP request"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(Error::from_transport)?;

        if let Some(post) = &self.hooks.post {
            post(&response);
        }

        let status = response.status();

        tracing::info!(status = status.as_u16(), url = %self.url, "Received HTTP response");

        if status != StatusCode::OK {
            let headers = response.headers().clone();
            let message = read_excerpt(response, MAX_ERROR_BODY_BYTES).await;

            if status.is_client_error() {
                tracing::error!(status = status.as_u16(), response = %message, "Client error (4xx)");
            } else {
                tracing::warn!(status = status.as_u16(), response = %message, "Request failed");
            }

            return Err(Error::Http(HttpError {
                status_code: status,
                status: status.to_string(),
                message,
                headers,
            }));
        }

        Ok(response)
    }
}

/// Reads at most `limit` bytes of the body. Read errors end the excerpt
/// early rather than failing.
async fn read_excerpt(mut response: reqwest::Response, limit: usize) -> String {
    let mut buf = Vec::new();

    while buf.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(limit - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read error response body");
                break;
            }
        }
    }

    excerpt(&buf, limit)
}

/// Decodes `bytes` lossily, never returning more than `limit` bytes.
fn excerpt(bytes: &[u8], limit: usize) -> String {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    if text.len() > limit {
        let mut end = limit;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
