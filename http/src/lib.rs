//! # Courier HTTP
//!
//! Reqwest-backed implementation of the
//! [`HttpCapability`](courier_core::HttpCapability) trait.
//!
//! One [`ReqwestCapability`] wraps one shared [`reqwest::Client`] (connection
//! pool included) and is safe to share across every in-flight call of an
//! orchestrator. The adapter is deliberately thin:
//!
//! - applies the merged request verbatim (method, query, headers, JSON body,
//!   per-request timeout),
//! - races the send against the call's cancellation token,
//! - decodes reply bodies as JSON (non-JSON bodies are carried as a JSON
//!   string),
//! - settles non-2xx replies as [`HttpFailure::Status`] so the orchestrator
//!   sees one failure taxonomy,
//! - reports elapsed timeouts with the canonical `timeout of Nms exceeded`
//!   wording that the orchestrator's classifier normalizes.

use courier_core::{HttpCapability, HttpFailure, HttpReply, Method, OutboundRequest};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

/// An [`HttpCapability`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestCapability {
    client: reqwest::Client,
}

impl ReqwestCapability {
    /// Create a capability with a fresh client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a capability over an existing client (custom TLS, proxies, ...).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpCapability for ReqwestCapability {
    fn call(
        &self,
        request: OutboundRequest,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<HttpReply, HttpFailure>> + Send + '_>> {
        let client = self.client.clone();
        Box::pin(async move {
            let timeout = request.timeout;
            let mut builder = client.request(convert_method(request.method), &request.url);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }

            let response = tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!(url = %request.url, "Call cancelled before a reply arrived");
                    return Err(HttpFailure::Cancelled { message: None });
                }
                outcome = builder.send() => outcome.map_err(|e| transport_failure(&e, timeout))?,
            };

            let status = response.status();
            let body = decode_body(response).await;

            if status.is_success() {
                Ok(HttpReply {
                    status: status.as_u16(),
                    body,
                })
            } else {
                tracing::debug!(url = %request.url, status = status.as_u16(), "Server answered with an error status");
                Err(HttpFailure::Status {
                    status: status.as_u16(),
                    body,
                    message: format!("server responded with status {}", status.as_u16()),
                })
            }
        })
    }
}

/// Decode a reply body as JSON; non-JSON bodies become a JSON string and an
/// empty body becomes null.
async fn decode_body(response: reqwest::Response) -> Value {
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(_) => return Value::Null,
    };
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Map a reqwest error into the capability failure taxonomy.
///
/// Elapsed timeouts get the canonical wording so the classifier can
/// normalize them into the one user-facing timed-out message.
fn transport_failure(error: &reqwest::Error, timeout: Option<std::time::Duration>) -> HttpFailure {
    if error.is_timeout() {
        if let Some(timeout) = timeout {
            return HttpFailure::Transport {
                message: format!("timeout of {}ms exceeded", timeout.as_millis()),
            };
        }
    }
    HttpFailure::Transport {
        message: error.to_string(),
    }
}

fn convert_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
    }
}
