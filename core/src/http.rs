//! HTTP capability abstraction.
//!
//! The orchestrator never talks to the network directly: it hands a fully
//! merged [`OutboundRequest`] and a cancellation token to an injected
//! [`HttpCapability`] and waits for the settled outcome. Production uses the
//! reqwest-backed adapter in `courier-http`; tests script outcomes through the
//! mock in `courier-testing`.
//!
//! # Failure taxonomy
//!
//! The capability settles every call as exactly one of:
//!
//! - `Ok(HttpReply)` — the far end answered with a 2xx status,
//! - [`HttpFailure::Cancelled`] — the call's own token fired first,
//! - [`HttpFailure::Status`] — the far end answered with a non-2xx status,
//! - [`HttpFailure::Transport`] — no response was received (network failure,
//!   timeout, client-side error).
//!
//! # Dyn compatibility
//!
//! The trait uses an explicit `Pin<Box<dyn Future>>` return instead of
//! `async fn` to enable trait-object usage (`Arc<dyn HttpCapability>`), which
//! the orchestrator needs to share one capability across concurrent in-flight
//! calls.

use crate::intent::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// A fully merged outbound request, ready for the transport.
///
/// Built by the orchestrator from the transport defaults, the per-intent
/// overrides, and the derived headers. The capability applies it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: String,
    /// Query parameters to append.
    pub query: Vec<(String, String)>,
    /// Final header set, already merged.
    pub headers: BTreeMap<String, String>,
    /// JSON payload; present only for body-carrying methods.
    pub body: Option<Value>,
    /// Upper bound on the call, from send to settled.
    pub timeout: Option<Duration>,
}

/// A settled 2xx reply.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    /// HTTP status code (2xx).
    pub status: u16,
    /// Decoded JSON body; non-JSON bodies are carried as a JSON string.
    pub body: Value,
}

/// The ways a call can settle without a 2xx reply.
#[derive(Debug, Clone, Error)]
pub enum HttpFailure {
    /// The call's own cancellation token fired before the reply arrived.
    #[error("request was cancelled")]
    Cancelled {
        /// Message supplied by the transport at cancellation time, if any.
        message: Option<String>,
    },

    /// The far end answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Status {
        /// The non-2xx status code.
        status: u16,
        /// The raw error response payload.
        body: Value,
        /// Transport-level description of the failure.
        message: String,
    },

    /// No response was received: network failure, timeout, or client-side error.
    #[error("transport failure: {message}")]
    Transport {
        /// The underlying transport message.
        message: String,
    },
}

/// Partial record a classification hook returns for server-error outcomes.
///
/// The classifier merges whichever fields are present into the fail
/// notification; an empty record leaves the defaults in place. Returned by
/// value from the hook so no mutable state is shared between concurrent calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureTransform {
    /// Normalized HTTP status to surface on the fail notification.
    pub http_status: Option<u16>,
    /// Normalized failure message; empty means "use the generic message".
    pub error_message: Option<String>,
    /// Application-level error code extracted from the response.
    pub business_code: Option<String>,
}

/// Injected HTTP transport.
///
/// Implementations must be `Send + Sync`; one capability instance is shared by
/// every in-flight call of an orchestrator. The token is the call's own:
/// implementations must observe it and settle as [`HttpFailure::Cancelled`]
/// when it fires before the reply.
pub trait HttpCapability: Send + Sync {
    /// Issue one call and settle it.
    fn call(
        &self,
        request: OutboundRequest,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<HttpReply, HttpFailure>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_is_stable() {
        let cancelled = HttpFailure::Cancelled { message: None };
        assert_eq!(cancelled.to_string(), "request was cancelled");

        let status = HttpFailure::Status {
            status: 503,
            body: Value::Null,
            message: "upstream unavailable".to_string(),
        };
        assert_eq!(status.to_string(), "server responded with status 503");
    }

    #[test]
    fn empty_transform_has_no_fields() {
        let transform = FailureTransform::default();
        assert!(transform.http_status.is_none());
        assert!(transform.error_message.is_none());
        assert!(transform.business_code.is_none());
    }
}
