//! Request intent types.
//!
//! An [`Intent`] is the declarative message a caller dispatches to describe one
//! HTTP call: which orchestrator owns it, the three lifecycle tags its
//! notifications will carry, the target and method, and the per-call options
//! layered on top of the orchestrator's transport defaults.
//!
//! Intents are ephemeral: constructed by the caller, consumed once by the
//! orchestrator, and discarded after the terminal notification is emitted.

use crate::notification::Notification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// HTTP method of an outbound call.
///
/// Only the methods the orchestration layer distinguishes are listed; the
/// meaningful split is [`Method::carries_body`], which controls whether an
/// intent's body is attached to the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP HEAD
    Head,
    /// HTTP OPTIONS
    Options,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
    /// HTTP PATCH
    Patch,
}

impl Method {
    /// Whether an outbound call with this method carries the intent's body.
    ///
    /// Mutating methods (POST, PUT, DELETE, PATCH) carry a payload; all other
    /// methods never do, even when the intent has a body set.
    #[must_use]
    pub const fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Delete | Self::Patch)
    }

    /// Canonical upper-case name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lifecycle-type triple of an intent.
///
/// Three distinct tags, one per phase. The orchestrator re-tags a copy of the
/// intent with `prepare` synchronously before any I/O, and with exactly one of
/// `success` or `fail` once the call settles.
///
/// # Examples
///
/// ```
/// use courier_core::intent::Lifecycle;
///
/// let lifecycle = Lifecycle::new("orders/load", "orders/loaded", "orders/load-failed");
/// assert_eq!(lifecycle.prepare, "orders/load");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Tag of the notification emitted before the call starts.
    pub prepare: String,
    /// Tag of the notification emitted when the call settles successfully.
    pub success: String,
    /// Tag of the notification emitted when the call settles as a failure.
    pub fail: String,
}

impl Lifecycle {
    /// Create a lifecycle triple from its three tags.
    pub fn new(
        prepare: impl Into<String>,
        success: impl Into<String>,
        fail: impl Into<String>,
    ) -> Self {
        Self {
            prepare: prepare.into(),
            success: success.into(),
            fail: fail.into(),
        }
    }
}

/// Error-display suppression policy carried by an intent.
///
/// Resolved by the orchestrator after a non-cancelled failure: a flag
/// suppresses unconditionally, a predicate is asked with the final fail
/// notification. Cancelled failures never reach the error-display hook,
/// whatever this policy says.
#[derive(Clone)]
pub enum HideError {
    /// `true` suppresses the error-display hook.
    Flag(bool),
    /// Predicate over the fail notification; `true` suppresses the hook.
    When(Arc<dyn Fn(&Notification) -> bool + Send + Sync>),
}

impl HideError {
    /// Convenience constructor for the predicate variant.
    pub fn when(predicate: impl Fn(&Notification) -> bool + Send + Sync + 'static) -> Self {
        Self::When(Arc::new(predicate))
    }
}

impl Default for HideError {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl fmt::Debug for HideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => f.debug_tuple("HideError::Flag").field(flag).finish(),
            Self::When(_) => write!(f, "HideError::When(<predicate>)"),
        }
    }
}

/// Transport defaults applied to every call an orchestrator issues.
///
/// Per-intent [`RequestOverrides`] are layered on top of these, and the
/// orchestrator's derived headers sit between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Upper bound on one call, from send to settled.
    pub timeout: Option<Duration>,
    /// Headers attached to every call unless overridden.
    pub headers: BTreeMap<String, String>,
}

impl TransportOptions {
    /// Default timeout applied when none is configured explicitly.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

    /// Transport defaults with the standard timeout and no headers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Some(Self::DEFAULT_TIMEOUT),
            headers: BTreeMap::new(),
        }
    }

    /// Replace the default timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a default header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-intent request overrides, layered over the transport defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    /// Overrides the default timeout for this call only.
    pub timeout: Option<Duration>,
    /// Headers that win over both transport defaults and derived headers.
    pub headers: BTreeMap<String, String>,
}

impl RequestOverrides {
    /// Empty overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the timeout for this call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header override for this call.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A dispatched message describing one HTTP call and its lifecycle tags.
///
/// # Examples
///
/// ```
/// use courier_core::intent::{Intent, Lifecycle, Method};
/// use serde_json::json;
///
/// let intent = Intent::new(
///     "api",
///     Lifecycle::new("orders/load", "orders/loaded", "orders/load-failed"),
///     "/orders",
///     Method::Post,
/// )
/// .with_body(json!({ "qty": 2 }));
///
/// assert!(intent.method.carries_body());
/// ```
#[derive(Debug, Clone)]
pub struct Intent {
    /// Identity of the orchestrator instance this intent is addressed to.
    pub orchestrator: String,
    /// The three lifecycle tags for this intent's notifications.
    pub lifecycle: Lifecycle,
    /// Target URI, joined onto the orchestrator's base address unless absolute.
    pub uri: String,
    /// HTTP method of the call.
    pub method: Method,
    /// Query parameters appended to the target.
    pub query: Vec<(String, String)>,
    /// JSON body, attached only when [`Method::carries_body`] holds.
    pub body: Option<serde_json::Value>,
    /// Per-call request overrides layered over the transport defaults.
    pub overrides: RequestOverrides,
    /// Message handed to the success-display hook after a successful settle.
    pub success_text: Option<String>,
    /// Error-display suppression policy.
    pub hide_error: HideError,
    /// Opaque caller data, carried through every notification unchanged.
    pub payload: serde_json::Value,
}

impl Intent {
    /// Create an intent with empty options.
    pub fn new(
        orchestrator: impl Into<String>,
        lifecycle: Lifecycle,
        uri: impl Into<String>,
        method: Method,
    ) -> Self {
        Self {
            orchestrator: orchestrator.into(),
            lifecycle,
            uri: uri.into(),
            method,
            query: Vec::new(),
            body: None,
            overrides: RequestOverrides::default(),
            success_text: None,
            hide_error: HideError::default(),
            payload: serde_json::Value::Null,
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the per-call request overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: RequestOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set the success-display text.
    #[must_use]
    pub fn with_success_text(mut self, text: impl Into<String>) -> Self {
        self.success_text = Some(text.into());
        self
    }

    /// Set the error-display suppression policy.
    #[must_use]
    pub fn with_hide_error(mut self, hide_error: HideError) -> Self {
        self.hide_error = hide_error;
        self
    }

    /// Attach opaque caller data.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
