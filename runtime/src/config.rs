//! Orchestrator configuration.
//!
//! One [`CourierConfig`] is built at startup and shared immutably by every
//! in-flight call. Hooks are `Arc`-wrapped closures; anything they need from
//! the surrounding container is captured, not passed.

use courier_core::{FailureTransform, HttpFailure, Intent, TransportOptions};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Hook invoked once per admitted intent, before the call starts.
pub type InitHook = Arc<dyn Fn(&Intent) + Send + Sync>;

/// Hook computing headers per call; merged under per-intent header overrides.
pub type HeaderHook = Arc<dyn Fn() -> BTreeMap<String, String> + Send + Sync>;

/// Hook classifying server-error outcomes into a [`FailureTransform`].
///
/// Invoked only when the far end answered with a non-2xx status; returns a
/// partial record by value, merged by the classifier.
pub type ClassifyHook = Arc<dyn Fn(&HttpFailure) -> FailureTransform + Send + Sync>;

/// Side-effecting display hook (toast, banner, console, ...).
pub type DisplayHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Configuration for one orchestrator instance.
///
/// Constructed once via `with_*` builders and reused across all intents.
/// Every field is read-only after construction; concurrent in-flight calls
/// share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use courier_runtime::CourierConfig;
/// use courier_core::TransportOptions;
/// use std::collections::BTreeMap;
/// use std::time::Duration;
///
/// let config = CourierConfig::new("api", "https://api.example.com")
///     .with_transport(TransportOptions::new().with_timeout(Duration::from_secs(5)))
///     .derive_headers(|| {
///         let mut headers = BTreeMap::new();
///         headers.insert("authorization".to_string(), "Bearer ...".to_string());
///         headers
///     });
/// ```
#[derive(Clone)]
pub struct CourierConfig {
    pub(crate) identity: String,
    pub(crate) base_address: String,
    pub(crate) transport: TransportOptions,
    pub(crate) on_init: Option<InitHook>,
    pub(crate) derive_headers: HeaderHook,
    pub(crate) classify_failure: ClassifyHook,
    pub(crate) on_show_success: DisplayHook,
    pub(crate) on_show_error: DisplayHook,
}

impl CourierConfig {
    /// Create a configuration with default transport options and no-op hooks.
    ///
    /// - `identity`: the tag intents must carry to be admitted by this
    ///   orchestrator; everything else is forwarded untouched.
    /// - `base_address`: prefix for relative intent URIs.
    pub fn new(identity: impl Into<String>, base_address: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            base_address: base_address.into(),
            transport: TransportOptions::default(),
            on_init: None,
            derive_headers: Arc::new(BTreeMap::new),
            classify_failure: Arc::new(|_| FailureTransform::default()),
            on_show_success: Arc::new(|_| {}),
            on_show_error: Arc::new(|_| {}),
        }
    }

    /// Replace the transport defaults applied to every call.
    #[must_use]
    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    /// Install a hook invoked once per admitted intent, before the call starts.
    #[must_use]
    pub fn on_init(mut self, hook: impl Fn(&Intent) + Send + Sync + 'static) -> Self {
        self.on_init = Some(Arc::new(hook));
        self
    }

    /// Install the per-call header derivation hook.
    ///
    /// The result is merged over the transport default headers and under any
    /// per-intent header overrides.
    #[must_use]
    pub fn derive_headers(
        mut self,
        hook: impl Fn() -> BTreeMap<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.derive_headers = Arc::new(hook);
        self
    }

    /// Install the server-error classification hook.
    #[must_use]
    pub fn classify_failure(
        mut self,
        hook: impl Fn(&HttpFailure) -> FailureTransform + Send + Sync + 'static,
    ) -> Self {
        self.classify_failure = Arc::new(hook);
        self
    }

    /// Install the success-display hook, fired with an intent's
    /// `success_text` after a successful settle.
    #[must_use]
    pub fn on_show_success(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_show_success = Arc::new(hook);
        self
    }

    /// Install the error-display hook, fired with the normalized failure
    /// message unless suppressed by policy or cancellation.
    #[must_use]
    pub fn on_show_error(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_show_error = Arc::new(hook);
        self
    }

    /// The identity intents must carry to be admitted.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

// Manual Debug implementation since hooks don't implement Debug
impl fmt::Debug for CourierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CourierConfig")
            .field("identity", &self.identity)
            .field("base_address", &self.base_address)
            .field("transport", &self.transport)
            .field("on_init", &self.on_init.is_some())
            .finish_non_exhaustive()
    }
}
