//! The Courier orchestrator.
//!
//! [`Courier::dispatch`] is the single entry point: intents addressed to
//! another orchestrator are returned untouched for the next handler, admitted
//! intents are announced synchronously and driven through one spawned task
//! that settles them exactly once.

use crate::classifier::{classify, Settlement};
use crate::config::CourierConfig;
use crate::handle::{CancelSource, RequestHandle};
use courier_core::{
    HideError, HttpCapability, Intent, Notification, NotificationSink, OutboundRequest,
};
use std::sync::Arc;
use tokio::sync::oneshot;

/// What `dispatch` did with a message.
#[derive(Debug)]
pub enum Dispatch {
    /// The intent was addressed to another orchestrator; hand it to the next
    /// handler untouched.
    Forwarded(Intent),
    /// The intent was admitted; the handle tracks the in-flight call.
    Handled(RequestHandle),
}

impl Dispatch {
    /// The handle, when the intent was admitted.
    #[must_use]
    pub fn handled(self) -> Option<RequestHandle> {
        match self {
            Self::Handled(handle) => Some(handle),
            Self::Forwarded(_) => None,
        }
    }
}

/// The request orchestrator.
///
/// Holds the immutable configuration, the injected HTTP capability, and the
/// notification sink; all three are shared by every in-flight call. Cloning a
/// `Courier` is cheap and yields a second front to the same instance.
///
/// # Concurrency
///
/// Each admitted intent spawns one independent tokio task. The orchestrator
/// imposes no limit on concurrently in-flight calls and performs no queueing;
/// callers wanting at-most-N concurrency must layer that externally.
#[derive(Clone)]
pub struct Courier {
    config: Arc<CourierConfig>,
    http: Arc<dyn HttpCapability>,
    sink: Arc<dyn NotificationSink>,
}

impl Courier {
    /// Create an orchestrator from its configuration and collaborators.
    #[must_use]
    pub fn new(
        config: CourierConfig,
        http: Arc<dyn HttpCapability>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            http,
            sink,
        }
    }

    /// Dispatch one message through the orchestrator.
    ///
    /// Intents whose `orchestrator` tag differs from the configured identity
    /// are returned untouched, with no side effects. For admitted intents,
    /// in order and before this method returns:
    ///
    /// 1. the `on_init` hook runs,
    /// 2. the outbound request is built (defaults → overrides → derived
    ///    headers, body attached only for mutating methods),
    /// 3. the prepare notification is emitted on the sink,
    /// 4. the call is spawned with a fresh cancellation token.
    ///
    /// The returned handle settles exactly once; see [`RequestHandle`].
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime (the call is spawned on the
    /// ambient runtime).
    #[tracing::instrument(skip(self, intent), fields(identity = %self.config.identity), name = "courier_dispatch")]
    pub fn dispatch(&self, intent: Intent) -> Dispatch {
        metrics::counter!("courier.intents.total").increment(1);

        if intent.orchestrator != self.config.identity {
            tracing::trace!(addressed_to = %intent.orchestrator, "Forwarding unrelated intent");
            metrics::counter!("courier.intents.forwarded").increment(1);
            return Dispatch::Forwarded(intent);
        }

        if let Some(on_init) = &self.config.on_init {
            on_init(&intent);
        }

        let request = self.build_request(&intent);
        let source = CancelSource::new();

        tracing::debug!(
            method = %intent.method,
            url = %request.url,
            tag = %intent.lifecycle.prepare,
            "Admitted intent, announcing"
        );

        // Synchronous: callers may rely on prepare-before-pending ordering.
        self.sink.notify(Notification::prepare(&intent));

        let (settled_tx, settled_rx) = oneshot::channel();
        let orchestrator = self.clone();
        let call_source = source.clone();
        tokio::spawn(async move {
            orchestrator
                .settle(intent, request, call_source, settled_tx)
                .await;
        });

        Dispatch::Handled(RequestHandle::new(settled_rx, source))
    }

    /// Merge the outbound request for one intent.
    ///
    /// Layering order: transport defaults, then per-intent overrides, with
    /// headers composed as defaults → derived → per-intent overrides (later
    /// layers win key by key).
    fn build_request(&self, intent: &Intent) -> OutboundRequest {
        let mut headers = self.config.transport.headers.clone();
        headers.extend((self.config.derive_headers)());
        headers.extend(intent.overrides.headers.clone());

        let body = intent
            .method
            .carries_body()
            .then(|| intent.body.clone())
            .flatten();

        OutboundRequest {
            method: intent.method,
            url: join_url(&self.config.base_address, &intent.uri),
            query: intent.query.clone(),
            headers,
            body,
            timeout: intent.overrides.timeout.or(self.config.transport.timeout),
        }
    }

    /// Drive one admitted intent from pending to settled.
    ///
    /// Runs on its own task; every path emits exactly one terminal
    /// notification and resolves the handle with the identical payload.
    async fn settle(
        &self,
        intent: Intent,
        request: OutboundRequest,
        source: CancelSource,
        settled_tx: oneshot::Sender<Result<Notification, Box<Notification>>>,
    ) {
        let start = std::time::Instant::now();
        let outcome = self.http.call(request, source.token()).await;
        metrics::histogram!("courier.request.duration_seconds")
            .record(start.elapsed().as_secs_f64());

        let settlement = classify(
            &intent,
            outcome,
            source.reason(),
            &self.config.classify_failure,
        );

        match settlement {
            Settlement::Success(notification) => {
                tracing::debug!(tag = %notification.tag, "Call settled successfully");
                metrics::counter!("courier.settlements", "outcome" => "success").increment(1);

                self.sink.notify(notification.clone());
                if let Some(text) = &intent.success_text {
                    (self.config.on_show_success)(text);
                }
                let _ = settled_tx.send(Ok(notification));
            }
            Settlement::Failure {
                notification,
                cancelled,
            } => {
                let outcome_label = if cancelled { "cancelled" } else { "failure" };
                tracing::debug!(
                    tag = %notification.tag,
                    cancelled,
                    error = notification.error_message.as_deref().unwrap_or_default(),
                    "Call settled as a failure"
                );
                metrics::counter!("courier.settlements", "outcome" => outcome_label).increment(1);

                self.sink.notify(notification.clone());
                if !cancelled && resolve_show_error(&intent, &notification) {
                    if let Some(message) = &notification.error_message {
                        (self.config.on_show_error)(message);
                    }
                }
                let _ = settled_tx.send(Err(Box::new(notification)));
            }
        }
    }
}

/// Resolve an intent's `hide_error` policy against the fail notification.
fn resolve_show_error(intent: &Intent, notification: &Notification) -> bool {
    match &intent.hide_error {
        HideError::Flag(hide) => !hide,
        HideError::When(predicate) => !predicate(notification),
    }
}

impl std::fmt::Debug for Courier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Courier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Join an intent URI onto the configured base address.
///
/// Absolute URIs pass through untouched; relative URIs are concatenated with
/// exactly one slash between the two parts.
fn join_url(base_address: &str, uri: &str) -> String {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return uri.to_string();
    }
    format!(
        "{}/{}",
        base_address.trim_end_matches('/'),
        uri.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_uris_join_with_one_slash() {
        assert_eq!(
            join_url("http://localhost:8080", "/orders"),
            "http://localhost:8080/orders"
        );
        assert_eq!(
            join_url("http://localhost:8080/", "orders"),
            "http://localhost:8080/orders"
        );
        assert_eq!(
            join_url("http://localhost:8080/v1/", "/orders"),
            "http://localhost:8080/v1/orders"
        );
    }

    #[test]
    fn absolute_uris_pass_through() {
        assert_eq!(
            join_url("http://localhost:8080", "https://elsewhere.example/x"),
            "https://elsewhere.example/x"
        );
    }
}
