//! The cancellable handle returned to dispatching callers.
//!
//! Each admitted intent yields one [`RequestHandle`]: a promise of the
//! terminal notification plus a synchronous cancel bound to that call's own
//! cancellation token. The token and its source live only for the duration of
//! the one in-flight call.

use crate::error::SettleError;
use courier_core::Notification;
use std::sync::{Arc, OnceLock};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Internal: one call's cancellation token plus the optional custom reason.
///
/// The reason slot is write-once; the first `cancel_with_reason` wins and
/// later writes are ignored, matching the token's own idempotent cancel.
#[derive(Clone, Debug)]
pub(crate) struct CancelSource {
    token: CancellationToken,
    reason: Arc<OnceLock<String>>,
}

impl CancelSource {
    pub(crate) fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            reason: Arc::new(OnceLock::new()),
        }
    }

    /// The token handed to the HTTP capability.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// The custom reason recorded at cancellation time, if any.
    pub(crate) fn reason(&self) -> Option<String> {
        self.reason.get().cloned()
    }

    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    pub(crate) fn cancel_with_reason(&self, reason: String) {
        let _ = self.reason.set(reason);
        self.token.cancel();
    }
}

/// The `{promise, cancel}` pair returned for one admitted intent.
///
/// The promise resolves to the success notification or rejects with
/// [`SettleError::Rejected`] carrying the fail notification — the identical
/// payload emitted on the sink, so callers may react through either channel.
///
/// # Example
///
/// ```ignore
/// let Dispatch::Handled(handle) = courier.dispatch(intent) else { return };
/// handle.cancel(); // settles the call as a cancelled failure
/// let err = handle.settled().await.unwrap_err();
/// ```
#[derive(Debug)]
pub struct RequestHandle {
    settlement: oneshot::Receiver<Result<Notification, Box<Notification>>>,
    cancel: CancelSource,
}

impl RequestHandle {
    pub(crate) fn new(
        settlement: oneshot::Receiver<Result<Notification, Box<Notification>>>,
        cancel: CancelSource,
    ) -> Self {
        Self { settlement, cancel }
    }

    /// Cancel the in-flight call.
    ///
    /// Idempotent; a no-op once the call has settled. While the call is
    /// pending this forces it to settle as a failure classified as cancelled
    /// with the default cancellation message.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel the in-flight call with a custom message.
    ///
    /// The message replaces the default cancellation message on the fail
    /// notification. The first reason recorded wins; like [`cancel`], this is
    /// a no-op once the call has settled.
    ///
    /// [`cancel`]: RequestHandle::cancel
    pub fn cancel_with_reason(&self, reason: impl Into<String>) {
        self.cancel.cancel_with_reason(reason.into());
    }

    /// Wait for the call to settle.
    ///
    /// # Errors
    ///
    /// - [`SettleError::Rejected`] when the call settled as a failure; the
    ///   boxed notification is the fail notification.
    /// - [`SettleError::Detached`] when the dispatch task was torn down
    ///   before settling (runtime shutdown).
    pub async fn settled(self) -> Result<Notification, SettleError> {
        match self.settlement.await {
            Ok(Ok(notification)) => Ok(notification),
            Ok(Err(notification)) => Err(SettleError::Rejected(notification)),
            Err(_) => Err(SettleError::Detached),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{Intent, Lifecycle, Method, Notification};
    use serde_json::json;

    fn fail_notification() -> Notification {
        let intent = Intent::new(
            "api",
            Lifecycle::new("x/prepare", "x/success", "x/fail"),
            "/x",
            Method::Get,
        );
        Notification::failure(&intent, json!({}), "boom".to_string(), None, None)
    }

    #[tokio::test]
    async fn settled_resolves_with_the_delivered_notification() {
        let (tx, rx) = oneshot::channel();
        let handle = RequestHandle::new(rx, CancelSource::new());

        let intent = Intent::new(
            "api",
            Lifecycle::new("x/prepare", "x/success", "x/fail"),
            "/x",
            Method::Get,
        );
        let _ = tx.send(Ok(Notification::success(&intent, json!({ "id": 7 }))));

        let settled = handle.settled().await;
        assert_eq!(settled.ok().map(|n| n.response), Some(json!({ "id": 7 })));
    }

    #[tokio::test]
    async fn settled_rejects_with_the_fail_notification() {
        let (tx, rx) = oneshot::channel();
        let handle = RequestHandle::new(rx, CancelSource::new());
        let _ = tx.send(Err(Box::new(fail_notification())));

        match handle.settled().await {
            Err(SettleError::Rejected(notification)) => {
                assert_eq!(notification.error_message.as_deref(), Some("boom"));
            }
            other => unreachable!("expected a rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn settled_reports_detached_when_the_task_is_gone() {
        let (tx, rx) = oneshot::channel::<Result<Notification, Box<Notification>>>();
        drop(tx);
        let handle = RequestHandle::new(rx, CancelSource::new());
        assert!(matches!(handle.settled().await, Err(SettleError::Detached)));
    }

    #[test]
    fn cancel_reason_is_write_once() {
        let source = CancelSource::new();
        source.cancel_with_reason("first".to_string());
        source.cancel_with_reason("second".to_string());
        assert_eq!(source.reason().as_deref(), Some("first"));
        assert!(source.token().is_cancelled());
    }
}
