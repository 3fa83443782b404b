//! Broadcast-backed notification sink.
//!
//! Fans every lifecycle notification out to any number of observers over a
//! tokio broadcast channel. `notify` is synchronous and never blocks: with no
//! subscribers the notification is dropped, and a lagging subscriber skips
//! old notifications rather than stalling the orchestrator.

use courier_core::{Notification, NotificationSink};
use tokio::sync::broadcast;

/// A [`NotificationSink`] that fans out over a tokio broadcast channel.
///
/// # Example
///
/// ```
/// use courier_runtime::BroadcastSink;
///
/// let sink = BroadcastSink::new(16);
/// let mut observer = sink.subscribe();
/// // pass Arc::new(sink) to Courier::new, then:
/// // while let Ok(notification) = observer.recv().await { ... }
/// ```
#[derive(Debug)]
pub struct BroadcastSink {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastSink {
    /// Create a sink with the given channel capacity.
    ///
    /// Capacity bounds how far a slow observer may lag before it starts
    /// skipping notifications.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all notifications delivered after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl NotificationSink for BroadcastSink {
    fn notify(&self, notification: Notification) {
        // No subscribers is not an error; the caller may only care about
        // the handle's promise.
        let _ = self.sender.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{Intent, Lifecycle, Method};

    #[tokio::test]
    async fn subscribers_observe_notifications_in_order() {
        let sink = BroadcastSink::new(8);
        let mut observer = sink.subscribe();

        let intent = Intent::new(
            "api",
            Lifecycle::new("x/prepare", "x/success", "x/fail"),
            "/x",
            Method::Get,
        );
        sink.notify(Notification::prepare(&intent));
        sink.notify(Notification::success(&intent, serde_json::json!(1)));

        let first = observer.recv().await.ok().map(|n| n.tag);
        let second = observer.recv().await.ok().map(|n| n.tag);
        assert_eq!(first.as_deref(), Some("x/prepare"));
        assert_eq!(second.as_deref(), Some("x/success"));
    }

    #[test]
    fn notifying_without_subscribers_is_a_no_op() {
        let sink = BroadcastSink::new(1);
        let intent = Intent::new(
            "api",
            Lifecycle::new("x/prepare", "x/success", "x/fail"),
            "/x",
            Method::Get,
        );
        sink.notify(Notification::prepare(&intent));
    }
}
