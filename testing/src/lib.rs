//! # Courier Testing
//!
//! Testing utilities and mocks for the Courier request orchestration layer:
//!
//! - [`mocks::ScriptedCapability`]: an [`HttpCapability`] that settles calls
//!   from a scripted queue of outcomes and records every outbound request
//! - [`mocks::RecordingSink`]: a [`NotificationSink`] that captures every
//!   lifecycle notification for later assertions
//! - [`helpers`]: small builders for intents with a standard lifecycle triple
//!
//! ## Example
//!
//! ```ignore
//! use courier_testing::{helpers, mocks::{RecordingSink, ScriptedCapability}};
//!
//! let http = Arc::new(ScriptedCapability::new());
//! http.enqueue_reply(201, json!({ "id": 7 }));
//! let sink = Arc::new(RecordingSink::new());
//!
//! let courier = Courier::new(config, http.clone(), sink.clone());
//! courier.dispatch(helpers::intent_for("api"));
//! ```

use courier_core::{HttpCapability, NotificationSink};

/// Mock implementations of the Courier capability traits.
pub mod mocks {
    use super::{HttpCapability, NotificationSink};
    use courier_core::{HttpFailure, HttpReply, Notification, OutboundRequest};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Mutex, PoisonError};
    use tokio_util::sync::CancellationToken;

    /// One scripted settlement for [`ScriptedCapability`].
    #[derive(Debug, Clone)]
    pub enum ScriptedOutcome {
        /// Settle with this reply.
        Reply(HttpReply),
        /// Settle with this failure.
        Failure(HttpFailure),
        /// Stay pending until the call's token fires, then settle cancelled.
        HoldUntilCancelled,
    }

    /// An HTTP capability that settles calls from a scripted queue.
    ///
    /// Outcomes are consumed front to back, one per call; when the queue is
    /// empty, calls settle as `200 {}`. Every outbound request is recorded
    /// verbatim for assertions.
    #[derive(Debug, Default)]
    pub struct ScriptedCapability {
        script: Mutex<VecDeque<ScriptedOutcome>>,
        requests: Mutex<Vec<OutboundRequest>>,
    }

    impl ScriptedCapability {
        /// An empty script: every call settles as `200 {}`.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Append a scripted outcome.
        pub fn enqueue(&self, outcome: ScriptedOutcome) {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(outcome);
        }

        /// Append a reply settlement.
        pub fn enqueue_reply(&self, status: u16, body: serde_json::Value) {
            self.enqueue(ScriptedOutcome::Reply(HttpReply { status, body }));
        }

        /// Append a failure settlement.
        pub fn enqueue_failure(&self, failure: HttpFailure) {
            self.enqueue(ScriptedOutcome::Failure(failure));
        }

        /// Append a hold-until-cancelled settlement.
        pub fn enqueue_hold(&self) {
            self.enqueue(ScriptedOutcome::HoldUntilCancelled);
        }

        /// Every outbound request seen so far, in call order.
        #[must_use]
        pub fn requests(&self) -> Vec<OutboundRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl HttpCapability for ScriptedCapability {
        fn call(
            &self,
            request: OutboundRequest,
            cancel: CancellationToken,
        ) -> Pin<Box<dyn Future<Output = Result<HttpReply, HttpFailure>> + Send + '_>> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);
            let outcome = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();

            Box::pin(async move {
                match outcome {
                    None => Ok(HttpReply {
                        status: 200,
                        body: json!({}),
                    }),
                    Some(ScriptedOutcome::Reply(reply)) => Ok(reply),
                    Some(ScriptedOutcome::Failure(failure)) => Err(failure),
                    Some(ScriptedOutcome::HoldUntilCancelled) => {
                        cancel.cancelled().await;
                        Err(HttpFailure::Cancelled { message: None })
                    }
                }
            })
        }
    }

    /// A sink that records every notification for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        notifications: Mutex<Vec<Notification>>,
    }

    impl RecordingSink {
        /// An empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every notification seen so far, in emission order.
        #[must_use]
        pub fn snapshot(&self) -> Vec<Notification> {
            self.notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// The tags of every notification seen so far, in emission order.
        #[must_use]
        pub fn tags(&self) -> Vec<String> {
            self.snapshot().into_iter().map(|n| n.tag).collect()
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: Notification) {
            self.notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notification);
        }
    }
}

/// Builders for intents with a standard lifecycle triple.
pub mod helpers {
    use courier_core::{Intent, Lifecycle, Method};

    /// The lifecycle triple used by [`intent_for`].
    #[must_use]
    pub fn sample_lifecycle() -> Lifecycle {
        Lifecycle::new("req/prepare", "req/success", "req/fail")
    }

    /// A GET `/things` intent addressed to `orchestrator`, with the
    /// [`sample_lifecycle`] triple.
    #[must_use]
    pub fn intent_for(orchestrator: &str) -> Intent {
        Intent::new(orchestrator, sample_lifecycle(), "/things", Method::Get)
    }
}

pub use helpers::{intent_for, sample_lifecycle};
pub use mocks::{RecordingSink, ScriptedCapability, ScriptedOutcome};
