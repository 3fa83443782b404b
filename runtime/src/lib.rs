//! # Courier Runtime
//!
//! The request orchestrator: intercepts [`Intent`](courier_core::Intent)
//! messages addressed to it, announces them synchronously, drives the HTTP
//! call through an injected capability with a fresh cancellation token, and
//! settles each call as exactly one of success / cancelled / server error /
//! transport error.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──dispatch──▶ Preparing ──spawn──▶ Pending ──settle──▶ SettledSuccess
//!                    (prepare emitted,    (request              │
//!                     synchronous)         in flight)           └─▶ SettledFail
//! ```
//!
//! Terminal states emit nothing further. `cancel()` is only meaningful while
//! Pending; its effect is to force the transition to `SettledFail` with a
//! cancelled classification.
//!
//! # Example
//!
//! ```ignore
//! use courier_runtime::{BroadcastSink, Courier, CourierConfig, Dispatch};
//! use courier_core::{Intent, Lifecycle, Method};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(BroadcastSink::new(16));
//! let courier = Courier::new(
//!     CourierConfig::new("api", "https://api.example.com"),
//!     Arc::new(ReqwestCapability::new()),
//!     sink.clone(),
//! );
//!
//! let intent = Intent::new(
//!     "api",
//!     Lifecycle::new("orders/load", "orders/loaded", "orders/load-failed"),
//!     "/orders",
//!     Method::Get,
//! );
//!
//! match courier.dispatch(intent) {
//!     Dispatch::Handled(handle) => {
//!         let settled = handle.settled().await;
//!     }
//!     Dispatch::Forwarded(other) => { /* hand to the next middleware */ }
//! }
//! ```

/// Error types for the runtime.
pub mod error {
    use courier_core::Notification;
    use thiserror::Error;

    /// Errors surfaced by a [`RequestHandle`](crate::handle::RequestHandle).
    #[derive(Debug, Error)]
    pub enum SettleError {
        /// The call settled as a failure; the payload is identical to the
        /// fail notification emitted on the sink.
        #[error("request settled as a failure: {}", .0.error_message.as_deref().unwrap_or("unknown error"))]
        Rejected(Box<Notification>),

        /// The dispatch task terminated before settling (runtime torn down).
        #[error("the dispatch task terminated before settling")]
        Detached,
    }

    impl SettleError {
        /// The fail notification carried by a rejection, if any.
        #[must_use]
        pub fn into_notification(self) -> Option<Notification> {
            match self {
                Self::Rejected(notification) => Some(*notification),
                Self::Detached => None,
            }
        }
    }
}

mod classifier;
pub mod config;
pub mod handle;
pub mod orchestrator;
pub mod sink;

pub use classifier::{CANCELLED_MESSAGE, GENERIC_FAILURE_MESSAGE, TIMED_OUT_MESSAGE};
pub use config::CourierConfig;
pub use error::SettleError;
pub use handle::RequestHandle;
pub use orchestrator::{Courier, Dispatch};
pub use sink::BroadcastSink;
