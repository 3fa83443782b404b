//! # Courier Core
//!
//! Core types and capability traits for the Courier request orchestration
//! layer.
//!
//! Courier sits inside a composable state container's dispatch pipeline and
//! drives declarative HTTP "intents" through a three-phase lifecycle:
//!
//! - **prepare** — announced synchronously, before any network I/O
//! - **success** / **fail** — exactly one, emitted once the call settles
//!
//! This crate holds the vocabulary shared by every other Courier crate:
//!
//! - [`intent::Intent`] — the dispatched message describing one HTTP call
//! - [`notification::Notification`] — a re-tagged copy of an intent carrying
//!   phase-specific outcome data
//! - [`http::HttpCapability`] — the injected transport seam
//! - [`sink::NotificationSink`] — the channel notifications leave through
//! - [`storage::StateStore`] — the key/value collaborator the surrounding
//!   container uses for state rehydration
//!
//! The orchestrator itself lives in `courier-runtime`; production adapters
//! live in `courier-http` and `courier-storage`.
//!
//! ## Architecture Principles
//!
//! - Explicit effects: the orchestrator describes the call, the capability
//!   executes it
//! - Dependency injection via traits, dyn-compatible for `Arc` sharing
//! - No shared mutable state between in-flight calls

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value;
pub use tokio_util::sync::CancellationToken;

pub mod http;
pub mod intent;
pub mod notification;
pub mod sink;
pub mod storage;

pub use http::{FailureTransform, HttpCapability, HttpFailure, HttpReply, OutboundRequest};
pub use intent::{HideError, Intent, Lifecycle, Method, RequestOverrides, TransportOptions};
pub use notification::{Notification, Phase};
pub use sink::NotificationSink;
pub use storage::{StateStore, StorageError, StorageKind};
