//! Lifecycle notifications.
//!
//! A [`Notification`] is a copy of an [`Intent`] re-tagged with one of the
//! intent's three lifecycle tags, plus the phase-specific outcome fields. The
//! orchestrator emits exactly one prepare notification synchronously per
//! admitted intent, and exactly one of success/fail once the call settles; the
//! intent's opaque payload is preserved unmodified across all three.

use crate::intent::Intent;
use serde_json::Value;

/// Which phase of the lifecycle a notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Emitted synchronously before any network I/O.
    Prepare,
    /// Terminal: the call settled with a 2xx reply.
    Success,
    /// Terminal: the call settled as cancelled, server error, or transport error.
    Fail,
}

/// A re-tagged copy of an intent carrying phase-specific outcome data.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The lifecycle tag this notification was emitted under.
    pub tag: String,
    /// The phase the tag belongs to.
    pub phase: Phase,
    /// The originating intent, copied through unchanged (including `payload`).
    pub intent: Intent,
    /// Success: the decoded reply body. Fail: the raw error response payload
    /// if the far end answered, else an empty JSON object. Prepare: null.
    pub response: Value,
    /// Normalized failure message; set only on fail notifications.
    pub error_message: Option<String>,
    /// HTTP status supplied by the classification hook; fail only.
    pub http_status: Option<u16>,
    /// Business code supplied by the classification hook; fail only.
    pub business_code: Option<String>,
}

impl Notification {
    /// The prepare notification for an intent.
    #[must_use]
    pub fn prepare(intent: &Intent) -> Self {
        Self {
            tag: intent.lifecycle.prepare.clone(),
            phase: Phase::Prepare,
            intent: intent.clone(),
            response: Value::Null,
            error_message: None,
            http_status: None,
            business_code: None,
        }
    }

    /// The success notification for an intent, carrying the decoded reply.
    #[must_use]
    pub fn success(intent: &Intent, response: Value) -> Self {
        Self {
            tag: intent.lifecycle.success.clone(),
            phase: Phase::Success,
            intent: intent.clone(),
            response,
            error_message: None,
            http_status: None,
            business_code: None,
        }
    }

    /// The fail notification for an intent.
    #[must_use]
    pub fn failure(
        intent: &Intent,
        response: Value,
        error_message: String,
        http_status: Option<u16>,
        business_code: Option<String>,
    ) -> Self {
        Self {
            tag: intent.lifecycle.fail.clone(),
            phase: Phase::Fail,
            intent: intent.clone(),
            response,
            error_message: Some(error_message),
            http_status,
            business_code,
        }
    }

    /// Whether this notification is terminal (success or fail).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Success | Phase::Fail)
    }
}
