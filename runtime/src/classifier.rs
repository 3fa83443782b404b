//! Settlement classification.
//!
//! Maps the raw outcome of one HTTP call to exactly one of four settlements —
//! success, cancelled, server error, other error — and produces the terminal
//! notification, including message defaulting, the classification-hook merge,
//! and normalization of transport-specific timeout wording.

use crate::config::ClassifyHook;
use courier_core::{HttpFailure, HttpReply, Intent, Notification};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

/// Message used when a call was cancelled without a custom reason.
pub const CANCELLED_MESSAGE: &str = "request was cancelled by the caller";

/// Message used when a failure carries no usable message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "the request could not be completed";

/// Message every transport-specific timeout wording is rewritten to.
pub const TIMED_OUT_MESSAGE: &str = "request timed out";

/// Canonical transport timeout wording: `timeout of 20000ms exceeded`,
/// case-insensitive, any digit count, `ms` or `s`.
#[allow(clippy::expect_used)] // the pattern is a compile-time constant
static TIMEOUT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^timeout\sof\s\d+m?s\sexceeded$").expect("timeout pattern must compile")
});

/// How one call settled, with the terminal notification already built.
#[derive(Debug)]
pub(crate) enum Settlement {
    /// 2xx reply; the notification carries the decoded body.
    Success(Notification),
    /// Any failure; `cancelled` controls display-hook suppression.
    Failure {
        notification: Notification,
        cancelled: bool,
    },
}

/// Classify a settled outcome, in fixed priority order:
/// success, cancelled, server error, other error.
///
/// `cancel_reason` is the custom message recorded through the handle, which
/// outranks any message the transport attached to the cancellation.
pub(crate) fn classify(
    intent: &Intent,
    outcome: Result<HttpReply, HttpFailure>,
    cancel_reason: Option<String>,
    hook: &ClassifyHook,
) -> Settlement {
    let failure = match outcome {
        Ok(reply) => return Settlement::Success(Notification::success(intent, reply.body)),
        Err(failure) => failure,
    };

    let (mut error_message, http_status, business_code, response, cancelled) = match &failure {
        HttpFailure::Cancelled { message } => {
            let message = cancel_reason
                .or_else(|| message.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| CANCELLED_MESSAGE.to_string());
            (message, None, None, json!({}), true)
        }
        HttpFailure::Status { body, .. } => {
            let transform = hook(&failure);
            let message = transform
                .error_message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            (
                message,
                transform.http_status,
                transform.business_code,
                body.clone(),
                false,
            )
        }
        HttpFailure::Transport { message } => {
            let message = Some(message.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            (message, None, None, json!({}), false)
        }
    };

    // Cancellations keep their message verbatim; only server/transport
    // failures get the timeout wording normalized.
    if !cancelled && TIMEOUT_PATTERN.is_match(&error_message) {
        error_message = TIMED_OUT_MESSAGE.to_string();
    }

    Settlement::Failure {
        notification: Notification::failure(
            intent,
            response,
            error_message,
            http_status,
            business_code,
        ),
        cancelled,
    }
}
