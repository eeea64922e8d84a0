// crates/sdk-starter-core/src/runtime/gateway.rs
// ============================================================================
// Module: Notification Gateway
// Description: Create-binding and send-notification over a notify provider.
// Purpose: Translate provider outcomes into the uniform result envelope.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! The gateway forwards normalized parameters to a shared [`NotifyProvider`]
//! and maps the outcome to an [`OperationResult`]. Provider failures are never
//! propagated as errors and never retried: one failure yields one
//! [`OperationResult::Failure`].
//!
//! Notification bodies are caller-supplied. When the payload has no `body`
//! and `identity` is a string, the gateway fills `Hello, <identity>!`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;

use crate::core::outcome::BINDING_CREATED;
use crate::core::outcome::BINDING_FAILED_PREFIX;
use crate::core::outcome::NOTIFICATION_FAILED_PREFIX;
use crate::core::outcome::NOTIFICATION_SENT;
use crate::core::outcome::OperationResult;
use crate::core::params::NormalizedParams;
use crate::interfaces::NotifyProvider;

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Notification gateway over a shared provider client.
#[derive(Clone)]
pub struct NotificationGateway {
    /// Provider client shared across request handlers.
    provider: Arc<dyn NotifyProvider>,
}

impl NotificationGateway {
    /// Creates a gateway over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn NotifyProvider>) -> Self {
        Self {
            provider,
        }
    }

    /// Registers a device binding.
    pub async fn create_binding(&self, params: &NormalizedParams) -> OperationResult {
        match self.provider.create_binding(params).await {
            Ok(()) => OperationResult::success(BINDING_CREATED),
            Err(err) => OperationResult::failure(BINDING_FAILED_PREFIX, err.to_string()),
        }
    }

    /// Sends a notification, filling the default body when none is supplied.
    pub async fn send_notification(&self, params: &NormalizedParams) -> OperationResult {
        let payload = with_default_body(params);
        match self.provider.create_notification(&payload).await {
            Ok(()) => OperationResult::success(NOTIFICATION_SENT),
            Err(err) => OperationResult::failure(NOTIFICATION_FAILED_PREFIX, err.to_string()),
        }
    }
}

/// Returns the payload with `body` defaulted from a string `identity`.
fn with_default_body(params: &NormalizedParams) -> NormalizedParams {
    let mut payload = params.clone();
    if !payload.contains_key("body")
        && let Some(identity) = params.get_str("identity")
    {
        payload.insert("body", Value::String(format!("Hello, {identity}!")));
    }
    payload
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use serde_json::json;

    use super::with_default_body;
    use crate::core::params::normalize;

    #[test]
    fn default_body_is_skipped_for_non_string_identity() {
        let params = normalize([("identity", json!(["alice", "bob"]))]);
        let payload = with_default_body(&params);
        assert!(payload.get("body").is_none());
    }

    #[test]
    fn explicit_empty_body_is_preserved() {
        let params = normalize([("identity", json!("alice")), ("Body", Value::String(String::new()))]);
        let payload = with_default_body(&params);
        assert_eq!(payload.get_str("body"), Some(""));
    }
}
