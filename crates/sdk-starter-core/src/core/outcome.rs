// crates/sdk-starter-core/src/core/outcome.rs
// ============================================================================
// Module: Operation Results
// Description: Uniform success/failure envelope for provider operations.
// Purpose: Carry caller-facing messages and raw provider error text.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`OperationResult`] serializes as `{message}` on success and
//! `{message, error}` on failure, which is exactly the JSON body returned by
//! the notification routes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Success message for binding creation.
pub const BINDING_CREATED: &str = "Binding created!";
/// Success message for notification delivery.
pub const NOTIFICATION_SENT: &str = "Notification Sent!";
/// Failure prefix for binding creation.
pub const BINDING_FAILED_PREFIX: &str = "Failed to create binding: ";
/// Failure prefix for notification delivery.
pub const NOTIFICATION_FAILED_PREFIX: &str = "Failed to send notification: ";

// ============================================================================
// SECTION: Result Envelope
// ============================================================================

/// Outcome of a single provider operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    /// Provider accepted the request.
    Success {
        /// Caller-facing message.
        message: String,
    },
    /// Provider rejected the request or could not be reached.
    Failure {
        /// Caller-facing message (prefix plus provider text).
        message: String,
        /// Raw provider error text.
        error: String,
    },
}

impl OperationResult {
    /// Builds a success result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    /// Builds a failure result whose message is `prefix` followed by `error`.
    #[must_use]
    pub fn failure(prefix: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        Self::Failure {
            message: format!("{prefix}{error}"),
            error,
        }
    }

    /// Returns true for [`OperationResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the caller-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success {
                message,
            }
            | Self::Failure {
                message,
                ..
            } => message,
        }
    }

    /// Returns the raw provider error text for failures.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success {
                ..
            } => None,
            Self::Failure {
                error,
                ..
            } => Some(error),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
