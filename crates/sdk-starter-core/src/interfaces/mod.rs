// crates/sdk-starter-core/src/interfaces/mod.rs
// ============================================================================
// Module: SDK Starter Interfaces
// Description: Backend-agnostic interface for the notification provider.
// Purpose: Decouple the gateway from the concrete REST client.
// Dependencies: async-trait, thiserror
// ============================================================================

//! ## Overview
//! [`NotifyProvider`] is the seam between the notification gateway and the
//! external service. Implementations must be safe to share across concurrent
//! request handlers and must surface every failure, including timeouts, as a
//! [`NotifyError`] rather than panicking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::params::NormalizedParams;

// ============================================================================
// SECTION: Notify Provider
// ============================================================================

/// External notification service.
#[async_trait]
pub trait NotifyProvider: Send + Sync {
    /// Registers a device binding.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the provider rejects or cannot serve the
    /// request.
    async fn create_binding(&self, payload: &NormalizedParams) -> Result<(), NotifyError>;

    /// Sends a notification to every binding matching the payload.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the provider rejects or cannot serve the
    /// request.
    async fn create_notification(&self, payload: &NormalizedParams) -> Result<(), NotifyError>;
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Notification provider failures.
///
/// The display form is the raw provider error text surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// Provider answered with a non-success status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Provider error code when reported.
        code: Option<u64>,
        /// Provider error text.
        message: String,
    },
    /// Request did not complete within the configured timeout.
    #[error("request to notification service timed out")]
    Timeout,
    /// Network or protocol failure before a response was received.
    #[error("{0}")]
    Transport(String),
}
