// crates/sdk-starter-core/src/lib.rs
// ============================================================================
// Module: SDK Starter Core Library
// Description: Public API surface for the SDK Starter core.
// Purpose: Expose token, grant, parameter, and notification gateway types.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! SDK Starter core holds the only logic of the demo backend that is worth a
//! contract: minting signed access tokens with configuration-driven capability
//! grants, normalizing inbound request fields, and translating notification
//! provider outcomes into a uniform result envelope. It is transport-agnostic;
//! the HTTP surface and the concrete provider client live in sibling crates.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::NotifyError;
pub use interfaces::NotifyProvider;
pub use runtime::NotificationGateway;
