// crates/sdk-starter-core/src/runtime/mod.rs
// ============================================================================
// Module: SDK Starter Runtime
// Description: Request-time services built over core types and interfaces.
// Purpose: Host the notification gateway.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime services are stateless between calls. Each holds only shared,
//! read-only handles built at startup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod gateway;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use gateway::NotificationGateway;
