// crates/sdk-starter-config/src/lib.rs
// ============================================================================
// Module: SDK Starter Config Library
// Description: Canonical config model, environment overlay, and validation.
// Purpose: Single source of truth for sdk-starter.toml semantics.
// Dependencies: sdk-starter-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `sdk-starter-config` defines the configuration model for the SDK Starter
//! backend. Values come from an optional TOML file overlaid with the
//! provider's conventional environment variables, then pass strict,
//! fail-closed validation before the server or CLI uses them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod diagnostics;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use diagnostics::ConfigDiagnostics;
