// crates/sdk-starter-providers/src/lib.rs
// ============================================================================
// Module: SDK Starter Providers
// Description: Provider clients for the notification gateway.
// Purpose: Implement `NotifyProvider` against the provider's REST API.
// Dependencies: sdk-starter-core, reqwest, url
// ============================================================================

//! ## Overview
//! Provider clients translate normalized request parameters into the wire
//! format an external service expects and map its responses back into
//! [`sdk_starter_core::NotifyError`]. Clients are built once at startup and
//! shared across request handlers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod form;
pub mod twilio;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use form::encode_form;
pub use form::wire_field_name;
pub use twilio::NotifyClientError;
pub use twilio::TwilioNotifyClient;
pub use twilio::TwilioNotifyConfig;
