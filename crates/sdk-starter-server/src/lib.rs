// crates/sdk-starter-server/src/lib.rs
// ============================================================================
// Module: SDK Starter Server Library
// Description: HTTP surface for token issuance and notification relay.
// Purpose: Expose the demo backend routes over axum.
// Dependencies: axum, tokio, tower-http, sdk-starter-{core,config,providers}
// ============================================================================

//! ## Overview
//! `sdk-starter-server` serves the demo pages and the JSON endpoints:
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET /token` | token for a generated username |
//! | `POST /token` | token for the supplied `identity` |
//! | `POST /register` | create a device binding |
//! | `POST /send-notification` | send a notification |
//! | `GET /config` | redacted configuration view |
//!
//! Section index paths redirect to their `index.html`; everything else is
//! served from the public directory.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod params;
pub mod routes;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::RequestOutcome;
pub use audit::StarterAuditSink;
pub use audit::StderrAuditSink;
pub use params::ParamsError;
pub use routes::TOKEN_FAILED_PREFIX;
pub use routes::TokenResponse;
pub use server::StarterServer;
pub use server::StarterServerError;
