// crates/sdk-starter-core/src/core/mod.rs
// ============================================================================
// Module: SDK Starter Core Types
// Description: Identity, grant, token, parameter, and outcome types.
// Purpose: Group the request-scoped data model under one namespace.
// Dependencies: serde, serde_json, jsonwebtoken, rand, time
// ============================================================================

//! ## Overview
//! Core types are immutable once built and carry no shared state. Every value
//! here lives for the duration of a single request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod grants;
pub mod identity;
pub mod outcome;
pub mod params;
pub mod token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use grants::CapabilityGrant;
pub use grants::DEFAULT_SYNC_SERVICE;
pub use grants::ServiceScopes;
pub use grants::resolve_grants;
pub use identity::Identity;
pub use identity::IdentityError;
pub use identity::MAX_IDENTITY_LENGTH;
pub use identity::generate_identity;
pub use identity::random_identity;
pub use outcome::BINDING_CREATED;
pub use outcome::BINDING_FAILED_PREFIX;
pub use outcome::NOTIFICATION_FAILED_PREFIX;
pub use outcome::NOTIFICATION_SENT;
pub use outcome::OperationResult;
pub use params::NormalizedParams;
pub use params::normalize;
pub use params::normalize_key;
pub use token::AccessToken;
pub use token::AccessTokenClaims;
pub use token::DEFAULT_TOKEN_TTL_SECONDS;
pub use token::MAX_TOKEN_TTL_SECONDS;
pub use token::SigningCredentials;
pub use token::TOKEN_CONTENT_TYPE;
pub use token::TokenError;
pub use token::TokenGrants;
pub use token::issue_token;
pub use token::issue_token_at;
pub use token::verify_token;
