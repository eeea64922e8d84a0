// crates/sdk-starter-core/src/core/grants.rs
// ============================================================================
// Module: Capability Grants
// Description: Service grants embedded in access tokens and their resolver.
// Purpose: Decide which capabilities a token carries from configured services.
// Dependencies: none
// ============================================================================

//! ## Overview
//! A [`CapabilityGrant`] authorizes one provider feature. Grants that need a
//! service identifier carry it by construction, so a grant without its
//! required scope cannot exist; the resolver omits it instead.
//!
//! [`resolve_grants`] always yields Video, then Conversations and Chat when
//! their identifiers are configured, then Sync scoped to the configured
//! service or [`DEFAULT_SYNC_SERVICE`].

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Sync scope used when no sync service is configured.
pub const DEFAULT_SYNC_SERVICE: &str = "default";

// ============================================================================
// SECTION: Grant Types
// ============================================================================

/// Scoped permission embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityGrant {
    /// Programmable video access, optionally pinned to one room.
    Video {
        /// Room name the token is limited to.
        room: Option<String>,
    },
    /// Legacy conversations access bound to a configuration profile.
    Conversations {
        /// Configuration profile identifier.
        configuration_profile_sid: String,
    },
    /// Chat access for one chat service.
    Chat {
        /// Chat service identifier.
        service_sid: String,
    },
    /// Sync access for one sync service.
    Sync {
        /// Sync service identifier.
        service_sid: String,
    },
}

impl CapabilityGrant {
    /// Returns the claim key used for this grant inside the token payload.
    #[must_use]
    pub const fn claim_key(&self) -> &'static str {
        match self {
            Self::Video {
                ..
            } => "video",
            Self::Conversations {
                ..
            } => "rtc",
            Self::Chat {
                ..
            } => "chat",
            Self::Sync {
                ..
            } => "data_sync",
        }
    }
}

/// Optional service identifiers that drive grant resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceScopes {
    /// Chat service identifier.
    pub chat_service_sid: Option<String>,
    /// Sync service identifier.
    pub sync_service_sid: Option<String>,
    /// Conversations configuration profile identifier.
    pub configuration_profile_sid: Option<String>,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves the grants a token carries for the given service scopes.
///
/// Blank identifiers count as absent.
#[must_use]
pub fn resolve_grants(scopes: &ServiceScopes) -> Vec<CapabilityGrant> {
    let mut grants = vec![CapabilityGrant::Video {
        room: None,
    }];
    if let Some(profile) = present(scopes.configuration_profile_sid.as_deref()) {
        grants.push(CapabilityGrant::Conversations {
            configuration_profile_sid: profile.to_string(),
        });
    }
    if let Some(service) = present(scopes.chat_service_sid.as_deref()) {
        grants.push(CapabilityGrant::Chat {
            service_sid: service.to_string(),
        });
    }
    let sync = present(scopes.sync_service_sid.as_deref()).unwrap_or(DEFAULT_SYNC_SERVICE);
    grants.push(CapabilityGrant::Sync {
        service_sid: sync.to_string(),
    });
    grants
}

/// Returns the trimmed value when it is non-empty.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
