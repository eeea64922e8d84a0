// crates/sdk-starter-core/src/core/token.rs
// ============================================================================
// Module: Access Tokens
// Description: Signed, time-bounded access tokens with capability grants.
// Purpose: Mint and verify HS256 JWTs in the provider's access token format.
// Dependencies: jsonwebtoken, serde, thiserror, time
// ============================================================================

//! ## Overview
//! An [`AccessToken`] binds an [`Identity`] to an ordered set of
//! [`CapabilityGrant`] values and a lifetime. Serialization signs the payload
//! with the API key secret from [`SigningCredentials`]; there is no path that
//! yields an unsigned token.
//!
//! Payload layout: `jti` is `"{api_key}-{iat}"`, `iss` is the API key, `sub`
//! is the account, and `grants` holds the identity followed by one entry per
//! grant. The header carries the `twilio-fpa;v=1` content type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::grants::CapabilityGrant;
use crate::core::identity::Identity;
use crate::core::identity::IdentityError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3_600;
/// Maximum token lifetime accepted by the provider, in seconds.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 86_400;
/// JWT content type for provider access tokens.
pub const TOKEN_CONTENT_TYPE: &str = "twilio-fpa;v=1";

// ============================================================================
// SECTION: Signing Credentials
// ============================================================================

/// Account-level credentials used to sign access tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    /// Account identifier (token subject claim).
    account_sid: String,
    /// API key identifier (token issuer claim).
    api_key: String,
    /// API key secret (HMAC key).
    api_secret: String,
}

impl SigningCredentials {
    /// Builds signing credentials, rejecting blank fields.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Credentials`] when any field is blank.
    pub fn new(
        account_sid: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let account_sid = account_sid.into();
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        for (field, value) in
            [("account_sid", &account_sid), ("api_key", &api_key), ("api_secret", &api_secret)]
        {
            if value.trim().is_empty() {
                return Err(TokenError::Credentials(format!("{field} is required")));
            }
        }
        Ok(Self {
            account_sid,
            api_key,
            api_secret,
        })
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// Returns the API key identifier.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the API key secret.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("account_sid", &self.account_sid)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Claims
// ============================================================================

/// Decoded access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Token identifier.
    pub jti: String,
    /// Issuer (API key identifier).
    pub iss: String,
    /// Subject (account identifier).
    pub sub: String,
    /// Issued-at time in unix seconds.
    pub iat: u64,
    /// Expiry time in unix seconds.
    pub exp: u64,
    /// Identity and capability grants.
    pub grants: TokenGrants,
}

/// Grant section of the token payload.
///
/// Field order matches resolver order so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrants {
    /// Token subject identity.
    pub identity: String,
    /// Video grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoClaim>,
    /// Conversations grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtc: Option<ConversationsClaim>,
    /// Chat grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ServiceClaim>,
    /// Sync grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sync: Option<ServiceClaim>,
}

/// Video grant payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoClaim {
    /// Room the token is limited to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

/// Conversations grant payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationsClaim {
    /// Configuration profile identifier.
    pub configuration_profile_sid: String,
}

/// Service-scoped grant payload (chat, sync).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceClaim {
    /// Service identifier.
    pub service_sid: String,
}

impl TokenGrants {
    /// Builds the grant section from an identity and grant list.
    ///
    /// A later grant of the same kind replaces an earlier one.
    #[must_use]
    pub fn from_grants(identity: &Identity, grants: &[CapabilityGrant]) -> Self {
        let mut section = Self {
            identity: identity.as_str().to_string(),
            video: None,
            rtc: None,
            chat: None,
            data_sync: None,
        };
        for grant in grants {
            match grant {
                CapabilityGrant::Video {
                    room,
                } => {
                    section.video = Some(VideoClaim {
                        room: room.clone(),
                    });
                }
                CapabilityGrant::Conversations {
                    configuration_profile_sid,
                } => {
                    section.rtc = Some(ConversationsClaim {
                        configuration_profile_sid: configuration_profile_sid.clone(),
                    });
                }
                CapabilityGrant::Chat {
                    service_sid,
                } => {
                    section.chat = Some(ServiceClaim {
                        service_sid: service_sid.clone(),
                    });
                }
                CapabilityGrant::Sync {
                    service_sid,
                } => {
                    section.data_sync = Some(ServiceClaim {
                        service_sid: service_sid.clone(),
                    });
                }
            }
        }
        section
    }

    /// Returns the grants carried by the payload in canonical order.
    #[must_use]
    pub fn capabilities(&self) -> Vec<CapabilityGrant> {
        let mut grants = Vec::new();
        if let Some(video) = &self.video {
            grants.push(CapabilityGrant::Video {
                room: video.room.clone(),
            });
        }
        if let Some(rtc) = &self.rtc {
            grants.push(CapabilityGrant::Conversations {
                configuration_profile_sid: rtc.configuration_profile_sid.clone(),
            });
        }
        if let Some(chat) = &self.chat {
            grants.push(CapabilityGrant::Chat {
                service_sid: chat.service_sid.clone(),
            });
        }
        if let Some(sync) = &self.data_sync {
            grants.push(CapabilityGrant::Sync {
                service_sid: sync.service_sid.clone(),
            });
        }
        grants
    }
}

// ============================================================================
// SECTION: Access Token
// ============================================================================

/// Unsigned access token description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Token subject.
    identity: Identity,
    /// Lifetime in seconds.
    ttl_seconds: u64,
    /// Ordered capability grants.
    grants: Vec<CapabilityGrant>,
}

impl AccessToken {
    /// Creates a token with the default lifetime and no grants.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self {
            identity,
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            grants: Vec::new(),
        }
    }

    /// Sets the token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidTtl`] when the lifetime is zero or above
    /// [`MAX_TOKEN_TTL_SECONDS`].
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Result<Self, TokenError> {
        if ttl_seconds == 0 || ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(TokenError::InvalidTtl(ttl_seconds));
        }
        self.ttl_seconds = ttl_seconds;
        Ok(self)
    }

    /// Appends a capability grant.
    #[must_use]
    pub fn with_grant(mut self, grant: CapabilityGrant) -> Self {
        self.grants.push(grant);
        self
    }

    /// Appends several capability grants in order.
    #[must_use]
    pub fn with_grants(mut self, grants: impl IntoIterator<Item = CapabilityGrant>) -> Self {
        self.grants.extend(grants);
        self
    }

    /// Builds the payload for a token issued at `issued_at` (unix seconds).
    #[must_use]
    pub fn claims_at(&self, credentials: &SigningCredentials, issued_at: u64) -> AccessTokenClaims {
        AccessTokenClaims {
            jti: format!("{}-{issued_at}", credentials.api_key()),
            iss: credentials.api_key().to_string(),
            sub: credentials.account_sid().to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_seconds),
            grants: TokenGrants::from_grants(&self.identity, &self.grants),
        }
    }

    /// Signs the token using the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] when the clock is unusable or signing fails.
    pub fn to_jwt(&self, credentials: &SigningCredentials) -> Result<String, TokenError> {
        self.to_jwt_at(credentials, unix_now()?)
    }

    /// Signs the token as if issued at `issued_at` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when encoding fails.
    pub fn to_jwt_at(
        &self,
        credentials: &SigningCredentials,
        issued_at: u64,
    ) -> Result<String, TokenError> {
        let claims = self.claims_at(credentials, issued_at);
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        header.cty = Some(TOKEN_CONTENT_TYPE.to_string());
        let key = EncodingKey::from_secret(credentials.api_secret().as_bytes());
        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|err| TokenError::Signing(err.to_string()))
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Issues a signed token for `identity` carrying `grants`.
///
/// When `ttl_seconds` is `None` the default lifetime applies.
///
/// # Errors
///
/// Returns [`TokenError`] when the identity or lifetime is invalid or signing
/// fails.
pub fn issue_token(
    identity: &str,
    grants: &[CapabilityGrant],
    credentials: &SigningCredentials,
    ttl_seconds: Option<u64>,
) -> Result<String, TokenError> {
    build_token(identity, grants, ttl_seconds)?.to_jwt(credentials)
}

/// Issues a signed token with an explicit issue time (unix seconds).
///
/// # Errors
///
/// Returns [`TokenError`] when the identity or lifetime is invalid or signing
/// fails.
pub fn issue_token_at(
    identity: &str,
    grants: &[CapabilityGrant],
    credentials: &SigningCredentials,
    ttl_seconds: Option<u64>,
    issued_at: u64,
) -> Result<String, TokenError> {
    build_token(identity, grants, ttl_seconds)?.to_jwt_at(credentials, issued_at)
}

/// Verifies a token signature and expiry, returning its claims.
///
/// # Errors
///
/// Returns [`TokenError::Verify`] when the token is malformed, expired, or
/// signed with a different secret.
pub fn verify_token(token: &str, api_secret: &str) -> Result<AccessTokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let key = DecodingKey::from_secret(api_secret.as_bytes());
    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|err| TokenError::Verify(err.to_string()))
}

/// Assembles an unsigned token from request inputs.
fn build_token(
    identity: &str,
    grants: &[CapabilityGrant],
    ttl_seconds: Option<u64>,
) -> Result<AccessToken, TokenError> {
    let identity = Identity::new(identity)?;
    let token = AccessToken::new(identity).with_grants(grants.iter().cloned());
    match ttl_seconds {
        Some(ttl) => token.with_ttl(ttl),
        None => Ok(token),
    }
}

/// Returns the current unix time in seconds.
fn unix_now() -> Result<u64, TokenError> {
    u64::try_from(OffsetDateTime::now_utc().unix_timestamp())
        .map_err(|_| TokenError::Signing("system clock is before the unix epoch".to_string()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Access token failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Identity failed validation.
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),
    /// Lifetime outside the accepted range.
    #[error("invalid token ttl: {0}s")]
    InvalidTtl(u64),
    /// Signing credentials are missing or malformed.
    #[error("signing credentials error: {0}")]
    Credentials(String),
    /// Encoding or signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
    /// Decoding or verification failed.
    #[error("token verification failed: {0}")]
    Verify(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only assertions use unwrap/expect for clarity."
    )]

    use super::AccessToken;
    use super::SigningCredentials;
    use super::TokenError;
    use crate::core::grants::CapabilityGrant;
    use crate::core::identity::Identity;

    fn credentials() -> SigningCredentials {
        SigningCredentials::new("AC123", "SK456", "shh").unwrap()
    }

    #[test]
    fn credentials_reject_blank_fields() {
        let err = SigningCredentials::new("AC123", " ", "secret").unwrap_err();
        assert_eq!(err, TokenError::Credentials("api_key is required".to_string()));
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("AC123"));
        assert!(!rendered.contains("shh"));
    }

    #[test]
    fn claims_follow_provider_layout() {
        let token = AccessToken::new(Identity::new("alice").unwrap())
            .with_ttl(600)
            .unwrap()
            .with_grant(CapabilityGrant::Video {
                room: None,
            });
        let claims = token.claims_at(&credentials(), 1_700_000_000);
        assert_eq!(claims.jti, "SK456-1700000000");
        assert_eq!(claims.iss, "SK456");
        assert_eq!(claims.sub, "AC123");
        assert_eq!(claims.exp, 1_700_000_600);
        let payload = serde_json::to_string(&claims.grants).unwrap();
        assert_eq!(payload, r#"{"identity":"alice","video":{}}"#);
    }

    #[test]
    fn ttl_bounds_are_enforced() {
        let token = AccessToken::new(Identity::new("alice").unwrap());
        assert_eq!(token.clone().with_ttl(0).unwrap_err(), TokenError::InvalidTtl(0));
        assert_eq!(token.with_ttl(86_401).unwrap_err(), TokenError::InvalidTtl(86_401));
    }
}
