// crates/sdk-starter-core/src/core/identity.rs
// ============================================================================
// Module: Token Identities
// Description: Validated token subjects and random username generation.
// Purpose: Provide the identity embedded in every issued access token.
// Dependencies: rand, serde, thiserror
// ============================================================================

//! ## Overview
//! An [`Identity`] names the subject of an access token. Identities are either
//! supplied by the caller or generated as pseudo-random usernames. Uniqueness
//! is not enforced here; the provider owns that concern.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum identity length in bytes.
pub const MAX_IDENTITY_LENGTH: usize = 256;

/// Given names used by the username generator.
const GIVEN_NAMES: &[&str] = &[
    "ada", "alan", "alice", "barbara", "bob", "carol", "dave", "edsger", "erin", "frances",
    "grace", "hedy", "ivan", "jean", "ken", "linus", "margaret", "niklaus", "olivia", "peggy",
    "radia", "sophie", "tim", "yukihiro",
];

/// Family names used by the username generator.
const FAMILY_NAMES: &[&str] = &[
    "allen", "babbage", "backus", "cerf", "dijkstra", "engelbart", "goldberg", "hamilton",
    "hopper", "kahn", "knuth", "lamarr", "lamport", "liskov", "lovelace", "mccarthy", "perlman",
    "ritchie", "stroustrup", "sutherland", "thompson", "torvalds", "turing", "wirth",
];

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Validated, non-empty token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Creates a validated identity from the trimmed value.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the value is blank, too long, or holds
    /// control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return Err(IdentityError::Empty);
        }
        if value.len() > MAX_IDENTITY_LENGTH {
            return Err(IdentityError::TooLong {
                max: MAX_IDENTITY_LENGTH,
            });
        }
        if value.chars().any(char::is_control) {
            return Err(IdentityError::ControlCharacter);
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identity {
    type Error = IdentityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

/// Identity validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Identity is empty or whitespace only.
    #[error("identity is required")]
    Empty,
    /// Identity exceeds the byte limit.
    #[error("identity exceeds {max} bytes")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Identity contains control characters.
    #[error("identity contains control characters")]
    ControlCharacter,
}

// ============================================================================
// SECTION: Username Generation
// ============================================================================

/// Generates a pseudo-random username from the supplied RNG.
///
/// Usernames take one of three shapes: `given.family`, `given_family`, or
/// `given` followed by two digits.
pub fn generate_identity<R: Rng + ?Sized>(rng: &mut R) -> Identity {
    let given = GIVEN_NAMES.choose(rng).copied().unwrap_or("guest");
    let family = FAMILY_NAMES.choose(rng).copied().unwrap_or("user");
    let username = match rng.gen_range(0..3_u8) {
        0 => format!("{given}.{family}"),
        1 => format!("{given}_{family}"),
        _ => format!("{given}{:02}", rng.gen_range(0..100_u8)),
    };
    Identity(username)
}

/// Generates a pseudo-random username using the thread-local RNG.
#[must_use]
pub fn random_identity() -> Identity {
    generate_identity(&mut rand::thread_rng())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions use unwrap/expect for clarity."
    )]

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Identity;
    use super::IdentityError;
    use super::MAX_IDENTITY_LENGTH;
    use super::generate_identity;

    #[test]
    fn blank_identity_is_rejected() {
        assert_eq!(Identity::new("   "), Err(IdentityError::Empty));
        assert_eq!(Identity::new(""), Err(IdentityError::Empty));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let identity = Identity::new("  alice\t").unwrap();
        assert_eq!(identity.as_str(), "alice");
        assert_eq!(Identity::new("alice").unwrap(), identity);
    }

    #[test]
    fn oversized_identity_is_rejected() {
        let value = "a".repeat(MAX_IDENTITY_LENGTH + 1);
        assert!(matches!(Identity::new(value), Err(IdentityError::TooLong { .. })));
    }

    #[test]
    fn control_characters_are_rejected() {
        assert_eq!(Identity::new("ali\nce"), Err(IdentityError::ControlCharacter));
    }

    #[test]
    fn generated_usernames_are_valid_identities() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let identity = generate_identity(&mut rng);
            let revalidated = Identity::new(identity.as_str()).unwrap();
            assert_eq!(revalidated, identity);
            assert!(identity.as_str().chars().all(|ch| ch.is_ascii_lowercase()
                || ch.is_ascii_digit()
                || ch == '.'
                || ch == '_'));
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let first = generate_identity(&mut StdRng::seed_from_u64(42));
        let second = generate_identity(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
