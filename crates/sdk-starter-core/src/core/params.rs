// crates/sdk-starter-core/src/core/params.rs
// ============================================================================
// Module: Parameter Normalization
// Description: Canonical field naming for provider-bound request payloads.
// Purpose: Rewrite inbound keys into lower-case, underscore-separated form.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Inbound requests arrive with mixed key conventions (`BindingType`,
//! `binding_type`, `binding-type`). [`normalize`] rewrites every key with
//! [`normalize_key`] and keeps values untouched. Field names and values are
//! not validated; the provider rejects what it does not understand.
//!
//! Key rule:
//! 1. `-`, `.` and spaces become `_`.
//! 2. `_` is inserted before an upper-case letter that follows a lower-case
//!    letter or digit, and before an upper-case letter that follows another
//!    upper-case letter and precedes a lower-case one (`HTTPServer` becomes
//!    `http_server`).
//! 3. Output is lower-cased, `_` runs collapse, and edge `_` are trimmed.
//!
//! Keys that collide after rewriting resolve last-write-wins by input order.
//! Keys that rewrite to the empty string are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Normalized Parameters
// ============================================================================

/// Request parameters keyed by canonical field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedParams(BTreeMap<String, Value>);

impl NormalizedParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value for a canonical key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value for a canonical key when it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns true when the canonical key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a value under a key that is already canonical.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates parameters in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Consumes the set and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl<'a> IntoIterator for &'a NormalizedParams {
    type IntoIter = btree_map::Iter<'a, String, Value>;
    type Item = (&'a String, &'a Value);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes ordered raw parameters into canonical form.
pub fn normalize<I, K>(raw: I) -> NormalizedParams
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut params = NormalizedParams::new();
    for (key, value) in raw {
        let canonical = normalize_key(key.as_ref());
        if canonical.is_empty() {
            continue;
        }
        params.insert(canonical, value);
    }
    params
}

/// Rewrites one key into canonical lower-case, underscore-separated form.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (index, &ch) in chars.iter().enumerate() {
        if matches!(ch, '_' | '-' | '.' | ' ') {
            push_separator(&mut out);
            continue;
        }
        if ch.is_uppercase() {
            let prev = index.checked_sub(1).and_then(|prev| chars.get(prev)).copied();
            let next = chars.get(index + 1).copied();
            let boundary = match prev {
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary {
                push_separator(&mut out);
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    let trimmed = out.trim_end_matches('_').len();
    out.truncate(trimmed);
    out
}

/// Appends a separator unless the output is empty or already separated.
fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
