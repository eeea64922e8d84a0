// crates/sdk-starter-providers/src/form.rs
// ============================================================================
// Module: Provider Form Encoding
// Description: Encode normalized parameters as provider form fields.
// Purpose: Map snake_case keys and JSON values onto the REST wire format.
// Dependencies: sdk-starter-core, serde_json, url
// ============================================================================

//! ## Overview
//! The REST API accepts `application/x-www-form-urlencoded` bodies with
//! PascalCase field names. Values render as follows:
//! - strings pass through unchanged
//! - numbers and booleans use their display form
//! - arrays repeat the field once per element
//! - objects are sent as JSON text
//! - nulls are omitted

// ============================================================================
// SECTION: Imports
// ============================================================================

use sdk_starter_core::NormalizedParams;
use serde_json::Value;
use url::form_urlencoded::Serializer;

// ============================================================================
// SECTION: Field Names
// ============================================================================

/// Converts a canonical snake_case key into the provider's PascalCase name.
#[must_use]
pub fn wire_field_name(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Encodes normalized parameters as an ordered list of wire fields.
#[must_use]
pub fn wire_fields(params: &NormalizedParams) -> Vec<(String, String)> {
    let mut fields = Vec::with_capacity(params.len());
    for (key, value) in params {
        let name = wire_field_name(key);
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(rendered) = render_value(item) {
                        fields.push((name.clone(), rendered));
                    }
                }
            }
            other => {
                if let Some(rendered) = render_value(other) {
                    fields.push((name, rendered));
                }
            }
        }
    }
    fields
}

/// Encodes normalized parameters as a URL-encoded form body.
#[must_use]
pub fn encode_form(params: &NormalizedParams) -> String {
    let mut serializer = Serializer::new(String::new());
    for (name, value) in wire_fields(params) {
        serializer.append_pair(&name, &value);
    }
    serializer.finish()
}

/// Renders a scalar or nested value; `None` for null.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
