// crates/sdk-starter-server/src/params.rs
// ============================================================================
// Module: Request Parameters
// Description: Merge query-string and body parameters into canonical form.
// Purpose: Give handlers one normalized mapping regardless of encoding.
// Dependencies: axum, sdk-starter-core, serde_json, url
// ============================================================================

//! ## Overview
//! Parameters are gathered from the query string first and the body second,
//! then normalized, so body values win on key collisions. JSON bodies must be
//! objects; any other content type is read as a URL-encoded form. Bodies are
//! read up to the configured byte limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use sdk_starter_core::NormalizedParams;
use sdk_starter_core::normalize;
use serde_json::Value;
use thiserror::Error;
use url::form_urlencoded;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request parameter extraction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// Body exceeded the configured limit or could not be read.
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    /// JSON body failed to parse.
    #[error("invalid json body: {0}")]
    InvalidJson(String),
    /// JSON body was not an object.
    #[error("json body must be an object")]
    NotAnObject,
}

impl ParamsError {
    /// Returns the HTTP status for this failure.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidJson(_) | Self::NotAnObject => StatusCode::BAD_REQUEST,
        }
    }
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Reads and normalizes all parameters carried by a request.
///
/// # Errors
///
/// Returns [`ParamsError`] when the body is too large or malformed.
pub async fn extract_params(
    request: Request,
    max_body_bytes: usize,
) -> Result<NormalizedParams, ParamsError> {
    let (parts, body) = request.into_parts();
    let mut raw: Vec<(String, Value)> = Vec::new();
    if let Some(query) = parts.uri.query() {
        raw.extend(form_pairs(query.as_bytes()));
    }
    let bytes = axum::body::to_bytes(body, max_body_bytes)
        .await
        .map_err(|_| ParamsError::TooLarge(max_body_bytes))?;
    if !bytes.is_empty() {
        if is_json(&parts.headers) {
            raw.extend(json_pairs(&bytes)?);
        } else {
            raw.extend(form_pairs(&bytes));
        }
    }
    Ok(normalize(raw))
}

/// Returns true when the request declares a JSON body.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

/// Decodes URL-encoded pairs as string values.
fn form_pairs(bytes: &[u8]) -> Vec<(String, Value)> {
    form_urlencoded::parse(bytes)
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect()
}

/// Decodes a JSON object into pairs in document order.
fn json_pairs(bytes: &[u8]) -> Result<Vec<(String, Value)>, ParamsError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(_) => Err(ParamsError::NotAnObject),
        Err(err) => Err(ParamsError::InvalidJson(err.to_string())),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
