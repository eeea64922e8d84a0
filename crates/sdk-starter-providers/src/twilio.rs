// crates/sdk-starter-providers/src/twilio.rs
// ============================================================================
// Module: Notify REST Client
// Description: reqwest-backed notification provider for the Notify API.
// Purpose: Create bindings and notifications with bounded, authenticated calls.
// Dependencies: sdk-starter-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`TwilioNotifyClient`] posts form-encoded payloads to
//! `{base_url}/v1/Services/{service_sid}/Bindings` and `/Notifications`
//! using HTTP basic auth with the API key and secret. One client is built at
//! startup and shared; calls are never retried.
//!
//! Non-2xx responses are decoded from the provider's JSON error document
//! (`code`, `message`, `more_info`, `status`). Response bodies are read up to
//! a fixed cap, so an oversized error body degrades to `HTTP <status>`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use sdk_starter_core::NormalizedParams;
use sdk_starter_core::NotifyError;
use sdk_starter_core::NotifyProvider;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::form::encode_form;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Production base URL of the Notify REST API.
pub const DEFAULT_NOTIFY_BASE_URL: &str = "https://notify.twilio.com";
/// Default request timeout.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);
/// Default response body cap in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024;
/// Form content type for provider requests.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Maximum length of a service identifier.
const MAX_SERVICE_SID_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Settings for [`TwilioNotifyClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct TwilioNotifyConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Notification service identifier.
    pub service_sid: String,
    /// API key identifier (basic auth user).
    pub api_key: String,
    /// API key secret (basic auth password).
    pub api_secret: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Allow cleartext `http://` base URLs.
    pub allow_http: bool,
    /// User agent for outbound requests.
    pub user_agent: String,
    /// Maximum response body size read from the provider.
    pub max_response_bytes: usize,
}

impl TwilioNotifyConfig {
    /// Builds settings with production defaults for the given service.
    #[must_use]
    pub fn new(
        service_sid: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_NOTIFY_BASE_URL.to_string(),
            service_sid: service_sid.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            timeout: DEFAULT_NOTIFY_TIMEOUT,
            allow_http: false,
            user_agent: concat!("sdk-starter/", env!("CARGO_PKG_VERSION")).to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl std::fmt::Debug for TwilioNotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioNotifyConfig")
            .field("base_url", &self.base_url)
            .field("service_sid", &self.service_sid)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("allow_http", &self.allow_http)
            .field("user_agent", &self.user_agent)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish()
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Notify REST API client.
pub struct TwilioNotifyClient {
    /// Bindings collection URL.
    bindings_url: String,
    /// Notifications collection URL.
    notifications_url: String,
    /// Basic auth user.
    api_key: String,
    /// Basic auth password.
    api_secret: String,
    /// Response body cap.
    max_response_bytes: usize,
    /// HTTP client configured with timeouts and no redirects.
    client: Client,
}

impl TwilioNotifyClient {
    /// Builds a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyClientError`] when settings are invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: TwilioNotifyConfig) -> Result<Self, NotifyClientError> {
        let base_url = validate_base_url(&config.base_url, config.allow_http)?;
        validate_service_sid(&config.service_sid)?;
        if config.api_key.trim().is_empty() || config.api_secret.trim().is_empty() {
            return Err(NotifyClientError::InvalidConfig(
                "api key and secret are required".to_string(),
            ));
        }
        if config.max_response_bytes == 0 {
            return Err(NotifyClientError::InvalidConfig(
                "max_response_bytes must be greater than zero".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| NotifyClientError::Build(err.to_string()))?;
        let service_url = format!("{base_url}/v1/Services/{}", config.service_sid);
        Ok(Self {
            bindings_url: format!("{service_url}/Bindings"),
            notifications_url: format!("{service_url}/Notifications"),
            api_key: config.api_key,
            api_secret: config.api_secret,
            max_response_bytes: config.max_response_bytes,
            client,
        })
    }

    /// Posts a form payload and maps the response.
    async fn post_form(&self, url: &str, payload: &NormalizedParams) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode_form(payload))
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = read_capped(response, self.max_response_bytes).await?;
        Err(rejection(status.as_u16(), body.as_deref()))
    }
}

#[async_trait]
impl NotifyProvider for TwilioNotifyClient {
    async fn create_binding(&self, payload: &NormalizedParams) -> Result<(), NotifyError> {
        self.post_form(&self.bindings_url, payload).await
    }

    async fn create_notification(&self, payload: &NormalizedParams) -> Result<(), NotifyError> {
        self.post_form(&self.notifications_url, payload).await
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client construction failures.
#[derive(Debug, Error)]
pub enum NotifyClientError {
    /// Settings are invalid.
    #[error("invalid notify client config: {0}")]
    InvalidConfig(String),
    /// The underlying HTTP client could not be built.
    #[error("notify client build failed: {0}")]
    Build(String),
}

/// Provider error document.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    /// Provider-specific error code.
    #[serde(default)]
    code: Option<u64>,
    /// Human-readable error text.
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates and trims the base URL.
fn validate_base_url(base_url: &str, allow_http: bool) -> Result<String, NotifyClientError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|_| NotifyClientError::InvalidConfig("base_url is invalid".to_string()))?;
    match url.scheme() {
        "https" => Ok(trimmed.to_string()),
        "http" if allow_http => Ok(trimmed.to_string()),
        "http" => Err(NotifyClientError::InvalidConfig(
            "base_url uses http:// without allow_http".to_string(),
        )),
        _ => Err(NotifyClientError::InvalidConfig(
            "base_url must use http:// or https://".to_string(),
        )),
    }
}

/// Validates the service identifier used as a path segment.
fn validate_service_sid(service_sid: &str) -> Result<(), NotifyClientError> {
    if service_sid.is_empty() || service_sid.len() > MAX_SERVICE_SID_LENGTH {
        return Err(NotifyClientError::InvalidConfig(
            "service_sid must be non-empty and within length limit".to_string(),
        ));
    }
    if !service_sid.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_')) {
        return Err(NotifyClientError::InvalidConfig(
            "service_sid must be alphanumeric".to_string(),
        ));
    }
    Ok(())
}

/// Maps a reqwest failure into a notify error.
fn map_transport_error(err: reqwest::Error) -> NotifyError {
    if err.is_timeout() {
        NotifyError::Timeout
    } else {
        NotifyError::Transport(err.to_string())
    }
}

/// Reads a response body up to `limit` bytes; `None` when the cap is exceeded.
async fn read_capped(mut response: Response, limit: usize) -> Result<Option<Vec<u8>>, NotifyError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(map_transport_error)? {
        if body.len() + chunk.len() > limit {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Some(body))
}

/// Builds the rejection error from a non-success response.
fn rejection(status: u16, body: Option<&[u8]>) -> NotifyError {
    let fallback = || NotifyError::Rejected {
        status,
        code: None,
        message: format!("HTTP {status}"),
    };
    let Some(body) = body else {
        return fallback();
    };
    if let Ok(document) = serde_json::from_slice::<ProviderErrorBody>(body)
        && let Some(message) = document.message.filter(|message| !message.trim().is_empty())
    {
        return NotifyError::Rejected {
            status,
            code: document.code,
            message,
        };
    }
    match std::str::from_utf8(body).map(str::trim) {
        Ok(text) if !text.is_empty() => NotifyError::Rejected {
            status,
            code: None,
            message: text.to_string(),
        },
        _ => fallback(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
