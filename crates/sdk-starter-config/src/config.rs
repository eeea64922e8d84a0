// crates/sdk-starter-config/src/config.rs
// ============================================================================
// Module: SDK Starter Configuration
// Description: Configuration loading, environment overlay, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: sdk-starter-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is resolved in three layers:
//! 1. Built-in defaults.
//! 2. An optional TOML file (`--config`, then `SDK_STARTER_CONFIG`, then
//!    `sdk-starter.toml` when present in the working directory).
//! 3. The provider's conventional `TWILIO_*` environment variables, which
//!    override file values when set to a non-empty string.
//!
//! The merged result is validated before use. Missing signing credentials or
//! a missing notification service identifier fail startup rather than
//! individual requests. Offline token signing uses
//! [`StarterConfig::load_for_signing`], which checks only the signing fields
//! and token settings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use sdk_starter_core::DEFAULT_TOKEN_TTL_SECONDS;
use sdk_starter_core::MAX_TOKEN_TTL_SECONDS;
use sdk_starter_core::ServiceScopes;
use sdk_starter_core::SigningCredentials;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::diagnostics::ConfigDiagnostics;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "sdk-starter.toml";
/// Environment variable naming an explicit config path.
pub const CONFIG_ENV_VAR: &str = "SDK_STARTER_CONFIG";
/// Environment variable for the account identifier.
pub const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
/// Environment variable for the API key identifier.
pub const ENV_API_KEY: &str = "TWILIO_API_KEY";
/// Environment variable for the API key secret.
pub const ENV_API_SECRET: &str = "TWILIO_API_SECRET";
/// Environment variable for the notification service identifier.
pub const ENV_NOTIFICATION_SERVICE_SID: &str = "TWILIO_NOTIFICATION_SERVICE_SID";
/// Environment variable for the chat service identifier.
pub const ENV_CHAT_SERVICE_SID: &str = "TWILIO_CHAT_SERVICE_SID";
/// Environment variable for the sync service identifier.
pub const ENV_SYNC_SERVICE_SID: &str = "TWILIO_SYNC_SERVICE_SID";
/// Environment variable for the conversations configuration profile.
pub const ENV_CONFIGURATION_SID: &str = "TWILIO_CONFIGURATION_SID";

/// Maximum config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a provider identifier.
pub(crate) const MAX_IDENTIFIER_LENGTH: usize = 64;
/// Maximum length of the API secret.
pub(crate) const MAX_SECRET_LENGTH: usize = 256;
/// Maximum length of the outbound user agent.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;
/// Minimum accepted request body limit.
pub(crate) const MIN_MAX_BODY_BYTES: usize = 1024;
/// Maximum accepted request body limit.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Minimum provider request timeout.
pub(crate) const MIN_NOTIFY_TIMEOUT_MS: u64 = 100;
/// Maximum provider request timeout.
pub(crate) const MAX_NOTIFY_TIMEOUT_MS: u64 = 60_000;
/// Minimum provider response cap.
pub(crate) const MIN_NOTIFY_RESPONSE_BYTES: usize = 1024;
/// Maximum provider response cap.
pub(crate) const MAX_NOTIFY_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Top-Level Config
// ============================================================================

/// SDK Starter configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StarterConfig {
    /// HTTP surface configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Provider account and service identifiers.
    #[serde(default)]
    pub twilio: TwilioConfig,
    /// Access token settings.
    #[serde(default)]
    pub token: TokenConfig,
    /// Notification REST client settings.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Request audit logging.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl StarterConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| env::var(name).ok())
    }

    /// Loads configuration using an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::resolve_with(path, lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration for token signing using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading fails or a signing field is
    /// invalid.
    pub fn load_for_signing(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_for_signing_with(path, |name| env::var(name).ok())
    }

    /// Loads configuration for token signing using an explicit lookup.
    ///
    /// Sections that only the HTTP server needs are left unchecked.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading fails or a signing field is
    /// invalid.
    pub fn load_for_signing_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::resolve_with(path, lookup)?;
        config.validate_signing()?;
        Ok(config)
    }

    /// Merges the config file and environment without validating.
    fn resolve_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match resolve_path(path, &lookup)? {
            Some(resolved) => Self::from_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_env(&lookup);
        Ok(config)
    }

    /// Parses a config file without applying the environment or validating.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Overlays non-empty `TWILIO_*` variables onto the provider section.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let twilio = &mut self.twilio;
        for (name, slot) in [
            (ENV_ACCOUNT_SID, &mut twilio.account_sid),
            (ENV_API_KEY, &mut twilio.api_key),
            (ENV_API_SECRET, &mut twilio.api_secret),
            (ENV_NOTIFICATION_SERVICE_SID, &mut twilio.notification_service_sid),
            (ENV_CHAT_SERVICE_SID, &mut twilio.chat_service_sid),
            (ENV_SYNC_SERVICE_SID, &mut twilio.sync_service_sid),
            (ENV_CONFIGURATION_SID, &mut twilio.configuration_profile_sid),
        ] {
            if let Some(value) = read(name) {
                *slot = Some(value);
            }
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.twilio.validate()?;
        self.token.validate()?;
        self.notify.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Validates only what offline token signing reads.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a signing field or the token section is
    /// invalid.
    pub fn validate_signing(&self) -> Result<(), ConfigError> {
        self.twilio.validate_signing()?;
        self.token.validate()
    }

    /// Returns signing credentials for access tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any signing field is missing.
    pub fn signing_credentials(&self) -> Result<SigningCredentials, ConfigError> {
        let twilio = &self.twilio;
        SigningCredentials::new(
            required("twilio.account_sid", twilio.account_sid.as_deref())?,
            required("twilio.api_key", twilio.api_key.as_deref())?,
            required("twilio.api_secret", twilio.api_secret.as_deref())?,
        )
        .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Returns the notification service identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the identifier is missing.
    pub fn notification_service_sid(&self) -> Result<&str, ConfigError> {
        required(
            "twilio.notification_service_sid",
            self.twilio.notification_service_sid.as_deref(),
        )
    }

    /// Returns the optional service scopes that drive grant resolution.
    #[must_use]
    pub fn service_scopes(&self) -> ServiceScopes {
        ServiceScopes {
            chat_service_sid: self.twilio.chat_service_sid.clone(),
            sync_service_sid: self.twilio.sync_service_sid.clone(),
            configuration_profile_sid: self.twilio.configuration_profile_sid.clone(),
        }
    }

    /// Returns the configuration diagnostics view.
    #[must_use]
    pub fn diagnostics(&self) -> ConfigDiagnostics {
        ConfigDiagnostics::from_config(self)
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP surface configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory served for static demo pages.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            public_dir: default_public_dir(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is invalid: {}", self.bind)))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        validate_path_string("server.public_dir", &self.public_dir)?;
        if !(MIN_MAX_BODY_BYTES..=MAX_MAX_BODY_BYTES).contains(&self.max_body_bytes) {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between {MIN_MAX_BODY_BYTES} and \
                 {MAX_MAX_BODY_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Provider Identifiers
// ============================================================================

/// Provider account and service identifiers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    /// Account identifier.
    #[serde(default)]
    pub account_sid: Option<String>,
    /// API key identifier.
    #[serde(default)]
    pub api_key: Option<String>,
    /// API key secret.
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Notification service identifier.
    #[serde(default)]
    pub notification_service_sid: Option<String>,
    /// Optional chat service identifier.
    #[serde(default)]
    pub chat_service_sid: Option<String>,
    /// Optional sync service identifier.
    #[serde(default)]
    pub sync_service_sid: Option<String>,
    /// Optional conversations configuration profile identifier.
    #[serde(default)]
    pub configuration_profile_sid: Option<String>,
}

impl TwilioConfig {
    /// Validates provider identifiers.
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_signing()?;
        let field = "twilio.notification_service_sid";
        validate_identifier(field, required(field, self.notification_service_sid.as_deref())?)
    }

    /// Validates the signing credentials and optional grant scopes.
    fn validate_signing(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("twilio.account_sid", &self.account_sid),
            ("twilio.api_key", &self.api_key),
        ] {
            validate_identifier(field, required(field, value.as_deref())?)?;
        }
        let secret = required("twilio.api_secret", self.api_secret.as_deref())?;
        if secret.len() > MAX_SECRET_LENGTH {
            return Err(ConfigError::Invalid("twilio.api_secret exceeds max length".to_string()));
        }
        for (field, value) in [
            ("twilio.chat_service_sid", &self.chat_service_sid),
            ("twilio.sync_service_sid", &self.sync_service_sid),
            ("twilio.configuration_profile_sid", &self.configuration_profile_sid),
        ] {
            if let Some(value) = value.as_deref().filter(|value| !value.trim().is_empty()) {
                validate_identifier(field, value)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Token
// ============================================================================

/// Access token settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// Token lifetime in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

impl TokenConfig {
    /// Validates token settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&self.ttl_seconds) {
            return Err(ConfigError::Invalid(format!(
                "token.ttl_seconds must be between 1 and {MAX_TOKEN_TTL_SECONDS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Notify Client
// ============================================================================

/// Notification REST client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Base URL of the notification REST API.
    #[serde(default = "default_notify_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_notify_timeout_ms")]
    pub timeout_ms: u64,
    /// Allow cleartext `http://` base URLs (explicit opt-in).
    #[serde(default)]
    pub allow_http: bool,
    /// User agent sent on outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum provider response size in bytes.
    #[serde(default = "default_notify_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            base_url: default_notify_base_url(),
            timeout_ms: default_notify_timeout_ms(),
            allow_http: false,
            user_agent: default_user_agent(),
            max_response_bytes: default_notify_max_response_bytes(),
        }
    }
}

impl NotifyConfig {
    /// Validates notify client settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|_| ConfigError::Invalid("notify.base_url is invalid".to_string()))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            "http" => {
                return Err(ConfigError::Invalid(
                    "notify.base_url uses http:// without allow_http".to_string(),
                ));
            }
            _ => {
                return Err(ConfigError::Invalid(
                    "notify.base_url must use http:// or https://".to_string(),
                ));
            }
        }
        if !(MIN_NOTIFY_TIMEOUT_MS..=MAX_NOTIFY_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "notify.timeout_ms must be between {MIN_NOTIFY_TIMEOUT_MS} and \
                 {MAX_NOTIFY_TIMEOUT_MS}"
            )));
        }
        let agent = self.user_agent.trim();
        if agent.is_empty() || agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(
                "notify.user_agent must be non-empty and within length limit".to_string(),
            ));
        }
        if !(MIN_NOTIFY_RESPONSE_BYTES..=MAX_NOTIFY_RESPONSE_BYTES)
            .contains(&self.max_response_bytes)
        {
            return Err(ConfigError::Invalid(format!(
                "notify.max_response_bytes must be between {MIN_NOTIFY_RESPONSE_BYTES} and \
                 {MAX_NOTIFY_RESPONSE_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Request audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines). Stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI, environment, or the default file.
///
/// Returns `None` when no path was requested and the default file is absent.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR).filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(fallback.is_file().then_some(fallback))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a provider identifier.
fn validate_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if !value.chars().all(|ch| ch.is_ascii_graphic()) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be ascii without whitespace"
        )));
    }
    Ok(())
}

/// Returns a required, non-blank value.
fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Invalid(format!("{field} is required"))),
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
fn default_bind() -> String {
    "127.0.0.1:4567".to_string()
}

/// Default static asset directory.
fn default_public_dir() -> String {
    "public".to_string()
}

/// Default maximum request body size in bytes.
const fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Default token lifetime.
const fn default_ttl_seconds() -> u64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

/// Default notification REST API base URL.
fn default_notify_base_url() -> String {
    "https://notify.twilio.com".to_string()
}

/// Default provider request timeout.
const fn default_notify_timeout_ms() -> u64 {
    10_000
}

/// Default outbound user agent.
fn default_user_agent() -> String {
    concat!("sdk-starter/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Default provider response cap.
const fn default_notify_max_response_bytes() -> usize {
    64 * 1024
}

/// Default audit logging toggle.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions use unwrap for clarity."
    )]

    use super::required;
    use super::validate_identifier;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("f", Some("  AC1 ")).unwrap(), "AC1");
        assert!(required("f", Some("   ")).is_err());
        assert!(required("f", None).is_err());
    }

    #[test]
    fn identifiers_reject_whitespace_and_non_ascii() {
        assert!(validate_identifier("f", "IS0123").is_ok());
        assert!(validate_identifier("f", "IS 0123").is_err());
        assert!(validate_identifier("f", "ISé").is_err());
        assert!(validate_identifier("f", &"x".repeat(65)).is_err());
    }
}
