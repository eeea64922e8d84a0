// crates/sdk-starter-config/src/diagnostics.rs
// ============================================================================
// Module: Config Diagnostics
// Description: Redacted view of the effective provider configuration.
// Purpose: Back the `/config` health endpoint and `sdk-starter config`.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Keys use the environment variable names operators set, so the output can
//! be compared directly against a deployment's environment. The API secret
//! is reported only as a presence flag.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::config::StarterConfig;

// ============================================================================
// SECTION: Diagnostics View
// ============================================================================

/// Effective provider configuration with the secret redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDiagnostics {
    /// Account identifier.
    #[serde(rename = "TWILIO_ACCOUNT_SID")]
    pub account_sid: Option<String>,
    /// Notification service identifier.
    #[serde(rename = "TWILIO_NOTIFICATION_SERVICE_SID")]
    pub notification_service_sid: Option<String>,
    /// API key identifier.
    #[serde(rename = "TWILIO_API_KEY")]
    pub api_key: Option<String>,
    /// Whether an API secret is configured.
    #[serde(rename = "TWILIO_API_SECRET")]
    pub api_secret_set: bool,
    /// Chat service identifier.
    #[serde(rename = "TWILIO_CHAT_SERVICE_SID")]
    pub chat_service_sid: Option<String>,
    /// Sync service identifier.
    #[serde(rename = "TWILIO_SYNC_SERVICE_SID")]
    pub sync_service_sid: Option<String>,
    /// Conversations configuration profile identifier.
    #[serde(rename = "TWILIO_CONFIGURATION_SID")]
    pub configuration_profile_sid: Option<String>,
}

impl ConfigDiagnostics {
    /// Builds the diagnostics view from a configuration.
    #[must_use]
    pub fn from_config(config: &StarterConfig) -> Self {
        let twilio = &config.twilio;
        Self {
            account_sid: present(twilio.account_sid.as_deref()),
            notification_service_sid: present(twilio.notification_service_sid.as_deref()),
            api_key: present(twilio.api_key.as_deref()),
            api_secret_set: present(twilio.api_secret.as_deref()).is_some(),
            chat_service_sid: present(twilio.chat_service_sid.as_deref()),
            sync_service_sid: present(twilio.sync_service_sid.as_deref()),
            configuration_profile_sid: present(twilio.configuration_profile_sid.as_deref()),
        }
    }
}

/// Returns an owned, trimmed value when it is non-blank.
fn present(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use serde_json::json;

    use super::ConfigDiagnostics;
    use crate::config::StarterConfig;

    #[test]
    fn secret_is_reported_as_flag_only() {
        let mut config = StarterConfig::default();
        config.twilio.account_sid = Some("AC1".to_string());
        config.twilio.api_secret = Some("shh".to_string());
        config.twilio.chat_service_sid = Some("  ".to_string());

        let value = serde_json::to_value(ConfigDiagnostics::from_config(&config)).unwrap();

        assert_eq!(
            value,
            json!({
                "TWILIO_ACCOUNT_SID": "AC1",
                "TWILIO_NOTIFICATION_SERVICE_SID": null,
                "TWILIO_API_KEY": null,
                "TWILIO_API_SECRET": true,
                "TWILIO_CHAT_SERVICE_SID": null,
                "TWILIO_SYNC_SERVICE_SID": null,
                "TWILIO_CONFIGURATION_SID": null
            })
        );
        assert!(!value.to_string().contains("shh"));
    }
}
