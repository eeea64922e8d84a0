// crates/sdk-starter-server/src/server.rs
// ============================================================================
// Module: SDK Starter Server
// Description: HTTP server assembly, shared state, and transport loop.
// Purpose: Wire configuration, provider client, and audit sink into axum.
// Dependencies: axum, tokio, tower-http, sdk-starter-{core,config,providers}
// ============================================================================

//! ## Overview
//! [`StarterServer`] is built once from a validated [`StarterConfig`]. All
//! per-request collaborators (signing credentials, resolved grants, the
//! notification gateway, and the audit sink) live in an immutable
//! `ServerState` shared by `Arc` across handlers. Paths without a route are
//! served from the configured public directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use axum::routing::post;
use sdk_starter_config::ConfigDiagnostics;
use sdk_starter_config::StarterConfig;
use sdk_starter_core::CapabilityGrant;
use sdk_starter_core::NotificationGateway;
use sdk_starter_core::NotifyProvider;
use sdk_starter_core::SigningCredentials;
use sdk_starter_core::resolve_grants;
use sdk_starter_providers::TwilioNotifyClient;
use sdk_starter_providers::TwilioNotifyConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::audit::StarterAuditSink;
use crate::audit::sink_from_config;
use crate::routes;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared, read-only state for request handlers.
pub(crate) struct ServerState {
    /// Credentials used to sign access tokens.
    pub(crate) credentials: SigningCredentials,
    /// Grants attached to every issued token.
    pub(crate) grants: Vec<CapabilityGrant>,
    /// Token lifetime in seconds.
    pub(crate) ttl_seconds: u64,
    /// Notification gateway over the shared provider client.
    pub(crate) gateway: NotificationGateway,
    /// Redacted configuration view for `/config`.
    pub(crate) diagnostics: ConfigDiagnostics,
    /// Request audit sink.
    pub(crate) audit: Arc<dyn StarterAuditSink>,
    /// Maximum request body size in bytes.
    pub(crate) max_body_bytes: usize,
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// SDK Starter HTTP server.
pub struct StarterServer {
    /// Listen address.
    bind: SocketAddr,
    /// Static asset directory.
    public_dir: PathBuf,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl StarterServer {
    /// Builds a server with the Notify REST client and configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`StarterServerError`] when configuration is invalid or the
    /// provider client or audit log cannot be initialized.
    pub fn from_config(config: &StarterConfig) -> Result<Self, StarterServerError> {
        config.validate().map_err(|err| StarterServerError::Config(err.to_string()))?;
        let client = TwilioNotifyClient::new(notify_client_config(config)?)
            .map_err(|err| StarterServerError::Init(err.to_string()))?;
        let audit = sink_from_config(&config.audit)
            .map_err(|err| StarterServerError::Init(format!("audit log: {err}")))?;
        emit_startup_warnings(config);
        Self::with_provider(config, Arc::new(client), audit)
    }

    /// Builds a server over an explicit provider and audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`StarterServerError::Config`] when required settings are
    /// missing or malformed.
    pub fn with_provider(
        config: &StarterConfig,
        provider: Arc<dyn NotifyProvider>,
        audit: Arc<dyn StarterAuditSink>,
    ) -> Result<Self, StarterServerError> {
        let config_error = |err: sdk_starter_config::ConfigError| {
            StarterServerError::Config(err.to_string())
        };
        let credentials = config.signing_credentials().map_err(config_error)?;
        config.notification_service_sid().map_err(config_error)?;
        let bind = config.server.bind_addr().map_err(config_error)?;
        let state = ServerState {
            credentials,
            grants: resolve_grants(&config.service_scopes()),
            ttl_seconds: config.token.ttl_seconds,
            gateway: NotificationGateway::new(provider),
            diagnostics: config.diagnostics(),
            audit,
            max_body_bytes: config.server.max_body_bytes,
        };
        Ok(Self {
            bind,
            public_dir: PathBuf::from(config.server.public_dir.trim()),
            state: Arc::new(state),
        })
    }

    /// Returns the configured listen address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Builds the HTTP router.
    #[must_use]
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/token", get(routes::random_token).post(routes::requested_token))
            .route("/register", post(routes::register))
            .route("/send-notification", post(routes::send_notification))
            .route("/config", get(routes::config));
        for (path, target) in routes::REDIRECTS {
            router = router.route(path, get(move || async move { routes::found(target) }));
        }
        router
            .fallback_service(ServeDir::new(&self.public_dir))
            .with_state(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves requests.
    ///
    /// # Errors
    ///
    /// Returns [`StarterServerError::Transport`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), StarterServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|err| StarterServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_on(listener).await
    }

    /// Serves requests on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`StarterServerError::Transport`] when serving fails.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), StarterServerError> {
        let app = self.router();
        axum::serve(listener, app)
            .await
            .map_err(|err| StarterServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Maps validated configuration onto Notify client settings.
fn notify_client_config(config: &StarterConfig) -> Result<TwilioNotifyConfig, StarterServerError> {
    let config_error =
        |err: sdk_starter_config::ConfigError| StarterServerError::Config(err.to_string());
    let credentials = config.signing_credentials().map_err(config_error)?;
    let service_sid = config.notification_service_sid().map_err(config_error)?;
    let mut client = TwilioNotifyConfig::new(
        service_sid,
        credentials.api_key(),
        credentials.api_secret(),
    );
    client.base_url = config.notify.base_url.trim().to_string();
    client.timeout = Duration::from_millis(config.notify.timeout_ms);
    client.allow_http = config.notify.allow_http;
    client.user_agent = config.notify.user_agent.trim().to_string();
    client.max_response_bytes = config.notify.max_response_bytes;
    Ok(client)
}

/// Emits warnings for configuration that weakens transport security.
fn emit_startup_warnings(config: &StarterConfig) {
    if config.notify.allow_http && config.notify.base_url.trim().starts_with("http://") {
        let _ = writeln!(
            std::io::stderr(),
            "sdk-starter: WARNING: notify.base_url uses cleartext http; provider credentials are \
             sent without TLS"
        );
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server boot and transport failures.
#[derive(Debug, Error)]
pub enum StarterServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
