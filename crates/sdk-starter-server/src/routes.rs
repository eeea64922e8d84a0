// crates/sdk-starter-server/src/routes.rs
// ============================================================================
// Module: HTTP Routes
// Description: Handlers for token, notification, config, and redirect routes.
// Purpose: Translate HTTP requests into core operations and JSON responses.
// Dependencies: axum, sdk-starter-core, serde
// ============================================================================

//! ## Overview
//! Handlers never propagate errors: every failure becomes a JSON
//! `{message, error}` envelope with an HTTP status, and one audit event is
//! recorded per token or notification request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use axum::response::Response;
use sdk_starter_core::BINDING_FAILED_PREFIX;
use sdk_starter_core::Identity;
use sdk_starter_core::NOTIFICATION_FAILED_PREFIX;
use sdk_starter_core::OperationResult;
use sdk_starter_core::issue_token;
use sdk_starter_core::random_identity;
use serde::Serialize;

use crate::audit::RequestAuditEvent;
use crate::audit::RequestOutcome;
use crate::params::extract_params;
use crate::server::ServerState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Failure prefix for token issuance.
pub const TOKEN_FAILED_PREFIX: &str = "Failed to generate token: ";

/// Section index redirects.
pub(crate) const REDIRECTS: [(&str, &str); 5] = [
    ("/", "/index.html"),
    ("/video/", "/video/index.html"),
    ("/notify/", "/notify/index.html"),
    ("/chat/", "/chat/index.html"),
    ("/sync/", "/sync/index.html"),
];

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Token issuance response body.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Identity embedded in the token.
    pub identity: String,
    /// Signed access token.
    pub token: String,
}

/// Builds a `302 Found` redirect.
pub(crate) fn found(target: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, target)]).into_response()
}

/// Builds an error envelope response.
fn failure(status: StatusCode, prefix: &str, error: &str) -> Response {
    (status, Json(OperationResult::failure(prefix, error))).into_response()
}

// ============================================================================
// SECTION: Token Routes
// ============================================================================

/// `GET /token`: issues a token for a generated username.
pub(crate) async fn random_token(State(state): State<Arc<ServerState>>) -> Response {
    issue_for(&state, &random_identity())
}

/// `POST /token`: issues a token for the caller-supplied identity.
pub(crate) async fn requested_token(
    State(state): State<Arc<ServerState>>,
    request: Request,
) -> Response {
    let params = match extract_params(request, state.max_body_bytes).await {
        Ok(params) => params,
        Err(err) => {
            let text = err.to_string();
            state.audit.record(
                &RequestAuditEvent::new("/token", err.status().as_u16(), RequestOutcome::Rejected)
                    .with_error(text.as_str()),
            );
            return failure(err.status(), TOKEN_FAILED_PREFIX, &text);
        }
    };
    let requested = params.get_str("identity").unwrap_or_default();
    match Identity::new(requested) {
        Ok(identity) => issue_for(&state, &identity),
        Err(err) => {
            let text = err.to_string();
            state.audit.record(
                &RequestAuditEvent::new(
                    "/token",
                    StatusCode::BAD_REQUEST.as_u16(),
                    RequestOutcome::Rejected,
                )
                .with_error(text.as_str()),
            );
            failure(StatusCode::BAD_REQUEST, TOKEN_FAILED_PREFIX, &text)
        }
    }
}

/// Signs a token for `identity` with the configured grants.
fn issue_for(state: &ServerState, identity: &Identity) -> Response {
    let signed =
        issue_token(identity.as_str(), &state.grants, &state.credentials, Some(state.ttl_seconds));
    match signed {
        Ok(token) => {
            state.audit.record(
                &RequestAuditEvent::new("/token", StatusCode::OK.as_u16(), RequestOutcome::Success)
                    .with_identity(Some(identity.as_str())),
            );
            Json(TokenResponse {
                identity: identity.to_string(),
                token,
            })
            .into_response()
        }
        Err(err) => {
            let text = err.to_string();
            state.audit.record(
                &RequestAuditEvent::new(
                    "/token",
                    StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    RequestOutcome::Failure,
                )
                .with_identity(Some(identity.as_str()))
                .with_error(text.as_str()),
            );
            failure(StatusCode::INTERNAL_SERVER_ERROR, TOKEN_FAILED_PREFIX, &text)
        }
    }
}

// ============================================================================
// SECTION: Notification Routes
// ============================================================================

/// Provider operation selected by a notification route.
#[derive(Debug, Clone, Copy)]
enum NotifyRoute {
    /// `POST /register`.
    Register,
    /// `POST /send-notification`.
    SendNotification,
}

impl NotifyRoute {
    /// Returns the route path.
    const fn path(self) -> &'static str {
        match self {
            Self::Register => "/register",
            Self::SendNotification => "/send-notification",
        }
    }

    /// Returns the failure message prefix.
    const fn failure_prefix(self) -> &'static str {
        match self {
            Self::Register => BINDING_FAILED_PREFIX,
            Self::SendNotification => NOTIFICATION_FAILED_PREFIX,
        }
    }
}

/// `POST /register`: creates a device binding.
pub(crate) async fn register(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    relay(&state, NotifyRoute::Register, request).await
}

/// `POST /send-notification`: sends a notification.
pub(crate) async fn send_notification(
    State(state): State<Arc<ServerState>>,
    request: Request,
) -> Response {
    relay(&state, NotifyRoute::SendNotification, request).await
}

/// Normalizes the request and forwards it through the gateway.
async fn relay(state: &ServerState, route: NotifyRoute, request: Request) -> Response {
    let params = match extract_params(request, state.max_body_bytes).await {
        Ok(params) => params,
        Err(err) => {
            let text = err.to_string();
            state.audit.record(
                &RequestAuditEvent::new(route.path(), err.status().as_u16(), RequestOutcome::Rejected)
                    .with_error(text.as_str()),
            );
            return failure(err.status(), route.failure_prefix(), &text);
        }
    };
    let result = match route {
        NotifyRoute::Register => state.gateway.create_binding(&params).await,
        NotifyRoute::SendNotification => state.gateway.send_notification(&params).await,
    };
    let (status, outcome) = if result.is_success() {
        (StatusCode::OK, RequestOutcome::Success)
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, RequestOutcome::Failure)
    };
    let mut event = RequestAuditEvent::new(route.path(), status.as_u16(), outcome)
        .with_identity(params.get_str("identity"));
    if let Some(error) = result.error() {
        event = event.with_error(error);
    }
    state.audit.record(&event);
    (status, Json(result)).into_response()
}

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// `GET /config`: reports the effective provider configuration.
pub(crate) async fn config(State(state): State<Arc<ServerState>>) -> Response {
    Json(state.diagnostics.clone()).into_response()
}
