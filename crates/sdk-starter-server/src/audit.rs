// crates/sdk-starter-server/src/audit.rs
// ============================================================================
// Module: Request Audit Logging
// Description: Structured audit events for HTTP request handling.
// Purpose: Emit one JSON line per request without a logging framework.
// Dependencies: sdk-starter-config, serde, serde_json
// ============================================================================

//! ## Overview
//! Every token and notification request produces one [`RequestAuditEvent`].
//! Provider failures carry the provider's error text so operators can see
//! why a binding or notification was refused. Tokens and secrets are never
//! recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use sdk_starter_config::AuditConfig;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event name used for request audit lines.
pub const REQUEST_EVENT: &str = "sdk_starter_request";

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Request completed successfully.
    Success,
    /// Request was rejected before reaching the provider.
    Rejected,
    /// Provider or signing failure.
    Failure,
}

/// Request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Route path.
    pub route: &'static str,
    /// HTTP status returned.
    pub status: u16,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Identity named by the request, when known.
    pub identity: Option<String>,
    /// Error text for rejected or failed requests.
    pub error: Option<String>,
}

impl RequestAuditEvent {
    /// Builds an event stamped with the current time.
    #[must_use]
    pub fn new(route: &'static str, status: u16, outcome: RequestOutcome) -> Self {
        Self {
            event: REQUEST_EVENT,
            timestamp_ms: now_millis(),
            route,
            status,
            outcome,
            identity: None,
            error: None,
        }
    }

    /// Attaches the request identity.
    #[must_use]
    pub fn with_identity(mut self, identity: Option<&str>) -> Self {
        self.identity = identity.map(str::to_string);
        self
    }

    /// Attaches error text.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for request events.
pub trait StarterAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RequestAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StarterAuditSink for StderrAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl StarterAuditSink for FileAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that drops all events.
pub struct NoopAuditSink;

impl StarterAuditSink for NoopAuditSink {
    fn record(&self, _event: &RequestAuditEvent) {}
}

/// Builds the sink selected by audit configuration.
///
/// # Errors
///
/// Returns an error when the configured log file cannot be opened.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn StarterAuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match config.path.as_deref().map(str::trim) {
        Some(path) => Ok(Arc::new(FileAuditSink::new(Path::new(path))?)),
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Returns milliseconds since the Unix epoch, or zero if the clock is skewed.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
