// crates/sdk-starter-cli/src/main.rs
// ============================================================================
// Module: SDK Starter CLI Entry Point
// Description: Command dispatcher for the SDK Starter backend.
// Purpose: Run the HTTP server and offline token and config utilities.
// Dependencies: clap, sdk-starter-config, sdk-starter-core, sdk-starter-server,
//               serde, serde_json, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The `sdk-starter` binary starts the demo backend or performs the same
//! token and configuration work offline. Configuration is loaded once per
//! invocation from the optional `--config` file plus the `TWILIO_*`
//! environment overlay. Errors are written to stderr and exit with status 1.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use sdk_starter_config::StarterConfig;
use sdk_starter_core::Identity;
use sdk_starter_core::issue_token;
use sdk_starter_core::random_identity;
use sdk_starter_core::resolve_grants;
use sdk_starter_server::StarterServer;
use sdk_starter_server::TokenResponse;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "sdk-starter", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Issue an access token and print it as JSON.
    Token(TokenCommand),
    /// Validate configuration and print the redacted view.
    Config(ConfigCommand),
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to sdk-starter.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the listen address from configuration.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Configuration for the `token` command.
#[derive(Args, Debug)]
struct TokenCommand {
    /// Optional config file path (defaults to sdk-starter.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Identity to embed; a username is generated when omitted.
    #[arg(long, value_name = "NAME")]
    identity: Option<String>,
    /// Token lifetime in seconds (defaults to `token.ttl_seconds`).
    #[arg(long, value_name = "SECS")]
    ttl: Option<u64>,
}

/// Configuration for the `config` command.
#[derive(Args, Debug)]
struct ConfigCommand {
    /// Optional config file path (defaults to sdk-starter.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("sdk-starter {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Token(command) => command_token(&command),
        Commands::Config(command) => command_config(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config)?;
    if let Some(bind) = command.bind {
        config.server.bind = bind;
    }
    let server = StarterServer::from_config(&config)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    let bind = server.bind_addr();
    warn_network_exposure(bind)?;
    write_stderr_line(&format!("sdk-starter: listening on http://{bind}"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Warns when the listener is reachable beyond the local host.
fn warn_network_exposure(bind: SocketAddr) -> CliResult<()> {
    if bind.ip().is_loopback() {
        return Ok(());
    }
    write_stderr_line(&format!(
        "sdk-starter: WARNING: binding to non-loopback address {bind}; token issuance is \
         unauthenticated"
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))
}

// ============================================================================
// SECTION: Token Command
// ============================================================================

/// Executes the `token` command.
fn command_token(command: &TokenCommand) -> CliResult<ExitCode> {
    let config = StarterConfig::load_for_signing(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let credentials = config
        .signing_credentials()
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let identity = match command.identity.as_deref() {
        Some(name) => Identity::new(name)
            .map_err(|err| CliError::new(format!("token issuance failed: {err}")))?,
        None => random_identity(),
    };
    let grants = resolve_grants(&config.service_scopes());
    let ttl = command.ttl.unwrap_or(config.token.ttl_seconds);
    let token = issue_token(identity.as_str(), &grants, &credentials, Some(ttl))
        .map_err(|err| CliError::new(format!("token issuance failed: {err}")))?;
    let response = TokenResponse {
        identity: identity.to_string(),
        token,
    };
    write_json(&response)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes the `config` command.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.clone())?;
    write_json(&config.diagnostics())?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates configuration.
fn load_config(path: Option<PathBuf>) -> CliResult<StarterConfig> {
    StarterConfig::load(path.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    let help = command.render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Serializes `value` as one line of JSON on stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string(value)
        .map_err(|err| CliError::new(format!("json encoding failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
