// cloud-gate-cli/src/main.rs
// ============================================================================
// Module: Cloud Gate CLI Entry Point
// Description: Command dispatcher for the Cloud Gate MCP server and catalog.
// Purpose: Provide server startup, catalog listing, and config checking.
// Dependencies: clap, cloud-gate-config, cloud-gate-contract, cloud-gate-mcp, tokio
// ============================================================================

//! ## Overview
//! The Cloud Gate CLI starts the MCP server, prints the operation catalog,
//! and checks configuration files without starting anything. All output goes
//! through explicit write helpers; errors exit nonzero with a single line on
//! stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use cloud_gate_config::CloudGateConfig;
use cloud_gate_config::TransportKind;
use cloud_gate_contract::operation_catalog;
use cloud_gate_mcp::McpServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "cloud-gate", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Cloud Gate MCP server.
    Serve {
        /// Path to the configuration file.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Transport override, replacing the configured transport.
        #[arg(long, value_enum, value_name = "TRANSPORT")]
        transport: Option<TransportArg>,
    },
    /// Print the operation catalog as JSON.
    Catalog,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a configuration file without serving.
    Check {
        /// Path to the configuration file.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Transport selection for the serve command.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TransportArg {
    /// JSON-RPC over stdin/stdout with Content-Length framing.
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a single user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
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
    match cli.command {
        Commands::Serve {
            config,
            transport,
        } => command_serve(config.as_deref(), transport).await,
        Commands::Catalog => command_catalog(),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Check {
                config,
            } => command_config_check(config.as_deref()),
        },
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Loads configuration and runs the MCP server until it exits.
async fn command_serve(
    config_path: Option<&std::path::Path>,
    transport: Option<TransportArg>,
) -> CliResult<ExitCode> {
    let mut config = CloudGateConfig::load(config_path)
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    if let Some(transport) = transport {
        config.server.transport = transport.into();
    }
    let server = McpServer::from_config(config)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Catalog Command
// ============================================================================

/// Prints the operation catalog as pretty JSON.
fn command_catalog() -> CliResult<ExitCode> {
    let catalog = operation_catalog();
    let rendered = serde_json::to_string_pretty(&catalog)
        .map_err(|err| CliError::new(format!("catalog serialization failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Loads and validates a configuration file, reporting the effective setup.
fn command_config_check(config_path: Option<&std::path::Path>) -> CliResult<ExitCode> {
    let config = CloudGateConfig::load(config_path)
        .map_err(|err| CliError::new(format!("config check failed: {err}")))?;
    let transport = match config.server.transport {
        TransportKind::Stdio => "stdio",
        TransportKind::Http => "http",
    };
    write_stdout_line(&format!("configuration ok: transport={transport}"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if config.server.transport == TransportKind::Http {
        write_stdout_line(&format!("bind address: {}", config.server.bind_addr))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    for (module, enabled) in config.modules.iter() {
        let state = if enabled { "enabled" } else { "disabled" };
        write_stdout_line(&format!("module {module}: {state}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
