//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Remote Relay - Prometheus remote-write fan-out relay
#[derive(Parser, Debug)]
#[command(
    name = "remote-relay",
    author,
    version,
    about = "Prometheus remote-write relay",
    long_about = "Accepts Prometheus remote-write requests over HTTP, decodes the \n\
                  snappy-compressed protobuf payload and forwards every batch to \n\
                  all configured writers concurrently."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "REMOTE_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "REMOTE_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the relay HTTP server
    Serve(ServeArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Path to configuration file (TOML or JSON); flags below override it
    #[arg(short, long, env = "REMOTE_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend address handed to the writers
    #[arg(long, env = "KAFKA_URL")]
    pub kafka_url: Option<String>,

    /// Timeout handed to the writers for sending samples (e.g. "30s", "1m 30s")
    #[arg(long, env = "REMOTE_RELAY_SEND_TIMEOUT", value_parser = humantime::parse_duration)]
    pub send_timeout: Option<Duration>,

    /// Address to listen on for remote write / read
    #[arg(long, alias = "web.listen-address", env = "LISTEN_ADDRESS")]
    pub listen_address: Option<String>,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "REMOTE_RELAY_MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "REMOTE_RELAY_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without serving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
