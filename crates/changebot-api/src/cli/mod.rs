//! CLI command definitions for the `changebot` binary.
//!
//! Uses clap derive macros for argument parsing. Endpoint settings are global
//! flags backed by environment variables so every subcommand sees them.

pub mod ask;
pub mod chat;
pub mod refresh;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use changebot_infra::config::ConfigOverrides;

/// Chat with the Change Machine webhook from your terminal.
#[derive(Parser)]
#[command(name = "changebot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Webhook URL that answers chat queries.
    #[arg(long, global = true, env = "CHANGEBOT_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// Webhook URL that triggers remote reindexing.
    #[arg(long, global = true, env = "CHANGEBOT_REFRESH_URL")]
    pub refresh_endpoint: Option<String>,

    /// Timeout for each outbound request, in seconds.
    #[arg(long, global = true, env = "CHANGEBOT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat,

    /// Send a single message and print the reply.
    Ask {
        /// Message text (multiple words are joined with spaces).
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Trigger the refresh webhook (remote reindexing).
    Refresh,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Config values given on the command line or through the environment.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint_url: self.endpoint.clone(),
            refresh_url: self.refresh_endpoint.clone(),
            request_timeout_secs: self.timeout_secs,
        }
    }

    /// Default log directive derived from `-v` / `--quiet`.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,changebot=debug",
            _ => "trace",
        }
    }
}
