//! CLI command definitions and dispatch for the `acfg` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod config;
pub mod edit;
pub mod license;
pub mod render;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Configure how the auto-commenter spends likes and comments per platform.
#[derive(Parser)]
#[command(name = "acfg", version, about, long_about = None)]
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

    /// Account whose configuration is read and written.
    #[arg(long, global = true, env = "AUTOCOMMENT_OWNER", default_value = "local")]
    pub owner: String,

    /// Export trace spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the saved configuration with used and remaining capacity.
    Show,

    /// Validate the saved configuration against the current limits.
    Validate,

    /// List or register licenses.
    Licenses {
        #[command(subcommand)]
        action: Option<LicenseAction>,
    },

    /// Edit the configuration interactively.
    Edit,

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

#[derive(Subcommand)]
pub enum LicenseAction {
    /// List available licenses (default).
    #[command(alias = "ls")]
    List,

    /// Register a license record for this account.
    Add {
        /// Display name.
        #[arg(long)]
        name: String,

        /// License key.
        #[arg(long)]
        key: String,

        /// Record id (generated when omitted).
        #[arg(long)]
        id: Option<String>,

        /// active, inactive or expired.
        #[arg(long, default_value = "active")]
        status: String,
    },
}
