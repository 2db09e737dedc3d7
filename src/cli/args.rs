//! CLI argument definitions using clap
//!
//! Commands:
//! - fireservice run <service> [--config <path>] [--extra <json>]
//! - fireservice describe <service>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::services::ServiceKind;

/// fireservice - declarative input validation for units of work
#[derive(Parser, Debug)]
#[command(name = "fireservice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Call a bundled service once per JSON object read from stdin
    Run {
        #[arg(value_enum)]
        service: ServiceKind,

        /// Path to a service config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON object passed to every fire() as extras
        #[arg(long)]
        extra: Option<String>,
    },

    /// Print the declared fields of a bundled service
    Describe {
        #[arg(value_enum)]
        service: ServiceKind,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
