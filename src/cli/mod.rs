//! CLI module for fireservice
//!
//! Provides a command-line runner for the bundled services:
//! - run: call a service once per stdin JSON line
//! - describe: print a service's declared fields

mod args;
mod commands;
mod errors;
mod io;
mod services;

pub use args::{Cli, Command};
pub use commands::{describe, load_config, parse_extras, run, run_command, run_service, Runner};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_json};
pub use services::{id_field, Account, CrawlLog, Crawler, Cube, Grid, ServiceKind};
