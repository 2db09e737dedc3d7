//! CLI command implementations
//!
//! `run` keeps one crawl log for the whole invocation, so a crawler line
//! repeating an earlier page is skipped. Every line still gets a fresh
//! unit.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ServiceConfig;
use crate::observability::init_logging;
use crate::registry;
use crate::service::{CallOutcome, Extras, Service, ServiceError, Unit};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_json};
use super::services::{Account, CrawlLog, Crawler, Grid, ServiceKind};

/// Parse arguments, install logging and run the command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cmd {
        Command::Run {
            service,
            config,
            extra,
        } => {
            let config = load_config(config.as_deref())?;
            let extras = parse_extras(extra.as_deref())?;
            let stdin = io::stdin();
            run_service(Runner::new(service, config, extras), stdin.lock(), &mut out)
        }
        Command::Describe { service } => write_json(&mut out, &describe(service)?),
    }
}

/// Load the service config, or the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> CliResult<ServiceConfig> {
    match path {
        Some(path) => Ok(ServiceConfig::load(path)?),
        None => Ok(ServiceConfig::default()),
    }
}

/// Parse `--extra`, which must be a JSON object
pub fn parse_extras(extra: Option<&str>) -> CliResult<Extras> {
    let Some(raw) = extra else {
        return Ok(Extras::new());
    };
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::invalid_argument("--extra must be a JSON object")),
        Err(e) => Err(CliError::invalid_argument(format!("--extra is not valid JSON: {}", e))),
    }
}

/// Answer every input line with one response line.
///
/// Invalid JSON lines get an error response; I/O failures stop the loop.
pub fn run_service<R: BufRead, W: Write>(runner: Runner, input: R, out: &mut W) -> CliResult<()> {
    for request in read_requests(input) {
        match request {
            Ok(value) => write_json(out, &runner.handle(&value))?,
            Err(e) if e.is_recoverable() => write_error(out, e.code_str(), e.message())?,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Registry description of a bundled service
pub fn describe(kind: ServiceKind) -> CliResult<Value> {
    match kind {
        ServiceKind::Crawler => describe_service::<Crawler>(),
        ServiceKind::Account => describe_service::<Account>(),
        ServiceKind::Grid => describe_service::<Grid>(),
    }
}

fn describe_service<S: Service>() -> CliResult<Value> {
    let registry = registry::discover::<S>()?;
    Ok(json!({
        "service": S::name(),
        "fields": registry.fields(),
    }))
}

/// Builds and calls one unit per input
pub struct Runner {
    kind: ServiceKind,
    config: ServiceConfig,
    extras: Extras,
    crawled: CrawlLog,
}

impl Runner {
    pub fn new(kind: ServiceKind, config: ServiceConfig, extras: Extras) -> Self {
        Self {
            kind,
            config,
            extras,
            crawled: CrawlLog::default(),
        }
    }

    /// Call a fresh unit with `input` and describe the outcome
    pub fn handle(&self, input: &Value) -> Value {
        match self.kind {
            ServiceKind::Crawler => self.call(Crawler::new(Arc::clone(&self.crawled)), input),
            ServiceKind::Account => self.call(Account::default(), input),
            ServiceKind::Grid => self.call(Grid::default(), input),
        }
    }

    fn call<S>(&self, service: S, input: &Value) -> Value
    where
        S: Service,
        S::Output: Serialize,
    {
        let mut unit = Unit::with_config(service, self.config);
        match unit.call_with(input, &self.extras) {
            Ok(CallOutcome::Fired(output)) => json!({
                "status": "fired",
                "output": output,
            }),
            Ok(CallOutcome::Skipped { reason, output }) => json!({
                "status": "skipped",
                "reason": reason.reason(),
                "output": output,
            }),
            Err(err) => error_response(&err),
        }
    }
}

fn error_response(err: &ServiceError) -> Value {
    let fields: Vec<Value> = err
        .validation_errors()
        .map(|errors| {
            errors
                .iter()
                .map(|e| json!({ "field": e.field(), "message": e.message() }))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "status": "error",
        "code": err.code().code(),
        "message": err.to_string(),
        "fields": fields,
    })
}
