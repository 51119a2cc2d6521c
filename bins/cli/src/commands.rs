//! Command implementations.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use jet_core::rules::CATALOG;
use jet_core::{EngineOptions, JetEngine, RunReport, RunRequest};
use jet_shared::{AppConfig, AppError};

use crate::cli::{Command, RunArgs};

/// Dispatches a parsed command.
pub fn execute(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Rules => {
            io::stdout()
                .lock()
                .write_all(render_catalog().as_bytes())
                .map_err(|err| AppError::Output(err.to_string()))?;
            Ok(())
        }
        Command::Run(args) => run(&args, config),
    }
}

fn render_catalog() -> String {
    let mut out = String::new();
    for meta in &CATALOG {
        let requires = if meta.requires.is_empty() {
            "-".to_string()
        } else {
            meta.requires
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mandatory = if meta.mandatory { "mandatory" } else { "optional" };
        let _ = writeln!(
            out,
            "{}  {:<9}  {:<32}  {requires}",
            meta.id, mandatory, meta.label
        );
    }
    out
}

fn run(args: &RunArgs, config: &AppConfig) -> anyhow::Result<()> {
    let mut request = read_request(&args.input)
        .with_context(|| format!("Failed to load run request from {}", args.input.display()))?;
    if !args.rules.is_empty() {
        request = request.select(args.rules.iter().copied());
    }
    request
        .params
        .apply_defaults(&config.engine, &config.parameters);

    let engine = JetEngine::new(EngineOptions::from(&config.engine))
        .map_err(|err| AppError::Config(format!("{}: {err}", err.error_code())))?;
    let report = engine.run_scenarios(&request);
    log_results(&report);

    write_report(&report, args.output.as_deref(), args.pretty)
        .context("Failed to write report")?;
    Ok(())
}

fn read_request(path: &Path) -> Result<RunRequest, AppError> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| AppError::Input(err.to_string()))?;
        raw
    } else {
        fs::read_to_string(path).map_err(|err| AppError::Input(err.to_string()))?
    };
    serde_json::from_str(&raw).map_err(|err| AppError::Validation(err.to_string()))
}

fn write_report(report: &RunReport, output: Option<&Path>, pretty: bool) -> Result<(), AppError> {
    let mut json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .map_err(|err| AppError::Internal(err.to_string()))?;
    json.push('\n');

    match output {
        Some(path) => fs::write(path, json),
        None => io::stdout().lock().write_all(json.as_bytes()),
    }
    .map_err(|err| AppError::Output(err.to_string()))
}

fn log_results(report: &RunReport) {
    for (id, result) in &report.results {
        info!(
            rule = %id,
            status = %result.status,
            flagged = result.flagged_count(),
            "{}",
            result.summary
        );
    }
    if !report.validation_passed {
        warn!("Validation failed; analytical results are informational only");
    }
}
