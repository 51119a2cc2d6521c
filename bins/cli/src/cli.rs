//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jet_core::RuleId;

/// Journal entry testing over a JSON run request.
#[derive(Debug, Parser)]
#[command(name = "jet", version, about)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the rule catalog.
    Rules,
    /// Run rules over a request file and write the report.
    Run(RunArgs),
}

/// Arguments of `jet run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Run request as JSON. `-` reads stdin.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Rule to run. Repeat to select several; replaces the request's selection.
    #[arg(short, long = "rule", value_name = "ID")]
    pub rules: Vec<RuleId>,

    /// Report destination. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the report.
    #[arg(long)]
    pub pretty: bool,
}
