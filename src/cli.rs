// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::AdmissionPolicy;

/// Command-line arguments for `dagsched`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagsched",
    version,
    about = "Interactive dependency-aware task scheduler with a worker pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a task file (TOML) loaded before the shell starts.
    ///
    /// If omitted, `Dagsched.toml` is loaded when it exists in the current
    /// working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Worker count used by `run` without an argument (overrides the config).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Admission policy: `bulk` or `gated` (overrides the config).
    #[arg(long, value_name = "POLICY")]
    pub admission: Option<AdmissionPolicy>,

    /// Start the scheduler right after loading the task file.
    #[arg(long)]
    pub run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGSCHED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate the task file, print tasks, dependencies and the
    /// topological order, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
