// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! ```text
//! remon [--debounce <ms>] [OPTIONS] <pattern>... -- <command-words>...
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::IgnoreScope;

/// Command-line arguments for `remon`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "remon",
    version,
    about = "Re-run a shell command whenever watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Debounce window in milliseconds (default: 500).
    #[arg(short, long, value_name = "MS")]
    pub debounce: Option<u64>,

    /// Directory to watch (default: current working directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Glob pattern of paths that never trigger the command. Repeatable.
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Do not consult `.gitignore`-style files.
    #[arg(long)]
    pub no_ignore: bool,

    /// Where to look for ignore files: `recursive` or `root-only`.
    #[arg(long, value_name = "SCOPE")]
    pub ignore_scope: Option<IgnoreScope>,

    /// Run the command once before waiting for the first change.
    #[arg(long)]
    pub run_on_start: bool,

    /// Optional TOML file with a `[watch]` table. CLI flags win over it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REMON_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Include glob patterns, relative to the root. Default: everything.
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Command words, joined with single spaces and run through `sh -c`.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl CliArgs {
    /// The command words joined the way they will be handed to the shell.
    pub fn command_line(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
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
