//! CLI module for ciswift
//!
//! This module provides the command-line driver over the Swift backend.
//!
//! ## Commands
//!
//! - `emit <file>` - Generate Swift from a serialized program (stdout or `-o`)
//! - `check <file>` - Report whether a serialized program can be generated
//!
//! ## Notes
//!
//! - Arguments are parsed with clap's derive API.
//! - Commands in [`commands`] report failure as a [`CliError`]; [`run`] turns it into a message on stderr and a
//!   process exit code.

// Failures are reported, never panicked on
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::backend::EmitConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The generator hit an internal invariant violation (a bug, not a property of the input).
    pub const INTERNAL: ExitCode = ExitCode(3);
}

/// A command failure: what to print and which status to exit with.
#[derive(Debug)]
pub struct CliError {
    /// Printed to stderr as is
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Failure with [`ExitCode::FAILURE`].
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Swift code generator for resolved Ć programs
#[derive(Parser, Debug)]
#[command(name = "ciswift")]
#[command(version = VERSION)]
#[command(about = "Generate Swift source from a resolved Ć program", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Swift source
    Emit {
        /// Serialized program (JSON)
        #[arg(value_name = "PROGRAM")]
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short = 'o', long = "output", value_name = "OUT")]
        output: Option<PathBuf>,
        /// Indent with N spaces instead of tabs
        #[arg(long, value_name = "N")]
        spaces: Option<usize>,
        /// Omit the generated-file banner
        #[arg(long = "no-header")]
        no_header: bool,
    },

    /// Check that a program can be generated, without writing output
    Check {
        /// Serialized program (JSON)
        #[arg(value_name = "PROGRAM")]
        file: PathBuf,
    },
}

impl Command {
    /// Emission settings selected by the flags of `emit`.
    fn emit_config(spaces: Option<usize>, no_header: bool) -> EmitConfig {
        let config = EmitConfig::new().with_header(!no_header);
        match spaces {
            Some(width) => config.with_spaces(width),
            None => config,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Parse the command line, run the command and exit with its status.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Emit {
            file,
            output,
            spaces,
            no_header,
        } => {
            let config = Command::emit_config(spaces, no_header);
            commands::emit_file(&file, output.as_deref(), config)
        }
        Command::Check { file } => commands::check_file(&file),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_emit() {
        let cli = Cli::try_parse_from(["ciswift", "emit", "prog.json"]).unwrap();
        if let Command::Emit {
            file,
            output,
            spaces,
            no_header,
        } = cli.command
        {
            assert_eq!(file, PathBuf::from("prog.json"));
            assert!(output.is_none());
            assert!(spaces.is_none());
            assert!(!no_header);
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_cli_parse_emit_with_options() {
        let cli =
            Cli::try_parse_from(["ciswift", "emit", "prog.json", "-o", "out.swift", "--spaces", "2", "--no-header"])
                .unwrap();
        if let Command::Emit {
            output,
            spaces,
            no_header,
            ..
        } = cli.command
        {
            assert_eq!(output, Some(PathBuf::from("out.swift")));
            assert_eq!(spaces, Some(2));
            assert!(no_header);
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["ciswift", "check", "prog.json"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["ciswift"]).is_err());
    }

    #[test]
    fn test_emit_config_from_flags() {
        assert_eq!(Command::emit_config(None, false), EmitConfig::default());
        let config = Command::emit_config(Some(2), true);
        assert_eq!(config.indent_unit(), "  ");
        assert!(!config.emit_header);
    }
}
