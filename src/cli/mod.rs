//! CLI module for the Vascal translator
//!
//! ## Usage
//!
//! - `vascal <FILE>` - Translate a program; diagnostics go to stderr, the quadruple listing to stdout
//! - `vascal --lex <FILE>` - Dump the token stream (debug)
//! - `vascal --tables` - Print the parse table and the production list
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::CompileOptions;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
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

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Vascal to quadruple translator
#[derive(Parser, Debug)]
#[command(name = "vascal")]
#[command(version = VERSION)]
#[command(about = "Translate Vascal programs into quadruple intermediate code", long_about = None)]
pub struct Cli {
    /// Source file to translate
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Write the quadruple listing to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE", requires = "file")]
    pub output: Option<PathBuf>,

    /// Also print the global symbol table
    #[arg(long = "symbols", requires = "file")]
    pub symbols: bool,

    /// Log every semantic action (needs RUST_LOG=trace)
    #[arg(long = "trace", requires = "file")]
    pub trace: bool,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "file")]
    pub lex_file: Option<PathBuf>,

    /// Print the parse table and productions (debug)
    #[arg(long = "tables", conflicts_with_all = ["file", "lex_file"])]
    pub tables: bool,
}

impl Cli {
    /// Compile options selected by the flags.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::new()
            .with_trace_actions(self.trace)
            .with_dump_symbols(self.symbols)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
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

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = &cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if cli.tables {
        return commands::print_tables();
    }

    let options = cli.compile_options();
    match cli.file {
        Some(file) => commands::compile_file(&file.to_string_lossy(), &options, cli.output.as_deref()),
        // No file - show help
        None => Err(CliError::failure("Error: no input file (try --help)")),
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
    fn test_cli_parse_file() {
        let cli = Cli::try_parse_from(["vascal", "prog.vas"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("prog.vas")));
        assert!(!cli.symbols);
        assert_eq!(cli.compile_options(), CompileOptions::default());
    }

    #[test]
    fn test_cli_parse_output_and_flags() {
        let cli = Cli::try_parse_from(["vascal", "prog.vas", "-o", "out.txt", "--symbols", "--trace"]).unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        let options = cli.compile_options();
        assert!(options.dump_symbols);
        assert!(options.trace_actions);
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["vascal", "--lex", "prog.vas"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["vascal", "--tables"]).unwrap();
        assert!(cli.tables);
    }

    #[test]
    fn test_cli_rejects_conflicts() {
        assert!(Cli::try_parse_from(["vascal", "prog.vas", "--lex", "other.vas"]).is_err());
        assert!(Cli::try_parse_from(["vascal", "--tables", "prog.vas"]).is_err());
        assert!(Cli::try_parse_from(["vascal", "--symbols"]).is_err());
    }
}
