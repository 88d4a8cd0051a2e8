//! Command-line interface.
//!
//! One invocation compiles one source file:
//!
//! ```text
//! scar [options] <input>
//! ```
//!
//! Argument parsing uses clap derive macros. `run()` is the only place that
//! calls `process::exit`; everything below it returns `CliResult`.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::driver;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(driver::EXIT_SUCCESS);
    /// Source errors were reported.
    pub const FAILURE: ExitCode = ExitCode(driver::EXIT_ERRORS);
    /// A fatal or internal error aborted the compilation.
    pub const FATAL: ExitCode = ExitCode(driver::EXIT_FATAL);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
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

/// The scar language compiler
#[derive(Parser, Debug)]
#[command(name = "scar")]
#[command(version = VERSION)]
#[command(about = "Compiler for the scar language", long_about = None)]
pub struct Cli {
    /// Source file to compile
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file location
    #[arg(short = 'o', value_name = "FILE", default_value = "out")]
    pub output: PathBuf,

    /// Include debug info in the output
    #[arg(short = 'g')]
    pub debug_info: bool,

    /// Enable optimization
    #[arg(short = 'O')]
    pub optimize: bool,

    /// Disable warnings
    #[arg(long = "Woff")]
    pub warnings_off: bool,

    /// Treat warnings as errors
    #[arg(long = "Werr", conflicts_with = "warnings_off")]
    pub warnings_as_errors: bool,

    /// Output/package name (default: input file stem)
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
}

impl Cli {
    fn into_config(self) -> driver::Config {
        driver::Config {
            input: self.input,
            output: self.output,
            module_name: self.name,
            debug_info: self.debug_info,
            optimize: self.optimize,
            warnings_off: self.warnings_off,
            warnings_as_errors: self.warnings_as_errors,
        }
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
                eprintln!("{e}");
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the compilation and return its exit status.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.into_config();
    Ok(ExitCode(driver::compile(&config)))
}

// ============================================================================
// Tests
// ============================================================================
