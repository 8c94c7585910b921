//! CLI for the Test Duel engine
//!
//! ## Commands
//!
//! - `run` - Run a test suite against a program (or a bundled challenge) and report results
//! - `discover <file>` - List the test functions a test file defines
//! - `challenges` - List the bundled challenges
//! - `inject <file> --pattern <id>` - Print a program with a canned bug injected
//!
//! ## Design
//!
//! Command functions return `CliResult<ExitCode>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod reporter;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::challenges::Difficulty;
use crate::engine::RunError;
use crate::mutations::{BugPattern, MutationError};

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

/// A user-facing error and the exit code that goes with it.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    /// Already formatted for display
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

    /// Exit code 1.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Exit code 2, reserved for problems with the inputs themselves.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode(2))
    }
}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        CliError::failure(format!("Error: {err}"))
    }
}

impl From<MutationError> for CliError {
    fn from(err: MutationError) -> Self {
        CliError::usage(format!("Error: {err}"))
    }
}

pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run Test Duel suites against JavaScript-subset programs
#[derive(Parser, Debug)]
#[command(name = "testduel")]
#[command(version = VERSION)]
#[command(about = "In-process test runner for Test Duel", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, one line per test
    #[default]
    Text,
    /// Newline-delimited JSON events
    Json,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Program source file (must end with `return { ... }`)
    #[arg(long, value_name = "FILE", required_unless_present = "challenge", requires = "tests")]
    pub program: Option<PathBuf>,

    /// Test source file
    #[arg(long, value_name = "FILE", required_unless_present = "challenge", requires = "program")]
    pub tests: Option<PathBuf>,

    /// Run a bundled challenge instead of files
    #[arg(long, value_name = "ID", conflicts_with_all = ["program", "tests"])]
    pub challenge: Option<u32>,

    /// Inject a canned bug into the program before running
    #[arg(long, value_name = "PATTERN")]
    pub bug: Option<BugPattern>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Delay after each result, in milliseconds
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub pacing_ms: u64,

    /// Seed for Math.random
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Wall-clock budget per evaluation unit, in milliseconds
    #[arg(long, value_name = "N")]
    pub time_budget_ms: Option<u64>,

    /// Show console output of passing tests and syntax diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a test suite and report results
    Run(RunArgs),

    /// List the test functions a file defines
    Discover {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the bundled challenges
    Challenges {
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
    },

    /// Print a program with a canned bug injected
    Inject {
        #[arg(value_name = "FILE", required_unless_present = "list")]
        file: Option<PathBuf>,
        #[arg(short, long, value_name = "PATTERN", required_unless_present = "list")]
        pattern: Option<BugPattern>,
        /// List the available patterns
        #[arg(long, conflicts_with_all = ["file", "pattern"])]
        list: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
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
        Command::Run(args) => commands::run_suite(&args),
        Command::Discover { file } => commands::discover_file(&file),
        Command::Challenges { difficulty } => commands::list_challenges(difficulty),
        Command::Inject { file, pattern, list } => match (file, pattern) {
            _ if list => commands::list_patterns(),
            (Some(file), Some(pattern)) => commands::inject_file(&file, pattern),
            _ => Err(CliError::usage("Error: inject requires a file and --pattern, or --list")),
        },
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
    fn test_cli_parse_run_with_files() {
        let cli = Cli::try_parse_from(["testduel", "run", "--program", "p.js", "--tests", "t.js"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("Expected Run command");
        };
        assert_eq!(args.program.as_deref(), Some(std::path::Path::new("p.js")));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.pacing_ms, 0);
    }

    #[test]
    fn test_cli_parse_run_with_challenge_and_bug() {
        let cli = Cli::try_parse_from([
            "testduel", "run", "--challenge", "3", "--bug", "off-by-one", "--format", "json", "--seed", "9",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("Expected Run command");
        };
        assert_eq!(args.challenge, Some(3));
        assert_eq!(args.bug, Some(BugPattern::OffByOne));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn test_cli_run_requires_both_files() {
        assert!(Cli::try_parse_from(["testduel", "run", "--program", "p.js"]).is_err());
        assert!(Cli::try_parse_from(["testduel", "run"]).is_err());
        assert!(Cli::try_parse_from(["testduel", "run", "--challenge", "1", "--tests", "t.js"]).is_err());
    }

    #[test]
    fn test_cli_parse_discover_and_challenges() {
        let cli = Cli::try_parse_from(["testduel", "discover", "t.js"]).unwrap();
        assert!(matches!(cli.command, Command::Discover { .. }));

        let cli = Cli::try_parse_from(["testduel", "challenges", "--difficulty", "hard"]).unwrap();
        assert!(matches!(cli.command, Command::Challenges { difficulty: Some(Difficulty::Hard) }));
    }

    #[test]
    fn test_cli_parse_inject() {
        let cli = Cli::try_parse_from(["testduel", "inject", "--list"]).unwrap();
        assert!(matches!(cli.command, Command::Inject { list: true, .. }));

        let cli = Cli::try_parse_from(["testduel", "inject", "p.js", "-p", "return-value"]).unwrap();
        assert!(matches!(cli.command, Command::Inject { pattern: Some(BugPattern::ReturnValue), .. }));

        assert!(Cli::try_parse_from(["testduel", "inject", "p.js"]).is_err());
        assert!(Cli::try_parse_from(["testduel", "inject", "p.js", "-p", "nope"]).is_err());
    }
}
