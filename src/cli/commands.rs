//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::time::Duration;

use tokio_stream::StreamExt;

use duel_syntax::diagnostics;
use duel_syntax::parser::parse_source;

use super::reporter::{ConsoleReporter, JsonReporter, dispatch};
use super::{CliError, CliResult, ExitCode, OutputFormat, RunArgs};
use crate::challenges::{self, Difficulty};
use crate::engine::{EngineConfig, Run, RunEvent, RunObserver, RunOutcome, RunRequest, Session, discover, run_stream};
use crate::mutations::{self, BugPattern};

// ============================================================================
// Shared helpers
// ============================================================================

fn read_source(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|e| CliError::usage(format!("Error reading {}: {e}", path.display())))
}

fn write_error(e: io::Error) -> CliError {
    CliError::failure(format!("Error writing output: {e}"))
}

/// Print every syntax error in `source` as a `miette` report on stderr. Returns whether it parsed.
fn report_syntax(file_name: &str, source: &str) -> bool {
    match parse_source(source) {
        Ok(_) => true,
        Err(errors) => {
            for error in &errors {
                let report: miette::Report = diagnostics::render(file_name, source, error);
                eprintln!("{report:?}");
            }
            false
        }
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}

// ============================================================================
// run
// ============================================================================

struct Suite {
    label: String,
    program: String,
    tests: String,
}

fn load_suite(args: &RunArgs) -> CliResult<Suite> {
    if let Some(id) = args.challenge {
        let challenge =
            challenges::find(id).ok_or_else(|| CliError::usage(format!("Error: no challenge with id {id}")))?;
        return Ok(Suite {
            label: format!("challenge {id}"),
            program: challenge.program.to_string(),
            tests: challenge.tests.to_string(),
        });
    }
    match (&args.program, &args.tests) {
        (Some(program), Some(tests)) => Ok(Suite {
            label: program.display().to_string(),
            program: read_source(program)?,
            tests: read_source(tests)?,
        }),
        _ => Err(CliError::usage("Error: run requires --program and --tests, or --challenge")),
    }
}

fn engine_config(args: &RunArgs) -> EngineConfig {
    let config = EngineConfig::default().with_random_seed(args.seed);
    match args.time_budget_ms {
        Some(ms) => config.with_time_budget(Duration::from_millis(ms)),
        None => config,
    }
}

/// Run a suite and report it. Exits 0 only when every test passed.
pub fn run_suite(args: &RunArgs) -> CliResult<ExitCode> {
    let mut suite = load_suite(args)?;
    if let Some(pattern) = args.bug {
        let mutation = mutations::inject(&suite.program, pattern)?;
        if !mutation.changed {
            tracing::warn!(pattern = %pattern, "bug pattern matched nothing; running the program unchanged");
        }
        suite.program = mutation.source;
    }
    if args.verbose {
        report_syntax(&suite.label, &suite.program);
    }

    tracing::info!(suite = %suite.label, "starting run");
    let mut session = Session::new(engine_config(args));
    let run = session.start(RunRequest::new(suite.program, suite.tests))?;
    let pacing = Duration::from_millis(args.pacing_ms);

    let stdout = io::stdout().lock();
    let outcome = match args.format {
        OutputFormat::Text => {
            let color = io::stdout().is_terminal();
            let mut reporter = ConsoleReporter::new(stdout, color, args.verbose);
            let outcome = report(run, pacing, &mut reporter)?;
            let stdout = reporter.finish().map_err(write_error)?;
            drop(stdout);
            outcome
        }
        OutputFormat::Json => {
            let mut reporter = JsonReporter::new(stdout);
            let outcome = report(run, pacing, &mut reporter)?;
            let stdout = reporter.finish().map_err(write_error)?;
            drop(stdout);
            outcome
        }
    };

    tracing::info!(passed = outcome.passed, failed = outcome.failed, errors = outcome.errors, "run finished");
    Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Feed `run` into `observer`, through the paced stream when there is a delay to honour.
fn report(mut run: Run, pacing: Duration, observer: &mut dyn RunObserver) -> CliResult<RunOutcome> {
    if pacing.is_zero() {
        return Ok(run.drive(observer));
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting async runtime: {e}")))?;
    let outcome = runtime.block_on(async {
        let mut events = Box::pin(run_stream(run, pacing));
        let mut outcome = RunOutcome::default();
        while let Some(event) = events.next().await {
            if let RunEvent::Completed { outcome: done } = &event {
                outcome = *done;
            }
            dispatch(observer, &event);
        }
        outcome
    });
    Ok(outcome)
}

// ============================================================================
// discover
// ============================================================================

/// List the test functions in a file, warn about duplicates and show syntax errors.
pub fn discover_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let file_name = path.display().to_string();
    report_syntax(&file_name, &source);

    let discovery = discover(&source);
    let mut out = io::stdout().lock();
    for test in &discovery.tests {
        writeln!(out, "{} (line {})", test.name, line_of(&source, test.span.start)).map_err(write_error)?;
    }
    for name in &discovery.duplicates {
        eprintln!("warning: '{name}' is defined more than once; the last definition runs");
    }
    if discovery.is_empty() {
        return Err(CliError::failure(format!("No test functions found in {file_name}")));
    }
    let noun = if discovery.len() == 1 { "test" } else { "tests" };
    writeln!(out, "{} {noun} discovered", discovery.len()).map_err(write_error)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// challenges / inject
// ============================================================================

pub fn list_challenges(difficulty: Option<Difficulty>) -> CliResult<ExitCode> {
    let mut out = io::stdout().lock();
    let listed: Vec<_> = match difficulty {
        Some(d) => challenges::by_difficulty(d).collect(),
        None => challenges::catalog().iter().collect(),
    };
    for challenge in listed {
        writeln!(out, "{:>3}  {:<6}  {}", challenge.id, challenge.difficulty.as_str(), challenge.title).map_err(write_error)?;
    }
    Ok(ExitCode::SUCCESS)
}

pub fn list_patterns() -> CliResult<ExitCode> {
    let mut out = io::stdout().lock();
    for pattern in BugPattern::ALL {
        writeln!(
            out,
            "{:<16}  {:<6}  {}: {}",
            pattern.id(),
            pattern.difficulty().as_str(),
            pattern.title(),
            pattern.description()
        )
        .map_err(write_error)?;
    }
    Ok(ExitCode::SUCCESS)
}

pub fn inject_file(path: &Path, pattern: BugPattern) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let mutation = mutations::inject(&source, pattern)?;
    if !mutation.changed {
        eprintln!("note: '{pattern}' matched nothing in {}", path.display());
    }
    let mut out = io::stdout().lock();
    out.write_all(mutation.source.as_bytes()).map_err(write_error)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of_counts_newlines() {
        assert_eq!(line_of("a\nb\nfunction t() {}", 4), 3);
        assert_eq!(line_of("x", 99), 1);
    }

    #[test]
    fn test_report_syntax_accepts_valid_source() {
        assert!(report_syntax("p.js", "return { a: 1 };"));
        assert!(!report_syntax("p.js", "let = ;"));
    }

    #[test]
    fn test_report_collects_outcome_with_and_without_pacing() {
        for pacing in [Duration::ZERO, Duration::from_millis(1)] {
            let run = Run::start(
                RunRequest::new("return { two: () => 2 };", "function t() { assertEqual(two(), 2); }"),
                &EngineConfig::default(),
            )
            .unwrap();
            let mut reporter = JsonReporter::new(Vec::new());
            let outcome = report(run, pacing, &mut reporter).unwrap();
            assert!(outcome.is_success());
            let out = String::from_utf8(reporter.finish().unwrap()).unwrap();
            assert_eq!(out.lines().count(), 3);
        }
    }
}
