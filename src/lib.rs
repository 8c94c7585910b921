#![forbid(unsafe_code)]
//! Test Duel's test execution engine
//!
//! Evaluates a program written in a JavaScript subset, discovers the named test functions in a second
//! source, and runs each one against the program's exports, emitting a result per test as it finishes.
//!
//! - [`runtime`]: the sandboxed interpreter and its host capabilities.
//! - [`engine`]: program evaluation, discovery, assertions and the run state machine.
//! - [`challenges`]: the bundled puzzles.
//! - [`mutations`]: canned bug injection.
//! - [`cli`]: the `testduel` binary.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`. Script errors never panic the host; they surface as thrown values
//!   or halts.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod challenges;
pub mod cli;
pub mod engine;
pub mod mutations;
pub mod runtime;

pub use duel_syntax::{ast, diagnostics, lexer, parser};

pub use engine::{
    EngineConfig, Run, RunError, RunEvent, RunOutcome, RunRequest, Session, TestResult, TestStatus, discover,
    run_to_end,
};
