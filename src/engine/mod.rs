//! The test execution engine.
//!
//! A run evaluates the program source once, discovers the named test functions in the test source, and
//! executes them one at a time against the program's exports plus the assertion primitives. Results are
//! emitted as they finish.
//!
//! ## Layers
//!
//! - [`machine::RunMachine`]: the single-threaded state machine; one event per step.
//! - [`run::Run`]: the machine hosted on a worker thread, with a result log and cancellation.
//! - [`session::Session`]: rejects a second run while one is in flight.
//! - [`stream::run_stream`]: the run as an async `Stream`.
//!
//! ## Failure shapes
//!
//! A program that does not evaluate, and a test source with no tests, each end the run with one synthetic
//! `error` result. Any throw inside a test, assertion or not, is that test's `failed` result.

pub mod assertions;
pub mod cancel;
pub mod config;
pub mod discovery;
pub mod machine;
pub mod observer;
pub mod program;
pub mod result;
pub mod run;
pub mod session;
pub mod stream;

pub use cancel::CancelHandle;
pub use config::EngineConfig;
pub use discovery::{Discovery, TestDefinition, discover};
pub use machine::{RunMachine, RunRequest, RunState};
pub use observer::{CollectingObserver, RunObserver};
pub use program::{Bindings, ProgramEvaluationError, evaluate_program};
pub use result::{RunEvent, RunOutcome, TestResult, TestStatus};
pub use run::{Run, RunError};
pub use session::Session;
pub use stream::run_stream;

/// Run `request` to completion on a worker thread and return the result log and outcome.
pub fn run_to_end(request: RunRequest, config: &EngineConfig) -> Result<(Vec<TestResult>, RunOutcome), RunError> {
    let mut run = Run::start(request, config)?;
    let outcome = run.drive(&mut CollectingObserver::default());
    Ok((run.results().to_vec(), outcome))
}
