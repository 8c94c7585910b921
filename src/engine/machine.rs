//! The per-run state machine: `NotStarted → Running → Completed`.
//!
//! [`RunMachine`] owns the interpreter and is therefore confined to the thread that created it. Every call
//! to [`Iterator::next`] performs one step and returns its event; the caller decides when to take the next
//! one, which is what makes results observable one at a time.

use std::collections::VecDeque;
use std::time::Instant;

use duel_syntax::ast::Stmt;
use duel_syntax::parser;

use super::assertions;
use super::cancel::CancelHandle;
use super::config::EngineConfig;
use super::discovery::{self, TestDefinition};
use super::program::{self, Bindings};
use super::result::{RunEvent, RunOutcome, TestResult};
use crate::runtime::{BindingKind, Interpreter, Scope, Value};

/// The two sources of one run, copied when the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub program_source: String,
    pub test_source: String,
}

impl RunRequest {
    pub fn new(program_source: impl Into<String>, test_source: impl Into<String>) -> Self {
        Self {
            program_source: program_source.into(),
            test_source: test_source.into(),
        }
    }
}

/// Coarse run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
}

enum Phase {
    NotStarted,
    Running {
        /// Frame holding the program's exports; parent of every test's frame.
        exports: Scope,
        remaining: VecDeque<TestDefinition>,
    },
    /// The synthetic result was emitted; only `Completed` remains.
    Finishing,
    Completed,
}

/// Steps through one run.
pub struct RunMachine {
    request: RunRequest,
    interp: Interpreter,
    phase: Phase,
    log: Vec<TestResult>,
    cancel: CancelHandle,
}

impl RunMachine {
    pub fn new(request: RunRequest, config: &EngineConfig) -> Self {
        Self {
            request,
            interp: Interpreter::new(&config.capabilities, config.limits, config.random_seed),
            phase: Phase::NotStarted,
            log: Vec::new(),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> RunState {
        match self.phase {
            Phase::NotStarted => RunState::NotStarted,
            Phase::Running { .. } | Phase::Finishing => RunState::Running,
            Phase::Completed => RunState::Completed,
        }
    }

    /// The append-only result log so far.
    pub fn results(&self) -> &[TestResult] {
        &self.log
    }

    fn start(&mut self) -> RunEvent {
        tracing::info!(
            program_len = self.request.program_source.len(),
            tests_len = self.request.test_source.len(),
            "run started"
        );
        let bindings = match program::evaluate_program(&mut self.interp, &self.request.program_source) {
            Ok(bindings) => bindings,
            Err(err) => {
                tracing::info!(error = %err, "program evaluation failed");
                let output = self.interp.take_output();
                return self.finish_with(TestResult::program_error(err.to_string()).with_output(output));
            }
        };
        let discovery = discovery::discover(&self.request.test_source);
        if discovery.is_empty() {
            return self.finish_with(TestResult::discovery_empty());
        }
        let exports = self.export_scope(&bindings);
        let tests: Vec<String> = discovery.names().map(str::to_string).collect();
        self.phase = Phase::Running {
            exports,
            remaining: discovery.tests.into(),
        };
        RunEvent::Planned { tests }
    }

    fn export_scope(&self, bindings: &Bindings) -> Scope {
        let scope = self.interp.globals().child();
        for (name, value) in bindings.iter() {
            scope.declare(name, value.clone(), BindingKind::Let);
        }
        scope
    }

    /// Record a synthetic result and end the run after it.
    fn finish_with(&mut self, result: TestResult) -> RunEvent {
        self.log.push(result.clone());
        self.phase = Phase::Finishing;
        RunEvent::Finished { result }
    }

    fn complete(&mut self, cancelled: bool) -> RunEvent {
        self.phase = Phase::Completed;
        let outcome = RunOutcome {
            cancelled,
            ..RunOutcome::from_results(&self.log)
        };
        tracing::info!(
            passed = outcome.passed,
            failed = outcome.failed,
            errors = outcome.errors,
            cancelled,
            "run completed"
        );
        RunEvent::Completed { outcome }
    }

    fn run_test(&mut self, exports: &Scope, test: &TestDefinition) -> TestResult {
        self.interp.begin_unit();
        let scope = exports.child();
        assertions::install(&scope);
        let start = Instant::now();
        let outcome = self.invoke(test, &scope);
        let duration_ms = (start.elapsed().as_secs_f64() * 1000.0).round() as u64;
        let output = self.interp.take_output();
        let result = match outcome {
            Ok(()) => TestResult::passed(&test.name, duration_ms),
            Err(message) => TestResult::failed(&test.name, message, duration_ms),
        };
        tracing::debug!(test = %test.name, status = result.status.as_str(), duration_ms, "test finished");
        result.with_output(output)
    }

    /// Re-parse the test's own text, instantiate the function in `scope` and call it with no arguments.
    fn invoke(&mut self, test: &TestDefinition, scope: &Scope) -> Result<(), String> {
        let parsed = parser::parse_source(&test.body).map_err(|errors| match errors.first() {
            Some(err) => format!("SyntaxError: {}", err.located(&test.body)),
            None => "SyntaxError: invalid test".to_string(),
        })?;
        let def = parsed
            .body
            .iter()
            .find_map(|stmt| match &stmt.node {
                Stmt::Function(def) if def.name.as_deref() == Some(test.name.as_str()) => Some(def.clone()),
                _ => None,
            })
            .ok_or_else(|| format!("{} is not a function", test.name))?;
        let function = self.interp.make_closure(&def, scope, None);
        self.interp
            .call(&function, Value::Undefined, Vec::new())
            .map(|_| ())
            .map_err(|interrupt| self.interp.interrupt_message(&interrupt))
    }
}

impl Iterator for RunMachine {
    type Item = RunEvent;

    fn next(&mut self) -> Option<RunEvent> {
        match std::mem::replace(&mut self.phase, Phase::Completed) {
            Phase::NotStarted => Some(self.start()),
            Phase::Running { exports, mut remaining } => {
                if self.cancel.is_cancelled() {
                    tracing::info!(skipped = remaining.len(), "run cancelled");
                    return Some(self.complete(true));
                }
                let Some(test) = remaining.pop_front() else {
                    return Some(self.complete(false));
                };
                let result = self.run_test(&exports, &test);
                self.log.push(result.clone());
                self.phase = Phase::Running { exports, remaining };
                Some(RunEvent::Finished { result })
            }
            Phase::Finishing => Some(self.complete(false)),
            Phase::Completed => None,
        }
    }
}

impl std::iter::FusedIterator for RunMachine {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::result::TestStatus;

    fn events(program: &str, tests: &str) -> Vec<RunEvent> {
        let config = EngineConfig::default().with_random_seed(Some(3));
        RunMachine::new(RunRequest::new(program, tests), &config).collect()
    }

    #[test]
    fn test_each_step_yields_one_event() {
        let mut machine = RunMachine::new(
            RunRequest::new("return { one: () => 1 };", "function a() { assertEqual(one(), 1); } function b() {}"),
            &EngineConfig::default(),
        );
        assert_eq!(machine.state(), RunState::NotStarted);
        assert_eq!(machine.next(), Some(RunEvent::Planned { tests: vec!["a".into(), "b".into()] }));
        assert_eq!(machine.state(), RunState::Running);
        assert!(matches!(machine.next(), Some(RunEvent::Finished { result }) if result.name == "a"));
        assert_eq!(machine.results().len(), 1);
        assert!(matches!(machine.next(), Some(RunEvent::Finished { result }) if result.name == "b"));
        assert!(matches!(machine.next(), Some(RunEvent::Completed { outcome }) if outcome.passed == 2));
        assert_eq!(machine.state(), RunState::Completed);
        assert_eq!(machine.next(), None);
        assert_eq!(machine.next(), None);
    }

    #[test]
    fn test_program_failure_is_the_only_result() {
        let all = events("throw new Error('broken');", "function a() {}");
        assert_eq!(all.len(), 2);
        let RunEvent::Finished { result } = &all[0] else { panic!("expected a result, got {all:?}") };
        assert_eq!(result.status, TestStatus::Error);
        assert_eq!(result.message.as_deref(), Some("broken"));
    }

    #[test]
    fn test_state_is_shared_between_tests() {
        let all = events(
            "let n = 0; return { bump: () => ++n };",
            "function first() { assertEqual(bump(), 1); } function second() { assertEqual(bump(), 2); }",
        );
        let RunEvent::Completed { outcome } = all.last().unwrap() else { panic!() };
        assert_eq!(outcome.passed, 2);
    }

    #[test]
    fn test_assertions_shadow_exports() {
        let all = events(
            "return { assert: () => 'mine', value: 1 };",
            "function t() { assert(value === 2); }",
        );
        let RunEvent::Finished { result } = &all[1] else { panic!() };
        assert_eq!(result.message.as_deref(), Some("Assertion failed"));
    }

    #[test]
    fn test_console_output_is_attached_to_the_test() {
        let all = events("return {};", "function noisy() { console.log('hi', 2); }");
        let RunEvent::Finished { result } = &all[1] else { panic!() };
        assert_eq!(result.output, vec!["hi 2".to_string()]);
    }

    #[test]
    fn test_cancel_stops_between_tests() {
        let cancel = CancelHandle::new();
        let mut machine = RunMachine::new(
            RunRequest::new("return {};", "function a() {} function b() {}"),
            &EngineConfig::default(),
        )
        .with_cancel(cancel.clone());
        machine.next();
        machine.next();
        cancel.cancel();
        let Some(RunEvent::Completed { outcome }) = machine.next() else { panic!() };
        assert!(outcome.cancelled);
        assert_eq!(outcome.total, 1);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_unparseable_test_body_fails_only_that_test() {
        let all = events("return {};", "function bad() { let = ; } function good() {}");
        let statuses: Vec<_> = all
            .iter()
            .filter_map(|e| match e {
                RunEvent::Finished { result } => Some(result.status),
                _ => None,
            })
            .collect();
        assert_eq!(statuses, vec![TestStatus::Failed, TestStatus::Passed]);
    }
}
