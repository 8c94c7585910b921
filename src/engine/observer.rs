//! Callbacks for consumers that want results pushed to them.

use super::result::{RunOutcome, TestResult};

/// Receives a run's events in order. Every method defaults to doing nothing.
pub trait RunObserver {
    /// Discovery succeeded and these tests are about to run.
    fn on_planned(&mut self, _tests: &[String]) {}

    /// A result was appended to the log.
    fn on_result(&mut self, _result: &TestResult) {}

    /// The run finished.
    fn on_complete(&mut self, _outcome: &RunOutcome) {}
}

/// Keeps every result it is shown.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    pub planned: Vec<String>,
    pub results: Vec<TestResult>,
    pub outcome: Option<RunOutcome>,
}

impl RunObserver for CollectingObserver {
    fn on_planned(&mut self, tests: &[String]) {
        self.planned = tests.to_vec();
    }

    fn on_result(&mut self, result: &TestResult) {
        self.results.push(result.clone());
    }

    fn on_complete(&mut self, outcome: &RunOutcome) {
        self.outcome = Some(*outcome);
    }
}
