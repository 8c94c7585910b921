//! Result records and the events a run emits.

use serde::Serialize;

use duel_core::errors::{NO_TESTS_FOUND_MSG, PROGRAM_EVALUATION_PHASE, TEST_DISCOVERY_PHASE};

/// Per-test state. `Pending` is the only non-terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Passed,
    Failed,
    Error,
}

impl TestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Pending => "pending",
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        self != TestStatus::Pending
    }
}

/// One entry of a run's result log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Console lines the test printed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
}

impl TestResult {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Pending,
            message: None,
            duration_ms: None,
            output: Vec::new(),
        }
    }

    pub fn passed(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            status: TestStatus::Passed,
            duration_ms: Some(duration_ms),
            ..Self::pending(name)
        }
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            status: TestStatus::Failed,
            message: Some(message.into()),
            duration_ms: Some(duration_ms),
            ..Self::pending(name)
        }
    }

    /// The sole result of a run whose program did not evaluate.
    pub fn program_error(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Error,
            message: Some(message.into()),
            ..Self::pending(PROGRAM_EVALUATION_PHASE)
        }
    }

    /// The sole result of a run whose test source holds no test functions.
    pub fn discovery_empty() -> Self {
        Self {
            status: TestStatus::Error,
            message: Some(NO_TESTS_FOUND_MSG.to_string()),
            ..Self::pending(TEST_DISCOVERY_PHASE)
        }
    }

    pub fn with_output(mut self, output: Vec<String>) -> Self {
        self.output = output;
        self
    }
}

/// Counts per status, folded from a result log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub pending: usize,
    pub total: usize,
    /// The run stopped early on request; the log holds what finished before that.
    pub cancelled: bool,
}

impl RunOutcome {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a TestResult>) -> Self {
        results.into_iter().fold(RunOutcome::default(), |mut outcome, result| {
            match result.status {
                TestStatus::Pending => outcome.pending += 1,
                TestStatus::Passed => outcome.passed += 1,
                TestStatus::Failed => outcome.failed += 1,
                TestStatus::Error => outcome.errors += 1,
            }
            outcome.total += 1;
            outcome
        })
    }

    /// At least one test ran and every result passed.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.total > 0 && self.passed == self.total
    }
}

/// What one step of a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RunEvent {
    /// Discovery succeeded; these tests will run in this order.
    Planned { tests: Vec<String> },
    /// A result was appended to the log.
    Finished { result: TestResult },
    /// The run is over; no further events follow.
    Completed { outcome: RunOutcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counts_each_status() {
        let results = [
            TestResult::passed("a", 1),
            TestResult::failed("b", "nope", 2),
            TestResult::pending("c"),
            TestResult::program_error("boom"),
        ];
        let outcome = RunOutcome::from_results(&results);
        assert_eq!((outcome.passed, outcome.failed, outcome.pending, outcome.errors, outcome.total), (1, 1, 1, 1, 4));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_empty_log_is_not_a_success() {
        assert!(!RunOutcome::from_results(&[]).is_success());
        assert!(RunOutcome::from_results(&[TestResult::passed("a", 0)]).is_success());
    }

    #[test]
    fn test_serialises_with_camel_case_fields() {
        let json = serde_json::to_string(&TestResult::failed("t2", "Expected 3, but got 2", 4)).unwrap();
        assert_eq!(json, r#"{"name":"t2","status":"failed","message":"Expected 3, but got 2","durationMs":4}"#);
        let event = serde_json::to_string(&RunEvent::Planned { tests: vec!["t1".into()] }).unwrap();
        assert_eq!(event, r#"{"event":"planned","tests":["t1"]}"#);
    }
}
