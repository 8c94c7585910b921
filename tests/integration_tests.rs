//! End-to-end runs through the public API: the canonical scenarios plus the fatal shapes.

use std::time::Duration;

use testduel::engine::{CollectingObserver, EngineConfig, Run, RunRequest, TestResult, TestStatus, run_to_end};
use testduel::mutations::{self, BugPattern};
use testduel::runtime::Limits;

fn run(program: &str, tests: &str) -> Vec<TestResult> {
    run_with(EngineConfig::default().with_random_seed(Some(1)), program, tests)
}

fn run_with(config: EngineConfig, program: &str, tests: &str) -> Vec<TestResult> {
    let (results, _) = run_to_end(RunRequest::new(program, tests), &config).expect("run starts");
    results
}

fn statuses(results: &[TestResult]) -> Vec<(&str, TestStatus)> {
    results.iter().map(|r| (r.name.as_str(), r.status)).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_pass_then_expectation_mismatch() {
    let results = run(
        "return { add: (a,b) => a+b }",
        "function t1(){ assertEqual(add(2,3),5); } function t2(){ assertEqual(add(1,1),3); }",
    );
    assert_eq!(statuses(&results), vec![("t1", TestStatus::Passed), ("t2", TestStatus::Failed)]);
    assert_eq!(results[0].message, None);
    assert_eq!(results[1].message.as_deref(), Some("Expected 3, but got 2"));
    assert!(results.iter().all(|r| r.duration_ms.is_some()));
}

#[test]
fn scenario_b_program_syntax_error_is_the_only_result() {
    let results = run("return { add: (a, b) => a + };", "function t1() { assertEqual(add(1, 2), 3); }");
    assert_eq!(statuses(&results), vec![("Program Evaluation", TestStatus::Error)]);
    let message = results[0].message.as_deref().unwrap_or_default();
    assert!(message.starts_with("SyntaxError: "), "{message}");
}

#[test]
fn scenario_c_no_test_functions() {
    let results = run("return { add: (a, b) => a + b };", "// no functions here");
    assert_eq!(statuses(&results), vec![("Test Discovery", TestStatus::Error)]);
    assert!(results[0].message.as_deref().unwrap_or_default().starts_with("No test functions found."));
}

#[test]
fn scenario_d_runtime_exception_fails_only_that_test() {
    let results = run(
        "return { add: (a, b) => a + b };",
        "function boom() { return subtract(1, 2); }\nfunction after() { assertEqual(add(1, 2), 3); }",
    );
    assert_eq!(statuses(&results), vec![("boom", TestStatus::Failed), ("after", TestStatus::Passed)]);
    assert_eq!(results[0].message.as_deref(), Some("subtract is not defined"));
}

// ============================================================================
// Fatal shapes and isolation
// ============================================================================

#[test]
fn program_that_throws_yields_a_single_error() {
    let results = run("throw new Error('exploded');", "function t() {}");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, TestStatus::Error);
    assert_eq!(results[0].message.as_deref(), Some("exploded"));
}

#[test]
fn program_must_return_a_plain_object() {
    for program in ["return 5;", "return [1];", "return () => 1;", "const x = 1;"] {
        let results = run(program, "function t() {}");
        assert_eq!(statuses(&results), vec![("Program Evaluation", TestStatus::Error)], "{program}");
    }
}

#[test]
fn empty_discovery_wins_even_with_a_valid_program() {
    let results = run("return {};", "const notATest = () => 1;");
    assert_eq!(statuses(&results), vec![("Test Discovery", TestStatus::Error)]);
}

#[test]
fn tests_do_not_leak_bindings_into_each_other() {
    let results = run(
        "let count = 0; return { bump: () => ++count };",
        "function first() { var local = bump(); assertEqual(local, 1); leaked = local; }
         function second() { assertEqual(typeof local, 'undefined'); assertEqual(bump(), 2); }",
    );
    // Program state is shared across tests; test-local bindings are not.
    assert_eq!(results[0].status, TestStatus::Failed);
    assert_eq!(results[0].message.as_deref(), Some("leaked is not defined"));
    assert_eq!(results[1].status, TestStatus::Passed, "{:?}", results[1].message);
}

#[test]
fn custom_assertion_messages_override_the_default() {
    let results = run(
        "return { isEven: n => n % 2 === 0 };",
        "function odd() { assertTrue(isEven(3), 'three is odd'); }\nfunction plain() { assert(false); }",
    );
    assert_eq!(results[0].message.as_deref(), Some("three is odd"));
    assert_eq!(results[1].status, TestStatus::Failed);
}

#[test]
fn runaway_test_is_halted_and_the_run_continues() {
    let config = EngineConfig::default().with_limits(Limits::default().with_max_steps(50_000));
    let results = run_with(
        config,
        "return { spin: () => { while (true) {} } };",
        "function hangs() { spin(); }\nfunction fine() { assertTrue(true); }",
    );
    assert_eq!(statuses(&results), vec![("hangs", TestStatus::Failed), ("fine", TestStatus::Passed)]);
    assert_eq!(results[0].message.as_deref(), Some("Execution exceeded the step budget of 50000 steps"));
}

#[test]
fn time_budget_halts_a_slow_test() {
    let config = EngineConfig::default()
        .with_limits(Limits::default().with_max_steps(1_000_000_000_000))
        .with_time_budget(Duration::from_millis(50));
    let results = run_with(config, "return {};", "function slow() { for (;;) {} }");
    assert_eq!(results[0].status, TestStatus::Failed);
    assert_eq!(results[0].message.as_deref(), Some("Execution timed out after 50 ms"));
}

#[test]
fn console_output_is_attached_to_the_test() {
    let results = run("return {};", "function chatty() { console.log('hi', 1 + 1); }");
    assert_eq!(results[0].output, vec!["hi 2".to_string()]);
}

#[test]
fn duplicate_names_run_the_last_definition_once() {
    let results = run("return {};", "function t() { assert(false); }\nfunction t() { assert(true); }");
    assert_eq!(statuses(&results), vec![("t", TestStatus::Passed)]);
}

#[test]
fn observer_sees_the_plan_then_each_result() {
    let mut run = Run::start(
        RunRequest::new("return { one: () => 1 };", "function a() { assertEqual(one(), 1); } function b() {}"),
        &EngineConfig::default(),
    )
    .expect("run starts");
    let mut observer = CollectingObserver::default();
    let outcome = run.drive(&mut observer);
    assert_eq!(observer.planned, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(observer.results.len(), 2);
    assert_eq!(observer.outcome, Some(outcome));
    assert!(outcome.is_success());
}

#[test]
fn injected_bug_is_caught_by_the_suite() {
    let program = "function isAdult(age) { if (age >= 18) return true; return false; }\nreturn { isAdult };";
    let tests = "function adult() { assertTrue(isAdult(30)); }\nfunction minor() { assertFalse(isAdult(3)); }";
    assert!(run(program, tests).iter().all(|r| r.status == TestStatus::Passed));

    let mutation = mutations::inject(program, BugPattern::ReturnValue).expect("rules compile");
    assert!(mutation.changed);
    let results = run(&mutation.source, tests);
    assert!(results.iter().all(|r| r.status == TestStatus::Failed));
}
