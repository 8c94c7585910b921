//! Snapshot tests for reporter output
//!
//! Runs go through the real engine; durations are zeroed before reporting so the text is stable.

use testduel::cli::reporter::{ConsoleReporter, JsonReporter, dispatch};
use testduel::engine::{EngineConfig, Run, RunEvent, RunObserver, RunRequest};

const PROGRAM: &str = "return { add: (a,b) => a+b }";
const TESTS: &str = "function t1(){ assertEqual(add(2,3),5); } function t2(){ assertEqual(add(1,1),3); }";

fn feed(program: &str, tests: &str, observer: &mut dyn RunObserver) {
    let run = Run::start(RunRequest::new(program, tests), &EngineConfig::default()).expect("run starts");
    for mut event in run {
        if let RunEvent::Finished { result } = &mut event {
            result.duration_ms = result.duration_ms.map(|_| 0);
        }
        dispatch(observer, &event);
    }
}

fn console(program: &str, tests: &str) -> String {
    let mut reporter = ConsoleReporter::new(Vec::new(), false, false);
    feed(program, tests, &mut reporter);
    String::from_utf8(reporter.finish().expect("in-memory writes succeed")).expect("utf-8 output")
}

#[test]
fn console_pass_and_fail() {
    insta::assert_snapshot!("console_pass_and_fail", console(PROGRAM, TESTS));
}

#[test]
fn console_empty_discovery() {
    insta::assert_snapshot!("console_empty_discovery", console(PROGRAM, "// no functions here"));
}

#[test]
fn console_runtime_failure_with_output() {
    let tests = "function noisy() { console.log('value', add(1, 2)); return missing(); }";
    insta::assert_snapshot!("console_runtime_failure_with_output", console(PROGRAM, tests));
}

#[test]
fn json_event_stream() {
    let mut reporter = JsonReporter::new(Vec::new());
    feed(PROGRAM, TESTS, &mut reporter);
    let out = String::from_utf8(reporter.finish().expect("in-memory writes succeed")).expect("utf-8 output");
    insta::assert_snapshot!("json_event_stream", out);
}

#[test]
fn json_outcome_shape() {
    let (_, outcome) = testduel::run_to_end(RunRequest::new(PROGRAM, TESTS), &EngineConfig::default())
        .expect("run starts");
    insta::assert_json_snapshot!("json_outcome_shape", outcome);
}
