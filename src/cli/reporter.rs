//! Result reporters (pytest-style console and NDJSON)
//!
//! Both are [`RunObserver`]s, so they work the same whether results come from `Run::drive` or the paced
//! stream. They write to any `io::Write`; the first write error is kept and returned by `finish`.

use std::io::{self, Write};

use crate::engine::{RunEvent, RunObserver, RunOutcome, TestResult, TestStatus};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Keeps the first I/O error so the observer callbacks can stay infallible.
struct Sink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Sink<W> {
    fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{text}") {
            self.error = Some(e);
        }
    }

    fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Console reporter (pytest-style)
pub struct ConsoleReporter<W: Write> {
    sink: Sink<W>,
    color: bool,
    verbose: bool,
    elapsed_ms: u64,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool, verbose: bool) -> Self {
        Self {
            sink: Sink::new(out),
            color,
            verbose,
            elapsed_ms: 0,
        }
    }

    pub fn finish(self) -> io::Result<W> {
        self.sink.finish()
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> RunObserver for ConsoleReporter<W> {
    fn on_planned(&mut self, tests: &[String]) {
        let noun = if tests.len() == 1 { "item" } else { "items" };
        self.sink.line(&format!("collected {} {noun}", tests.len()));
        self.sink.line("");
    }

    fn on_result(&mut self, result: &TestResult) {
        let ms = result.duration_ms.unwrap_or(0);
        self.elapsed_ms += ms;
        let status = match result.status {
            TestStatus::Passed => format!("{} ({ms}ms)", self.paint(GREEN, "PASSED")),
            TestStatus::Failed => format!("{} ({ms}ms)", self.paint(RED, "FAILED")),
            TestStatus::Error => self.paint(RED, "ERROR"),
            TestStatus::Pending => self.paint(YELLOW, "PENDING"),
        };
        self.sink.line(&format!("{} {status}", result.name));
        if let Some(message) = &result.message {
            self.sink.line(&format!("    {message}"));
        }
        if self.verbose || result.status != TestStatus::Passed {
            for line in &result.output {
                self.sink.line(&format!("    | {line}"));
            }
        }
    }

    fn on_complete(&mut self, outcome: &RunOutcome) {
        let mut parts = Vec::new();
        if outcome.passed > 0 {
            parts.push(self.paint(GREEN, &format!("{} passed", outcome.passed)));
        }
        if outcome.failed > 0 {
            parts.push(self.paint(RED, &format!("{} failed", outcome.failed)));
        }
        if outcome.errors > 0 {
            let noun = if outcome.errors == 1 { "error" } else { "errors" };
            parts.push(self.paint(RED, &format!("{} {noun}", outcome.errors)));
        }
        if outcome.cancelled {
            parts.push(self.paint(YELLOW, "cancelled"));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }
        let seconds = self.elapsed_ms as f64 / 1000.0;
        self.sink.line("");
        self.sink.line(&format!("====== {} in {seconds:.2}s ======", parts.join(", ")));
    }
}

/// One JSON object per line, in the shape of [`RunEvent`].
pub struct JsonReporter<W: Write> {
    sink: Sink<W>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { sink: Sink::new(out) }
    }

    pub fn finish(self) -> io::Result<W> {
        self.sink.finish()
    }

    fn emit(&mut self, event: &RunEvent) {
        match serde_json::to_string(event) {
            Ok(line) => self.sink.line(&line),
            Err(e) => {
                if self.sink.error.is_none() {
                    self.sink.error = Some(io::Error::other(e));
                }
            }
        }
    }
}

impl<W: Write> RunObserver for JsonReporter<W> {
    fn on_planned(&mut self, tests: &[String]) {
        self.emit(&RunEvent::Planned { tests: tests.to_vec() });
    }

    fn on_result(&mut self, result: &TestResult) {
        self.emit(&RunEvent::Finished { result: result.clone() });
    }

    fn on_complete(&mut self, outcome: &RunOutcome) {
        self.emit(&RunEvent::Completed { outcome: *outcome });
    }
}

/// Forward one streamed event to `observer`.
pub fn dispatch(observer: &mut dyn RunObserver, event: &RunEvent) {
    match event {
        RunEvent::Planned { tests } => observer.on_planned(tests),
        RunEvent::Finished { result } => observer.on_result(result),
        RunEvent::Completed { outcome } => observer.on_complete(outcome),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn console(verbose: bool, feed: impl FnOnce(&mut dyn RunObserver)) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), false, verbose);
        feed(&mut reporter);
        String::from_utf8(reporter.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_console_lists_each_result_and_a_summary() {
        let out = console(false, |r| {
            r.on_planned(&["a".to_string(), "b".to_string()]);
            r.on_result(&TestResult::passed("a", 4));
            r.on_result(&TestResult::failed("b", "Expected 1 but got 2", 6).with_output(vec!["dbg".to_string()]));
            r.on_complete(&RunOutcome::from_results(&[TestResult::passed("a", 4), TestResult::failed("b", "", 6)]));
        });
        assert_eq!(
            out,
            "collected 2 items\n\na PASSED (4ms)\nb FAILED (6ms)\n    Expected 1 but got 2\n    | dbg\n\n====== 1 passed, 1 failed in 0.01s ======\n"
        );
    }

    #[test]
    fn test_console_hides_passing_output_unless_verbose() {
        let passed = TestResult::passed("a", 0).with_output(vec!["hello".to_string()]);
        assert!(!console(false, |r| r.on_result(&passed)).contains("hello"));
        assert!(console(true, |r| r.on_result(&passed)).contains("    | hello"));
    }

    #[test]
    fn test_console_colors_when_asked() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true, false);
        reporter.on_result(&TestResult::passed("a", 1));
        let out = String::from_utf8(reporter.finish().unwrap()).unwrap();
        assert_eq!(out, "a \x1b[32mPASSED\x1b[0m (1ms)\n");
    }

    #[test]
    fn test_json_reporter_writes_one_event_per_line() {
        let mut reporter = JsonReporter::new(Vec::new());
        dispatch(&mut reporter, &RunEvent::Planned { tests: vec!["a".to_string()] });
        dispatch(&mut reporter, &RunEvent::Finished { result: TestResult::passed("a", 0) });
        let out = String::from_utf8(reporter.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], r#"{"event":"planned","tests":["a"]}"#);
        assert_eq!(lines[1], r#"{"event":"finished","result":{"name":"a","status":"passed","durationMs":0}}"#);
    }

    #[test]
    fn test_finish_flushes_buffered_output() {
        let mut reporter = JsonReporter::new(io::BufWriter::new(Vec::new()));
        dispatch(&mut reporter, &RunEvent::Planned { tests: vec!["a".to_string()] });
        let writer = reporter.finish().unwrap();
        assert_eq!(writer.buffer().len(), 0);
        assert_eq!(writer.get_ref().as_slice(), b"{\"event\":\"planned\",\"tests\":[\"a\"]}\n");
    }
}
