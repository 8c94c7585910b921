//! [`Run`]: a run hosted on its own worker thread.
//!
//! The interpreter is single-threaded, so the [`RunMachine`] lives on a dedicated thread (with a large
//! stack for deeply recursive scripts). The `Run` handle is `Send` and pulls one step at a time over a
//! channel, so results still arrive one by one and the caller controls the pace.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use super::cancel::CancelHandle;
use super::config::EngineConfig;
use super::machine::{RunMachine, RunRequest};
use super::observer::RunObserver;
use super::result::{RunEvent, RunOutcome, TestResult};

/// Failures starting a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The session already has a run in flight.
    #[error("a run is already in progress for this session")]
    AlreadyRunning,
    #[error("failed to start the evaluation worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Handle to one run.
pub struct Run {
    step_tx: Option<mpsc::SyncSender<()>>,
    event_rx: mpsc::Receiver<RunEvent>,
    cancel: CancelHandle,
    /// Cleared once the run has completed or been dropped.
    active: Arc<AtomicBool>,
    planned: Vec<String>,
    log: Vec<TestResult>,
    outcome: Option<RunOutcome>,
}

impl Run {
    /// Snapshot `request` and start the worker. Nothing is evaluated until the first pull.
    pub fn start(request: RunRequest, config: &EngineConfig) -> Result<Run, RunError> {
        Self::start_tracked(request, config, Arc::new(AtomicBool::new(true)))
    }

    pub(crate) fn start_tracked(
        request: RunRequest,
        config: &EngineConfig,
        active: Arc<AtomicBool>,
    ) -> Result<Run, RunError> {
        let (step_tx, step_rx) = mpsc::sync_channel::<()>(0);
        let (event_tx, event_rx) = mpsc::channel::<RunEvent>();
        let cancel = CancelHandle::new();
        let worker_cancel = cancel.clone();
        let config = config.clone();
        thread::Builder::new()
            .name("testduel-run".to_string())
            .stack_size(config.stack_size)
            .spawn(move || {
                let mut machine = RunMachine::new(request, &config).with_cancel(worker_cancel);
                for () in step_rx.iter() {
                    let Some(event) = machine.next() else { break };
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Run {
            step_tx: Some(step_tx),
            event_rx,
            cancel,
            active,
            planned: Vec::new(),
            log: Vec::new(),
            outcome: None,
        })
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Results received so far, in execution order.
    pub fn results(&self) -> &[TestResult] {
        &self.log
    }

    /// The log followed by every planned test that has not run yet, shown as pending.
    pub fn view(&self) -> Vec<TestResult> {
        let mut view = self.log.clone();
        view.extend(self.planned.iter().skip(self.log.len()).map(TestResult::pending));
        view
    }

    /// The final outcome, once the run has completed.
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    /// Pull every remaining event through `observer` and return the outcome.
    pub fn drive(&mut self, observer: &mut dyn RunObserver) -> RunOutcome {
        while let Some(event) = self.next() {
            match &event {
                RunEvent::Planned { tests } => observer.on_planned(tests),
                RunEvent::Finished { result } => observer.on_result(result),
                RunEvent::Completed { outcome } => observer.on_complete(outcome),
            }
        }
        self.outcome.unwrap_or_else(|| RunOutcome::from_results(&self.log))
    }

    fn record(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Planned { tests } => self.planned = tests.clone(),
            RunEvent::Finished { result } => self.log.push(result.clone()),
            RunEvent::Completed { outcome } => {
                self.outcome = Some(*outcome);
                self.active.store(false, Ordering::SeqCst);
            }
        }
    }

    /// The worker went away without completing (it panicked); close the run with what was logged.
    fn abandon(&mut self) -> RunEvent {
        tracing::error!(results = self.log.len(), "evaluation worker stopped unexpectedly");
        self.step_tx = None;
        let outcome = RunOutcome::from_results(&self.log);
        let event = RunEvent::Completed { outcome };
        self.record(&event);
        event
    }
}

impl Iterator for Run {
    type Item = RunEvent;

    fn next(&mut self) -> Option<RunEvent> {
        if self.outcome.is_some() {
            return None;
        }
        let sent = self.step_tx.as_ref().is_some_and(|tx| tx.send(()).is_ok());
        if !sent {
            return Some(self.abandon());
        }
        match self.event_rx.recv() {
            Ok(event) => {
                self.record(&event);
                Some(event)
            }
            Err(_) => Some(self.abandon()),
        }
    }
}

impl Drop for Run {
    fn drop(&mut self) {
        if self.outcome.is_none() {
            self.cancel.cancel();
        }
        // Closing the step channel lets the worker exit after its current step.
        self.step_tx = None;
        self.active.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::observer::CollectingObserver;
    use crate::engine::result::TestStatus;

    fn start(program: &str, tests: &str) -> Run {
        Run::start(RunRequest::new(program, tests), &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_view_shows_unrun_tests_as_pending() {
        let mut run = start("return {};", "function a() {} function b() {} function c() {}");
        assert!(matches!(run.next(), Some(RunEvent::Planned { .. })));
        run.next();
        let statuses: Vec<_> = run.view().iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![TestStatus::Passed, TestStatus::Pending, TestStatus::Pending]);
    }

    #[test]
    fn test_drive_reports_every_event() {
        let mut run = start("return { x: 1 };", "function a() { assertEqual(x, 1); } function b() { assert(false); }");
        let mut observer = CollectingObserver::default();
        let outcome = run.drive(&mut observer);
        assert_eq!(observer.planned, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(observer.results.len(), 2);
        assert_eq!(observer.outcome, Some(outcome));
        assert_eq!((outcome.passed, outcome.failed), (1, 1));
        assert!(run.is_completed());
        assert_eq!(run.next(), None);
    }

    #[test]
    fn test_run_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Run>();
    }

    #[test]
    fn test_cancel_keeps_the_partial_log() {
        let mut run = start("return {};", "function a() {} function b() {} function c() {}");
        run.next();
        run.next();
        run.cancel_handle().cancel();
        let Some(RunEvent::Completed { outcome }) = run.next() else { panic!("expected completion") };
        assert!(outcome.cancelled);
        assert_eq!(run.results().len(), 1);
    }
}
