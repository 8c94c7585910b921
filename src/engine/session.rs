//! One game session: at most one run in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::config::EngineConfig;
use super::machine::RunRequest;
use super::run::{Run, RunError};

/// Starts runs with a shared configuration and rejects overlapping ones.
#[derive(Debug, Default)]
pub struct Session {
    config: EngineConfig,
    active: Option<Arc<AtomicBool>>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, active: None }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A run started here is still alive and has not completed.
    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Start a run, or fail with [`RunError::AlreadyRunning`] while the previous one is in flight.
    pub fn start(&mut self, request: RunRequest) -> Result<Run, RunError> {
        if self.is_running() {
            tracing::warn!("rejected overlapping run request");
            return Err(RunError::AlreadyRunning);
        }
        let active = Arc::new(AtomicBool::new(true));
        let run = Run::start_tracked(request, &self.config, active.clone())?;
        self.active = Some(active);
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RunRequest {
        RunRequest::new("return {};", "function a() {}")
    }

    #[test]
    fn test_overlapping_runs_are_rejected() {
        let mut session = Session::default();
        let mut run = session.start(request()).unwrap();
        assert!(matches!(session.start(request()), Err(RunError::AlreadyRunning)));
        for _ in run.by_ref() {}
        assert!(!session.is_running());
        assert!(session.start(request()).is_ok());
    }

    #[test]
    fn test_dropping_a_run_frees_the_session() {
        let mut session = Session::default();
        let run = session.start(request()).unwrap();
        drop(run);
        assert!(session.start(request()).is_ok());
    }
}
