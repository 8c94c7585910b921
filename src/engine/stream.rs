//! Async adapter: a run as a `Stream` of events.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;

use super::result::RunEvent;
use super::run::Run;

/// Drive `run` on the blocking pool and stream its events.
///
/// `pacing` is slept after every finished result so a UI can animate progress; zero disables it. Dropping
/// the stream cancels the run before its next test. Must be called from within a tokio runtime.
pub fn run_stream(mut run: Run, pacing: Duration) -> impl Stream<Item = RunEvent> {
    let (tx, rx) = mpsc::channel(16);
    tokio::task::spawn_blocking(move || {
        let cancel = run.cancel_handle();
        for event in run.by_ref() {
            let finished = matches!(event, RunEvent::Finished { .. });
            if tx.blocking_send(event).is_err() {
                cancel.cancel();
                break;
            }
            if finished && !pacing.is_zero() {
                std::thread::sleep(pacing);
            }
        }
    });
    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use tokio_stream::StreamExt;

    use super::*;
    use crate::engine::config::EngineConfig;
    use crate::engine::machine::RunRequest;

    #[tokio::test]
    async fn test_stream_yields_events_in_order() {
        let run = Run::start(
            RunRequest::new("return { id: x => x };", "function a() { assertEqual(id(1), 1); } function b() {}"),
            &EngineConfig::default(),
        )
        .unwrap();
        let events: Vec<RunEvent> = run_stream(run, Duration::from_millis(1)).collect().await;
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RunEvent::Planned { .. }));
        assert!(matches!(&events[3], RunEvent::Completed { outcome } if outcome.passed == 2));
    }
}
