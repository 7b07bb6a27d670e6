//! Debounced dispatch of compile requests.

use crate::worker::Worker;
use crossbeam::channel::Sender;
use std::time::Duration;
use tl_playground_types::{Debouncer, Request, DEFAULT_DELAY};

/// Posts the latest source to a [`Worker`] once edits go quiet.
///
/// Each [`submit`](Self::submit) restarts the timer. A request that has
/// already been posted is left to finish; its reply is simply followed by
/// the reply to the newer one.
pub struct CompileScheduler {
    requests: Sender<Request>,
    debouncer: Debouncer,
}

impl CompileScheduler {
    pub fn new(worker: &Worker) -> Self {
        Self::with_delay(worker, DEFAULT_DELAY)
    }

    pub fn with_delay(worker: &Worker, delay: Duration) -> Self {
        Self {
            requests: worker.sender(),
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn submit(&self, source: impl Into<String>) {
        let requests = self.requests.clone();
        let source = source.into();
        self.debouncer.call(move || {
            tracing::debug!(len = source.len(), "dispatching compile request");
            if requests.send(Request::Compile(source)).is_err() {
                tracing::warn!("compile request dropped: worker is gone");
            }
        });
    }

    /// Dispatch the pending submission now.
    pub fn flush(&self) -> bool {
        self.debouncer.flush()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerResult;
    use tl_playground_types::{CompileResult, Reply};

    fn echo(source: &str) -> WorkerResult<CompileResult> {
        Ok(CompileResult {
            output: Some(source.to_string()),
            ..CompileResult::default()
        })
    }

    #[test]
    fn test_burst_yields_single_request() {
        let worker = Worker::spawn(|| Ok(echo)).unwrap();
        let scheduler = CompileScheduler::with_delay(&worker, Duration::from_millis(150));
        for source in ["l", "lo", "loc", "local"] {
            scheduler.submit(source);
        }
        let reply = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            reply,
            Reply::Compiled(CompileResult {
                output: Some("local".into()),
                ..CompileResult::default()
            })
        );
        assert!(worker.recv_timeout(Duration::from_millis(600)).is_err());
    }

    #[test]
    fn test_flush_dispatches_immediately() {
        let worker = Worker::spawn(|| Ok(echo)).unwrap();
        let scheduler = CompileScheduler::with_delay(&worker, Duration::from_secs(60));
        scheduler.submit("local x = 1");
        assert!(scheduler.is_pending());
        assert!(scheduler.flush());
        assert!(!worker.recv_timeout(Duration::from_secs(5)).unwrap().is_error());
    }
}
