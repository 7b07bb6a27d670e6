//! The compilation worker thread.
//!
//! One background thread owns the compiler and serves requests in
//! arrival order, each to completion. The host talks to it only by
//! message: [`Request`] in, [`Reply`] out.

use crate::compiler::{Compile, TlCompiler};
use crate::config::CompilerConfig;
use crate::error::{WorkerError, WorkerResult};
use crossbeam::channel::{select, unbounded, Receiver, RecvTimeoutError, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tl_playground_types::{Reply, Request};

/// Serve one request against `compiler`.
///
/// Never fails and never unwinds: interpreter errors and panics both come
/// back as [`Reply::Error`].
pub fn handle<C: Compile + ?Sized>(compiler: &mut C, request: Request) -> Reply {
    match request {
        Request::Compile(source) => {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| compiler.compile(&source)));
            match outcome {
                Ok(Ok(result)) => Reply::Compiled(result),
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "compile faulted");
                    Reply::Error(err.to_string())
                }
                Err(payload) => {
                    let err = WorkerError::Panicked(panic_message(payload.as_ref()));
                    tracing::error!(error = %err, "compile panicked");
                    Reply::Error(err.to_string())
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Handle to the background compilation thread.
///
/// Dropping the handle stops the thread after the request in progress,
/// if any, completes.
pub struct Worker {
    requests: Sender<Request>,
    replies: Receiver<Reply>,
    shutdown: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start a worker running the Lua-backed compiler.
    pub fn spawn_tl(config: CompilerConfig) -> WorkerResult<Self> {
        Self::spawn(move || TlCompiler::new(config))
    }

    /// Start a worker whose compiler is built by `factory` on the worker
    /// thread itself, so the compiler need not be `Send`.
    ///
    /// If `factory` fails, the worker stays up and answers every request
    /// with that failure.
    pub fn spawn<C, F>(factory: F) -> WorkerResult<Self>
    where
        C: Compile + 'static,
        F: FnOnce() -> WorkerResult<C> + Send + 'static,
    {
        let (request_tx, request_rx) = unbounded::<Request>();
        let (reply_tx, reply_rx) = unbounded::<Reply>();
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();

        let thread = thread::Builder::new()
            .name("tl-compiler".into())
            .spawn(move || {
                let mut compiler = factory();
                if let Err(err) = &compiler {
                    tracing::error!(error = %err, "compiler failed to initialise");
                }
                loop {
                    let request = select! {
                        recv(request_rx) -> request => request.ok(),
                        recv(shutdown_rx) -> _ => None,
                    };
                    let Some(request) = request else { break };
                    let reply = match &mut compiler {
                        Ok(compiler) => handle(compiler, request),
                        Err(err) => Reply::Error(err.to_string()),
                    };
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                tracing::debug!("compilation worker stopped");
            })?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Queue a request. Replies arrive in the same order.
    pub fn post(&self, request: Request) -> WorkerResult<()> {
        self.requests
            .send(request)
            .map_err(|_| WorkerError::Disconnected)
    }

    /// A sender that can post requests from another thread.
    pub fn sender(&self) -> Sender<Request> {
        self.requests.clone()
    }

    /// Block until the next reply.
    pub fn recv(&self) -> WorkerResult<Reply> {
        self.replies.recv().map_err(|_| WorkerError::Disconnected)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> WorkerResult<Reply> {
        self.replies.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => WorkerError::Timeout,
            RecvTimeoutError::Disconnected => WorkerError::Disconnected,
        })
    }

    /// The next reply, if one is already waiting.
    pub fn try_recv(&self) -> Option<Reply> {
        self.replies.try_recv().ok()
    }

    /// Post a compile request and wait for its reply.
    ///
    /// Only meaningful when no other requests are outstanding.
    pub fn compile(&self, source: impl Into<String>) -> WorkerResult<Reply> {
        self.post(Request::compile(source))?;
        self.recv()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("compilation worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_playground_types::{CompileResult, Diagnostic};

    fn echo(source: &str) -> WorkerResult<CompileResult> {
        Ok(CompileResult {
            output: Some(source.to_uppercase()),
            syntax_errors: Some(vec![]),
            type_errors: Some(vec![]),
        })
    }

    #[test]
    fn test_handle_success() {
        let mut compiler = echo;
        let reply = handle(&mut compiler, Request::compile("abc"));
        let Reply::Compiled(result) = reply else {
            panic!("expected compiled reply");
        };
        assert_eq!(result.output.as_deref(), Some("ABC"));
    }

    #[test]
    fn test_handle_fault() {
        let mut compiler = |_: &str| -> WorkerResult<CompileResult> {
            Err(WorkerError::Interpreter("module 'tl' not found".into()))
        };
        let reply = handle(&mut compiler, Request::compile("x"));
        assert_eq!(reply, Reply::Error("module 'tl' not found".into()));
    }

    #[test]
    fn test_handle_panic() {
        let mut compiler = |_: &str| -> WorkerResult<CompileResult> { panic!("stack overflow") };
        let reply = handle(&mut compiler, Request::compile("x"));
        assert_eq!(
            reply,
            Reply::Error("compiler panicked: stack overflow".into())
        );
    }

    #[test]
    fn test_worker_serves_in_order() {
        let worker = Worker::spawn(|| Ok(echo)).unwrap();
        worker.post(Request::compile("one")).unwrap();
        worker.post(Request::compile("two")).unwrap();
        let outputs: Vec<_> = (0..2)
            .map(|_| match worker.recv_timeout(Duration::from_secs(5)).unwrap() {
                Reply::Compiled(r) => r.output.unwrap(),
                Reply::Error(e) => panic!("unexpected error: {e}"),
            })
            .collect();
        assert_eq!(outputs, vec!["ONE", "TWO"]);
        assert!(worker.try_recv().is_none());
    }

    #[test]
    fn test_worker_survives_panic() {
        let worker = Worker::spawn(|| {
            Ok(|source: &str| -> WorkerResult<CompileResult> {
                if source == "crash" {
                    panic!("boom");
                }
                Ok(CompileResult {
                    output: None,
                    syntax_errors: Some(vec![Diagnostic::new(1, 1, source)]),
                    type_errors: None,
                })
            })
        })
        .unwrap();

        assert!(worker.compile("crash").unwrap().is_error());
        let Reply::Compiled(result) = worker.compile("fine").unwrap() else {
            panic!("worker should keep serving after a panic");
        };
        assert_eq!(result.syntax()[0].message, "fine");
    }

    #[test]
    fn test_failed_factory_replies_with_error() {
        let worker = Worker::spawn(|| -> WorkerResult<fn(&str) -> WorkerResult<CompileResult>> {
            Err(WorkerError::Interpreter("cannot open tl.lua".into()))
        })
        .unwrap();
        assert_eq!(
            worker.compile("x").unwrap(),
            Reply::Error("cannot open tl.lua".into())
        );
    }
}
