//! Worker error types.

use thiserror::Error;

/// Faults at the compilation worker boundary.
///
/// Syntax and type errors are not faults; they travel as data inside a
/// [`tl_playground_types::CompileResult`].
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Loading or running the embedded compiler raised a Lua error.
    #[error("{0}")]
    Interpreter(String),

    /// The compiler returned something other than the expected tables.
    #[error("unexpected compiler result: {0}")]
    UnexpectedResult(String),

    /// The compiler panicked while handling a request.
    #[error("compiler panicked: {0}")]
    Panicked(String),

    /// The worker thread could not be started.
    #[error("failed to start worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker thread is gone.
    #[error("worker disconnected")]
    Disconnected,

    /// No reply arrived in time.
    #[error("timed out waiting for the worker")]
    Timeout,
}

impl From<mlua::Error> for WorkerError {
    fn from(err: mlua::Error) -> Self {
        Self::Interpreter(err.to_string())
    }
}

/// Worker result type alias.
pub type WorkerResult<T> = Result<T, WorkerError>;
