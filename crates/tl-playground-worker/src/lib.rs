//! Teal playground compilation worker.
//!
//! ```text
//! source → CompileScheduler (debounce) → Worker thread → TlCompiler (Lua + tl) → Reply
//! ```
//!
//! The `tl` compiler itself is an external Lua module, found on the
//! configured `package.path`; this crate only drives it and relays its
//! output and diagnostics as plain data.

mod compiler;
pub mod config;
mod error;
mod scheduler;
mod worker;

pub use compiler::{Compile, TlCompiler};
pub use config::{CompilerConfig, InitEnv};
pub use error::{WorkerError, WorkerResult};
pub use scheduler::CompileScheduler;
pub use worker::{handle, Worker};
