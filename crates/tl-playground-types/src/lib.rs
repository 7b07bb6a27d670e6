//! Shared types for the Teal playground.
//!
//! This crate defines the data that crosses the compilation worker
//! boundary (positioned diagnostics, the per-submission compile result,
//! the request/reply messages) and the debounce timer shared by the
//! compile scheduler and the snippet session.

pub mod debounce;
mod diagnostic;
mod error;
mod protocol;

pub use debounce::{Debouncer, DEFAULT_DELAY};
pub use diagnostic::{CompileResult, Diagnostic, DiagnosticKind};
pub use error::ProtocolError;
pub use protocol::{Reply, Request, COMPILED_TAG, COMPILE_TAG, ERROR_TAG};

/// Result type used when decoding protocol messages.
pub type Result<T> = std::result::Result<T, ProtocolError>;
