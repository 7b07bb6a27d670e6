use thiserror::Error;

/// Errors raised while decoding a worker message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The message was not valid JSON or did not have the expected shape.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The message carried a tag this side does not understand.
    #[error("unknown message tag: {0}")]
    UnknownTag(String),
}
