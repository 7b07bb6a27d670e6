//! Worker message protocol.
//!
//! Messages are positional arrays whose first element is a tag:
//!
//! ```text
//! request  ["compile", source]
//! reply    ["compiled", output | null, syntax_errors | null, type_errors | null]
//! reply    ["error", error]
//! ```

use crate::{CompileResult, Diagnostic, ProtocolError};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const COMPILE_TAG: &str = "compile";
pub const COMPILED_TAG: &str = "compiled";
pub const ERROR_TAG: &str = "error";

/// A message sent to the compilation worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Compile the given Teal source.
    Compile(String),
}

/// A message sent back by the compilation worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Compilation ran; diagnostics, if any, are part of the result.
    Compiled(CompileResult),
    /// Loading or running the compiler faulted. The payload is opaque.
    Error(String),
}

impl Request {
    pub fn compile(source: impl Into<String>) -> Self {
        Self::Compile(source.into())
    }

    pub fn to_json(&self) -> String {
        // A tuple of a tag and a string always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        decode_tagged(json, &[COMPILE_TAG])
    }
}

impl Reply {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"["{ERROR_TAG}","Serialization error: {e}"]"#)
        })
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        decode_tagged(json, &[COMPILED_TAG, ERROR_TAG])
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Parse `json`, reporting an unknown leading tag as such rather than as
/// a generic shape mismatch.
fn decode_tagged<T: de::DeserializeOwned>(json: &str, tags: &[&str]) -> crate::Result<T> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if let Some(tag) = value.get(0).and_then(serde_json::Value::as_str) {
        if !tags.contains(&tag) {
            return Err(ProtocolError::UnknownTag(tag.to_owned()));
        }
    }
    Ok(serde_json::from_value(value)?)
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Compile(source) => {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(COMPILE_TAG)?;
                tuple.serialize_element(source)?;
                tuple.end()
            }
        }
    }
}

impl Serialize for Reply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Compiled(result) => {
                let mut tuple = serializer.serialize_tuple(4)?;
                tuple.serialize_element(COMPILED_TAG)?;
                tuple.serialize_element(&result.output)?;
                tuple.serialize_element(&result.syntax_errors)?;
                tuple.serialize_element(&result.type_errors)?;
                tuple.end()
            }
            Self::Error(message) => {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(ERROR_TAG)?;
                tuple.serialize_element(message)?;
                tuple.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = Request;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(r#"a ["compile", source] array"#)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Request, A::Error> {
                let tag: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                match tag.as_str() {
                    COMPILE_TAG => {
                        let source: String = seq
                            .next_element()?
                            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                        Ok(Request::Compile(source))
                    }
                    other => Err(de::Error::unknown_variant(other, &[COMPILE_TAG])),
                }
            }
        }

        deserializer.deserialize_seq(RequestVisitor)
    }
}

impl<'de> Deserialize<'de> for Reply {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReplyVisitor;

        impl<'de> Visitor<'de> for ReplyVisitor {
            type Value = Reply;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(r#"a ["compiled", ...] or ["error", ...] array"#)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Reply, A::Error> {
                let tag: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                match tag.as_str() {
                    COMPILED_TAG => {
                        // Trailing positions may be omitted; they read as null.
                        let output = seq.next_element::<Option<String>>()?.flatten();
                        let syntax_errors =
                            seq.next_element::<Option<Vec<Diagnostic>>>()?.flatten();
                        let type_errors =
                            seq.next_element::<Option<Vec<Diagnostic>>>()?.flatten();
                        Ok(Reply::Compiled(CompileResult {
                            output,
                            syntax_errors,
                            type_errors,
                        }))
                    }
                    ERROR_TAG => {
                        let payload: Option<serde_json::Value> = seq.next_element()?;
                        let message = match payload {
                            Some(serde_json::Value::String(s)) => s,
                            Some(other) => other.to_string(),
                            None => String::new(),
                        };
                        Ok(Reply::Error(message))
                    }
                    other => Err(de::Error::unknown_variant(other, &[COMPILED_TAG, ERROR_TAG])),
                }
            }
        }

        deserializer.deserialize_seq(ReplyVisitor)
    }
}
