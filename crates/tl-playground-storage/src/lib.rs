//! Snippet persistence for the Teal playground.
//!
//! Two small capabilities, composed:
//!
//! - [`StorageAdapter`]: `save`/`load` a string under a fixed key
//! - [`Encoder`]: reversible text transform ([`Base64`])
//!
//! [`Session`] layers debouncing and URL state on top.

mod adapters;
pub mod encoding;
mod error;
mod location;
mod session;
mod store;

pub use adapters::{LocalStorage, MemoryStorage, StorageAdapter};
pub use encoding::{decode, encode, Base64, Encoder};
pub use error::{StorageError, StorageResult};
pub use location::Location;
pub use session::{initial_source, Session, SessionConfig, QUERY_PARAM};
pub use store::{local_store, memory_store, Encoded, Storage, STORAGE_KEY};
