//! Adapter + encoder composition.

use crate::adapters::{LocalStorage, MemoryStorage, StorageAdapter};
use crate::encoding::{Base64, Encoder};
use crate::error::StorageResult;
use std::path::PathBuf;

/// Key under which the playground keeps its snippet.
pub const STORAGE_KEY: &str = "tl-playground";

/// Something that can both store strings and encode them.
pub trait Storage: StorageAdapter + Encoder {}

impl<T: StorageAdapter + Encoder + ?Sized> Storage for T {}

/// A storage adapter paired with an encoder.
///
/// `save` and `load` pass straight through to the adapter; callers decide
/// when to `serialize`/`deserialize`, so the raw stored form stays visible
/// (it is the same text that goes into the URL).
#[derive(Debug, Clone, Default)]
pub struct Encoded<A, E = Base64> {
    adapter: A,
    encoder: E,
}

impl<A, E> Encoded<A, E> {
    pub fn new(adapter: A, encoder: E) -> Self {
        Self { adapter, encoder }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<A: StorageAdapter, E> StorageAdapter for Encoded<A, E> {
    fn save(&self, value: &str) -> StorageResult<()> {
        self.adapter.save(value)
    }

    fn load(&self) -> String {
        self.adapter.load()
    }
}

impl<A, E: Encoder> Encoder for Encoded<A, E> {
    fn serialize(&self, value: &str) -> String {
        self.encoder.serialize(value)
    }

    fn deserialize(&self, value: Option<&str>) -> String {
        self.encoder.deserialize(value)
    }
}

/// File-backed store under [`STORAGE_KEY`], base64-encoded.
pub fn local_store(path: impl Into<PathBuf>) -> Encoded<LocalStorage> {
    Encoded::new(LocalStorage::new(path, STORAGE_KEY), Base64)
}

/// In-memory store under [`STORAGE_KEY`], base64-encoded.
pub fn memory_store() -> Encoded<MemoryStorage> {
    Encoded::new(MemoryStorage::new(STORAGE_KEY), Base64)
}
