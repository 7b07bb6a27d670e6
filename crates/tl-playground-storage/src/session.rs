//! The playground's snippet session.
//!
//! Ties a [`Storage`] and the page [`Location`] together: edits are saved
//! on a debounce timer to both places, and the initial snippet is read
//! from the URL first, then from storage, then from the snippet catalog.

use crate::location::Location;
use crate::store::Storage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tl_playground_editor::snippets;
use tl_playground_types::{Debouncer, DEFAULT_DELAY};

/// Query parameter holding the encoded snippet.
pub const QUERY_PARAM: &str = "c";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet period before a save is written.
    pub delay: Duration,
    pub query_param: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            query_param: QUERY_PARAM.to_string(),
        }
    }
}

/// Resolve the initial snippet.
///
/// A present, non-empty URL value wins even when it fails to decode; only
/// an absent or empty one falls through to the stored value. An empty
/// result means "use the default snippet".
pub fn initial_source<S: Storage + ?Sized>(storage: &S, url_value: Option<&str>) -> String {
    let raw = match url_value.filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => storage.load(),
    };
    storage.deserialize(Some(raw.as_str()))
}

pub struct Session<S> {
    storage: Arc<S>,
    location: Arc<Mutex<Location>>,
    config: SessionConfig,
    fallback: String,
    debouncer: Debouncer,
}

impl<S> Session<S>
where
    S: Storage + Send + Sync + 'static,
{
    pub fn new(storage: S, location: Location) -> Self {
        Self::with_config(storage, location, SessionConfig::default())
    }

    pub fn with_config(storage: S, location: Location, config: SessionConfig) -> Self {
        let debouncer = Debouncer::new(config.delay);
        Self {
            storage: Arc::new(storage),
            location: Arc::new(Mutex::new(location)),
            config,
            fallback: snippets::default_snippet().code.to_string(),
            debouncer,
        }
    }

    /// Use `source` instead of the catalog's default snippet.
    pub fn with_fallback(mut self, source: impl Into<String>) -> Self {
        self.fallback = source.into();
        self
    }

    /// Schedule a save of `value`, replacing any save still pending.
    pub fn save(&self, value: impl Into<String>) {
        let value = value.into();
        let storage = Arc::clone(&self.storage);
        let location = Arc::clone(&self.location);
        let param = self.config.query_param.clone();
        self.debouncer.call(move || {
            let encoded = storage.serialize(&value);
            if let Err(e) = storage.save(&encoded) {
                tracing::warn!(error = %e, "failed to persist snippet");
            }
            location.lock().set(&param, &encoded);
            tracing::debug!(len = value.len(), "snippet saved");
        });
    }

    /// The snippet to open with.
    pub fn load(&self) -> String {
        let url_value = self.location.lock().get(&self.config.query_param);
        let source = initial_source(self.storage.as_ref(), url_value.as_deref());
        if source.is_empty() {
            self.fallback.clone()
        } else {
            source
        }
    }

    /// Write a pending save now.
    pub fn flush(&self) -> bool {
        self.debouncer.flush()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Current URL query, e.g. for a share link.
    pub fn search(&self) -> String {
        self.location.lock().search().to_string()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
