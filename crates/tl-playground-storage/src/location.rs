//! Query-string state of the playground URL.

use std::borrow::Cow;

/// The `?...` part of the page address.
///
/// Updates go through [`replace_state`](Self::replace_state), which swaps
/// the current entry instead of pushing a new one, so the history length
/// never grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    search: String,
    replacements: usize,
}

impl Location {
    /// Parse a search string, with or without the leading `?`.
    pub fn from_search(search: &str) -> Self {
        Self {
            search: normalize(search),
            replacements: 0,
        }
    }

    /// The search string including `?`, or `""` when there is no query.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// First value of `name`, decoded.
    pub fn get(&self, name: &str) -> Option<String> {
        pairs(&self.search)
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// The search string with `name` set to `value`.
    ///
    /// Replaces the first occurrence in place, drops the rest, and appends
    /// when absent.
    pub fn with_param(&self, name: &str, value: &str) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut seen = false;
        for (k, v) in pairs(&self.search) {
            if k == name {
                if !seen {
                    serializer.append_pair(name, value);
                    seen = true;
                }
            } else {
                serializer.append_pair(&k, &v);
            }
        }
        if !seen {
            serializer.append_pair(name, value);
        }
        format!("?{}", serializer.finish())
    }

    /// Replace the current query without adding a history entry.
    pub fn replace_state(&mut self, search: &str) {
        self.search = normalize(search);
        self.replacements += 1;
    }

    /// Set one parameter via [`replace_state`](Self::replace_state).
    pub fn set(&mut self, name: &str, value: &str) {
        let search = self.with_param(name, value);
        self.replace_state(&search);
    }

    /// Number of replace-state updates applied.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

fn normalize(search: &str) -> String {
    let query = search.strip_prefix('?').unwrap_or(search);
    if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    }
}

fn pairs(search: &str) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
    let query = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(query.as_bytes())
}
