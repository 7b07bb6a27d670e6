//! Teal playground helpers as a WASM module for the browser page.
//!
//! The page keeps its own editor, worker and timers; this module supplies
//! the pieces that should behave identically everywhere: the worker
//! message format, snippet encoding, load precedence, the snippet catalog
//! and the Teal highlighting rules.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { initial_source, share_search, compile_request, summarize_reply } from 'tl-playground-wasm';
//!
//! await init();
//!
//! editor.setValue(initial_source(location.search, localStorage.getItem('tl-playground')));
//! worker.postMessage(JSON.parse(compile_request(editor.getValue())));
//! worker.onmessage = (msg) => render(JSON.parse(summarize_reply(JSON.stringify(msg.data))));
//! ```

use serde::Serialize;
use tl_playground_editor::{language as lang, snippets as catalog};
use tl_playground_storage::{
    self as storage, Location, MemoryStorage, StorageAdapter, QUERY_PARAM, STORAGE_KEY,
};
use tl_playground_types::{DiagnosticKind, Reply, Request};
use wasm_bindgen::prelude::*;

/// Encode a snippet for storage or the URL.
#[wasm_bindgen]
pub fn encode(source: &str) -> String {
    storage::encode(source)
}

/// Decode a stored or URL snippet; malformed input gives `""`.
#[wasm_bindgen]
pub fn decode(encoded: &str) -> String {
    storage::decode(encoded)
}

/// Pick the snippet to open the editor with.
///
/// `search` is `location.search`; `stored` is the raw value from local
/// storage, if any. The URL's `c` parameter wins over storage, and the
/// `basic` snippet is used when neither yields any text.
#[wasm_bindgen]
pub fn initial_source(search: &str, stored: Option<String>) -> String {
    let store = storage::Encoded::new(MemoryStorage::new(STORAGE_KEY), storage::Base64);
    if let Some(stored) = stored {
        // In-memory saves cannot fail.
        let _ = store.save(&stored);
    }
    let url_value = Location::from_search(search).get(QUERY_PARAM);
    let source = storage::initial_source(&store, url_value.as_deref());
    if source.is_empty() {
        catalog::default_snippet().code.to_string()
    } else {
        source
    }
}

/// The search string to `history.replaceState` to after saving `source`.
#[wasm_bindgen]
pub fn share_search(search: &str, source: &str) -> String {
    Location::from_search(search).with_param(QUERY_PARAM, &storage::encode(source))
}

/// The `["compile", source]` message for the worker, as JSON.
#[wasm_bindgen]
pub fn compile_request(source: &str) -> String {
    Request::compile(source).to_json()
}

#[derive(Debug, Serialize)]
struct DiagnosticView<'a> {
    kind: DiagnosticKind,
    line: u32,
    column: u32,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct ReplySummary<'a> {
    ok: bool,
    error: Option<&'a str>,
    output: Option<&'a str>,
    diagnostics: Vec<DiagnosticView<'a>>,
}

/// Flatten a worker reply into what the page renders.
///
/// Returns a JSON string:
/// ```json
/// {
///   "ok": true,
///   "error": null,
///   "output": "local x = 1",
///   "diagnostics": [{ "kind": "syntax", "line": 1, "column": 7, "message": "..." }]
/// }
/// ```
///
/// `ok` is `false` for an `"error"` reply and for a message that is not a
/// reply at all.
#[wasm_bindgen]
pub fn summarize_reply(json: &str) -> String {
    let reply = Reply::from_json(json).unwrap_or_else(|e| Reply::Error(e.to_string()));
    summary_json(&reply)
}

fn summary_json(reply: &Reply) -> String {
    let summary = match reply {
        Reply::Compiled(result) => ReplySummary {
            ok: true,
            error: None,
            output: result.output.as_deref(),
            diagnostics: result
                .diagnostics()
                .map(|(kind, d)| DiagnosticView {
                    kind,
                    line: d.line,
                    column: d.column,
                    message: &d.message,
                })
                .collect(),
        },
        Reply::Error(message) => ReplySummary {
            ok: false,
            error: Some(message.as_str()),
            output: None,
            diagnostics: Vec::new(),
        },
    };
    serde_json::to_string(&summary).unwrap_or_else(|e| {
        format!(
            r#"{{"ok":false,"error":"Serialization error: {}","output":null,"diagnostics":[]}}"#,
            e
        )
    })
}

/// The snippet catalog as a JSON array of `{ label, code }`.
#[wasm_bindgen]
pub fn snippets() -> String {
    serde_json::to_string(catalog::all()).unwrap_or_else(|_| "[]".to_string())
}

/// Monarch tokenizer definition for Teal, as JSON.
#[wasm_bindgen]
pub fn language() -> String {
    serde_json::to_string(&lang::language()).unwrap_or_else(|_| "{}".to_string())
}

/// Editor language configuration (comments, brackets, pairs), as JSON.
#[wasm_bindgen]
pub fn language_configuration() -> String {
    serde_json::to_string(&lang::configuration()).unwrap_or_else(|_| "{}".to_string())
}

/// Language id to register the definitions under.
#[wasm_bindgen]
pub fn language_id() -> String {
    lang::LANGUAGE_ID.to_string()
}

/// Return the playground version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_initial_source_precedence() {
        let stored = encode("from storage");
        let search = share_search("", "from url");
        assert_eq!(initial_source(&search, Some(stored.clone())), "from url");
        assert_eq!(initial_source("", Some(stored)), "from storage");
        assert_eq!(initial_source("?x=1", None), catalog::BASIC.code);
        assert_eq!(initial_source("?c=%25", None), catalog::BASIC.code);
    }

    #[test]
    fn test_share_search_keeps_other_params() {
        let search = share_search("?theme=dark", "local x = 1");
        assert_eq!(search, "?theme=dark&c=bG9jYWwgeCA9IDE%3D");
        assert_eq!(initial_source(&search, None), "local x = 1");
    }

    #[test]
    fn test_compile_request() {
        assert_eq!(compile_request("print(1)"), r#"["compile","print(1)"]"#);
    }

    #[test]
    fn test_summarize_compiled() {
        let json = r#"["compiled","x = 1",[{"line":1,"column":3,"message":"bad"}],[{"line":2,"column":1,"message":"worse"}]]"#;
        let summary: Value = serde_json::from_str(&summarize_reply(json)).unwrap();
        assert_eq!(
            summary,
            json!({
                "ok": true,
                "error": null,
                "output": "x = 1",
                "diagnostics": [
                    { "kind": "syntax", "line": 1, "column": 3, "message": "bad" },
                    { "kind": "type", "line": 2, "column": 1, "message": "worse" },
                ],
            })
        );
    }

    #[test]
    fn test_summarize_error_and_garbage() {
        let summary: Value =
            serde_json::from_str(&summarize_reply(r#"["error","module 'tl' not found"]"#)).unwrap();
        assert_eq!(summary["ok"], false);
        assert_eq!(summary["error"], "module 'tl' not found");

        let summary: Value = serde_json::from_str(&summarize_reply("{")).unwrap();
        assert_eq!(summary["ok"], false);
        assert!(summary["error"].as_str().unwrap().starts_with("malformed message"));
    }

    #[test]
    fn test_static_data_is_json() {
        let snippets: Value = serde_json::from_str(&snippets()).unwrap();
        assert_eq!(snippets.as_array().unwrap().len(), 5);
        assert_eq!(snippets[0]["label"], "basic");

        let language: Value = serde_json::from_str(&language()).unwrap();
        assert_eq!(language["tokenPostfix"], ".tl");

        let config: Value = serde_json::from_str(&language_configuration()).unwrap();
        assert_eq!(config["comments"]["lineComment"], "--");
        assert_eq!(language_id(), "teal");
    }

    #[test]
    fn test_round_trip_exports() {
        assert_eq!(decode(&encode("local t: {string} = {}")), "local t: {string} = {}");
        assert_eq!(decode("@@"), "");
        assert!(!version().is_empty());
    }
}
