//! Teal syntax-highlighting definition for a Monarch-style editor.
//!
//! Adapted from the Lua grammar in `monaco-languages` (MIT, Microsoft
//! Corporation) with Teal's extra keywords. Everything here is static
//! data; [`configuration`] and [`language`] serialize to the JSON shapes
//! the editor's `setLanguageConfiguration` and `setMonarchTokensProvider`
//! accept.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Language id registered with the editor.
pub const LANGUAGE_ID: &str = "teal";

pub const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while", "record",
    "enum", "functiontype", "const", "as", "is", "global",
];

pub const TYPE_KEYWORDS: &[&str] = &["any", "boolean", "number", "string"];

pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "^", "#", "==", "~=", "<=", ">=", "<", ">", "=", ";", ":", ",", ".",
    "..", "...",
];

// ── Editor behaviour ──

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRule {
    pub line_comment: &'static str,
    pub block_comment: [&'static str; 2],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pair {
    pub open: &'static str,
    pub close: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfiguration {
    pub comments: CommentRule,
    pub brackets: Vec<[&'static str; 2]>,
    pub auto_closing_pairs: Vec<Pair>,
    pub surrounding_pairs: Vec<Pair>,
}

const PAIRS: [Pair; 5] = [
    Pair { open: "{", close: "}" },
    Pair { open: "[", close: "]" },
    Pair { open: "(", close: ")" },
    Pair { open: "\"", close: "\"" },
    Pair { open: "'", close: "'" },
];

pub fn configuration() -> LanguageConfiguration {
    LanguageConfiguration {
        comments: CommentRule {
            line_comment: "--",
            block_comment: ["--[[", "]]"],
        },
        brackets: vec![["{", "}"], ["[", "]"], ["(", ")"]],
        auto_closing_pairs: PAIRS.to_vec(),
        surrounding_pairs: PAIRS.to_vec(),
    }
}

// ── Tokenizer ──

#[derive(Debug, Clone, Serialize)]
pub struct BracketToken {
    pub token: &'static str,
    pub open: &'static str,
    pub close: &'static str,
}

/// What a matched rule emits.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Action {
    Token(&'static str),
    Styled {
        token: &'static str,
    },
    Next {
        token: &'static str,
        next: &'static str,
    },
    Cases {
        cases: Cases,
    },
}

/// Guard → action table. Order is significant, so it serializes as an
/// object with keys in insertion order.
#[derive(Debug, Clone)]
pub struct Cases(pub Vec<(&'static str, Action)>);

impl Serialize for Cases {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (guard, action) in &self.0 {
            map.serialize_entry(guard, action)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Rule {
    Match(&'static str, Action),
    MatchNext(&'static str, Action, &'static str),
    Include { include: &'static str },
}

/// Tokenizer states, in the order the editor should see them.
#[derive(Debug, Clone)]
pub struct Tokenizer(pub Vec<(&'static str, Vec<Rule>)>);

impl Serialize for Tokenizer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (state, rules) in &self.0 {
            map.serialize_entry(state, rules)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonarchLanguage {
    pub default_token: &'static str,
    pub token_postfix: &'static str,
    pub keywords: &'static [&'static str],
    pub type_keywords: &'static [&'static str],
    pub brackets: Vec<BracketToken>,
    pub operators: &'static [&'static str],
    pub symbols: &'static str,
    pub escapes: &'static str,
    pub tokenizer: Tokenizer,
}

fn cases(entries: Vec<(&'static str, Action)>) -> Action {
    Action::Cases {
        cases: Cases(entries),
    }
}

pub fn language() -> MonarchLanguage {
    use Action::Token;
    use Rule::{Include, Match, MatchNext};

    let root = vec![
        Match(
            r"[a-zA-Z_]\w*",
            cases(vec![
                ("@typeKeywords", Action::Styled { token: "keyword.$0" }),
                ("@keywords", Action::Styled { token: "keyword.$0" }),
                ("@default", Token("identifier")),
            ]),
        ),
        Include { include: "@whitespace" },
        Match(r"[{}()\[\]]", Token("@brackets")),
        Match(
            "@symbols",
            cases(vec![("@operators", Token("delimiter")), ("@default", Token(""))]),
        ),
        Match(r"\d*\.\d+([eE][\-+]?\d+)?", Token("number.float")),
        Match(r"0[xX][0-9a-fA-F_]*[0-9a-fA-F]", Token("number.hex")),
        Match(r"\d+?", Token("number")),
        Match(r"[;,.]", Token("delimiter")),
        Match(r#""([^"\\]|\\.)*$"#, Token("string.invalid")),
        Match(r"'([^'\\]|\\.)*$", Token("string.invalid")),
        MatchNext("\"", Token("string"), "@string.\""),
        MatchNext("'", Token("string"), "@string.'"),
    ];

    let whitespace = vec![
        Match(r"[ \t\r\n]+", Token("")),
        MatchNext(r"--\[([=]*)\[", Token("comment"), "@comment.$1"),
        Match(r"--.*$", Token("comment")),
    ];

    let comment = vec![
        Match(r"[^\]]+", Token("comment")),
        Match(
            r"\]([=]*)\]",
            cases(vec![
                ("$1==$S2", Action::Next { token: "comment", next: "@pop" }),
                ("@default", Token("comment")),
            ]),
        ),
        Match(r".", Token("comment")),
    ];

    let string = vec![
        Match(r#"[^\\"']+"#, Token("string")),
        Match("@escapes", Token("string.escape")),
        Match(r"\\.", Token("string.escape.invalid")),
        Match(
            r#"["']"#,
            cases(vec![
                ("$#==$S2", Action::Next { token: "string", next: "@pop" }),
                ("@default", Token("string")),
            ]),
        ),
    ];

    MonarchLanguage {
        default_token: "",
        token_postfix: ".tl",
        keywords: KEYWORDS,
        type_keywords: TYPE_KEYWORDS,
        brackets: vec![
            BracketToken { token: "delimiter.bracket", open: "{", close: "}" },
            BracketToken { token: "delimiter.array", open: "[", close: "]" },
            BracketToken { token: "delimiter.parenthesis", open: "(", close: ")" },
        ],
        operators: OPERATORS,
        symbols: r"[=><!~?:&|+\-*\/\^%]+",
        escapes: r#"\\(?:[abfnrtv\\"']|x[0-9A-Fa-f]{1,4}|u[0-9A-Fa-f]{4}|U[0-9A-Fa-f]{8})"#,
        tokenizer: Tokenizer(vec![
            ("root", root),
            ("whitespace", whitespace),
            ("comment", comment),
            ("string", string),
        ]),
    }
}

/// How the tokenizer classifies a bare word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Keyword,
    TypeKeyword,
    Identifier,
}

/// Classify a word the way the `root` identifier rule does: type keywords
/// are checked before keywords.
pub fn classify(word: &str) -> WordClass {
    if TYPE_KEYWORDS.contains(&word) {
        WordClass::TypeKeyword
    } else if KEYWORDS.contains(&word) {
        WordClass::Keyword
    } else {
        WordClass::Identifier
    }
}
