use serde::{Deserialize, Serialize};
use std::fmt;

/// Which compiler pass produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Syntax,
    Type,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax error"),
            Self::Type => write!(f, "type error"),
        }
    }
}

/// A positioned compiler message.
///
/// Produced entirely by the Teal compiler; the playground only relays it.
/// Line and column are 1-based, as reported by `tl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub message: String,
    /// File the compiler attributed the message to, when it names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            filename: None,
        }
    }

    /// Attach the file name the compiler reported.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The outcome of one compile submission.
///
/// Each error list is `None` when the compiler returned no table for it,
/// which is distinct from an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    pub output: Option<String>,
    pub syntax_errors: Option<Vec<Diagnostic>>,
    pub type_errors: Option<Vec<Diagnostic>>,
}

impl CompileResult {
    /// Syntax errors, or an empty slice when none were reported.
    pub fn syntax(&self) -> &[Diagnostic] {
        self.syntax_errors.as_deref().unwrap_or_default()
    }

    /// Type errors, or an empty slice when none were reported.
    pub fn types(&self) -> &[Diagnostic] {
        self.type_errors.as_deref().unwrap_or_default()
    }

    /// Check if the compiler reported any diagnostic at all.
    pub fn has_errors(&self) -> bool {
        !self.syntax().is_empty() || !self.types().is_empty()
    }

    /// All diagnostics in report order, syntax errors first.
    pub fn diagnostics(&self) -> impl Iterator<Item = (DiagnosticKind, &Diagnostic)> {
        self.syntax()
            .iter()
            .map(|d| (DiagnosticKind::Syntax, d))
            .chain(self.types().iter().map(|d| (DiagnosticKind::Type, d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(3, 14, "unknown variable: foo");
        assert_eq!(d.to_string(), "3:14: unknown variable: foo");
    }

    #[test]
    fn test_diagnostic_json_field_names() {
        let json = serde_json::to_string(&Diagnostic::new(1, 2, "oops")).unwrap();
        assert_eq!(json, r#"{"line":1,"column":2,"message":"oops"}"#);

        let with_file = Diagnostic::new(1, 2, "oops").with_filename("input.tl");
        let json = serde_json::to_string(&with_file).unwrap();
        assert!(json.contains(r#""filename":"input.tl""#));
    }

    #[test]
    fn test_missing_tables_read_as_empty() {
        let result = CompileResult {
            output: Some("local x = 1".into()),
            syntax_errors: None,
            type_errors: None,
        };
        assert!(result.syntax().is_empty());
        assert!(result.types().is_empty());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_diagnostics_order() {
        let result = CompileResult {
            output: None,
            syntax_errors: Some(vec![Diagnostic::new(1, 1, "a")]),
            type_errors: Some(vec![Diagnostic::new(2, 1, "b"), Diagnostic::new(3, 1, "c")]),
        };
        let kinds: Vec<_> = result.diagnostics().map(|(k, d)| (k, d.line)).collect();
        assert_eq!(
            kinds,
            vec![
                (DiagnosticKind::Syntax, 1),
                (DiagnosticKind::Type, 2),
                (DiagnosticKind::Type, 3),
            ]
        );
        assert!(result.has_errors());
    }
}
