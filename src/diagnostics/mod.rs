//! Diagnostic reporting for the Eligian compiler
//!
//! Every failure the front-end detects is reported as a value: a structured
//! diagnostic with a stable machine-readable code, a message, a source span
//! and a corrective hint. Diagnostics serialize to JSON for the IDE layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub mod error_codes;
pub use error_codes::*;

/// Source location of an AST node, as reported by the parser.
///
/// Every field defaults, so nodes built without location information carry an
/// empty span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    /// Source file path
    pub file: PathBuf,
    /// Start byte offset (0-indexed)
    pub start: usize,
    /// End byte offset (0-indexed, exclusive)
    pub end: usize,
    /// Start line (1-indexed, 0 when unknown)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_col: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_col: usize,
}

impl Span {
    pub fn new(
        file: PathBuf,
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            file,
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Span pointing at the start of a file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: path.into(),
            start_line: 1,
            start_col: 1,
            end_line: 1,
            end_col: 1,
            ..Self::default()
        }
    }

    /// Re-anchor a span that was produced without file information
    pub fn in_file(mut self, path: impl Into<PathBuf>) -> Self {
        if self.file.as_os_str().is_empty() {
            self.file = path.into();
        }
        self
    }

    /// Whether the parser supplied a line for this node
    pub fn has_location(&self) -> bool {
        self.start_line > 0
    }
}

/// `file:line:col`, or just the file when no line is known
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = if self.file.as_os_str().is_empty() {
            "<document>".to_string()
        } else {
            self.file.display().to_string()
        };
        if self.has_location() {
            write!(f, "{}:{}:{}", file, self.start_line, self.start_col)
        } else {
            f.write_str(&file)
        }
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// An additional note attached to a diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub message: String,
    /// Related location, e.g. the first definition of a duplicate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Note {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// A quick fix offered by the IDE layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    /// Text replacing the offending name, when the fix is a rename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            replacement: None,
        }
    }

    /// Rename fix, e.g. for a misspelled operation
    pub fn replace_with(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: format!("Replace with `{}`", name),
            replacement: Some(name),
        }
    }
}

/// A compiler diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable error code (e.g., "UNKNOWN_OPERATION")
    pub code: String,
    pub severity: Severity,
    pub message: String,
    /// Corrective hint shown alongside the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    /// Start building an error diagnostic
    pub fn error(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Error)
    }

    /// Start building a warning diagnostic
    pub fn warning(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Warning)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Terminal rendering.
    ///
    /// Input documents are parsed ASTs, so there is no source text to quote;
    /// the location is printed instead.
    pub fn render(&self) -> String {
        let mut output = format!(
            "{}[{}]: {}\n  --> {}\n",
            self.severity.as_str(),
            self.code,
            self.message,
            self.span
        );

        if let Some(hint) = &self.hint {
            output.push_str(&format!("   = hint: {}\n", hint));
        }
        for note in &self.notes {
            match &note.span {
                Some(span) => output.push_str(&format!("   = note: {} ({})\n", note.message, span)),
                None => output.push_str(&format!("   = note: {}\n", note.message)),
            }
        }
        for suggestion in &self.suggestions {
            output.push_str(&format!("   = help: {}\n", suggestion.title));
        }

        output
    }
}

/// Builder for constructing diagnostics
pub struct DiagnosticBuilder {
    code: String,
    severity: Severity,
    message: String,
    hint: Option<String>,
    span: Option<Span>,
    notes: Vec<Note>,
    suggestions: Vec<Suggestion>,
}

impl DiagnosticBuilder {
    fn new(code: String, severity: Severity) -> Self {
        Self {
            code,
            severity,
            message: String::new(),
            hint: None,
            span: None,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            code: self.code,
            severity: self.severity,
            message: self.message,
            hint: self.hint,
            span: self.span.unwrap_or_default(),
            notes: self.notes,
            suggestions: self.suggestions,
        }
    }
}

/// Diagnostics collected over one document, in the order they were found
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics carrying a given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn take(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// JSON array of every diagnostic
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.diagnostics).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Diagnostic> for DiagnosticBag {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl FromIterator<Diagnostic> for DiagnosticBag {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
