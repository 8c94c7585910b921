//! Diagnostics for the syntax frontend.
//!
//! [`CompileError`] is the single error currency of the lexer and parser. [`render`] turns one into a
//! `miette` report with the offending source line highlighted, which the CLI prints for `discover` and for
//! program syntax errors.

use crate::ast::Span;
use miette::{Diagnostic, NamedSource, SourceSpan};

/// A syntax-level error with location information
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Syntax,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// A construct the lexer/parser recognises but the engine does not evaluate (e.g. `class`).
    pub fn unsupported(what: &str, span: Span) -> Self {
        Self {
            message: format!("{what} is not supported"),
            span,
            kind: ErrorKind::Unsupported,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// One-line rendering with a 1-based position: `message (line L, column C)`.
    pub fn located(&self, source: &str) -> String {
        let (line, col) = self.span.line_col(source);
        format!("{} (line {line}, column {col})", self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
    Unsupported,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Unsupported => write!(f, "unsupported syntax"),
        }
    }
}

/// `miette` adapter carrying the source so the report can show context.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{kind}: {message}")]
struct SourceDiagnostic {
    kind: ErrorKind,
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    at: SourceSpan,
    #[help]
    help: Option<String>,
}

/// Build a `miette` report for `error` against `source` (shown under `file_name`).
pub fn render(file_name: &str, source: &str, error: &CompileError) -> miette::Report {
    let start = error.span.start.min(source.len());
    let len = error.span.end.saturating_sub(error.span.start).min(source.len() - start);
    let mut help: Vec<String> = error.hints.clone();
    help.extend(error.notes.iter().map(|n| format!("note: {n}")));
    miette::Report::new(SourceDiagnostic {
        kind: error.kind,
        message: error.message.clone(),
        src: NamedSource::new(file_name, source.to_string()),
        at: SourceSpan::new(start.into(), len),
        help: if help.is_empty() { None } else { Some(help.join("\n")) },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_located_reports_line_and_column() {
        let source = "let a = 1;\nlet b = ;\n";
        let err = CompileError::syntax("Unexpected token ';'".to_string(), Span::new(19, 20));
        assert_eq!(err.located(source), "Unexpected token ';' (line 2, column 9)");
    }

    #[test]
    fn test_render_includes_message() {
        let err = CompileError::unsupported("'class'", Span::new(0, 5)).with_hint("use a factory function");
        let report = render("tests.js", "class A {}", &err);
        assert!(format!("{report}").contains("'class' is not supported"));
    }
}
