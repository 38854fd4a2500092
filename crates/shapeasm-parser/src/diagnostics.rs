//! Structured diagnostics
//!
//! Every problem the parser finds becomes a [`Diagnostic`] attached to the
//! parse result. Nothing is thrown past `parse_program`.

use serde::{Deserialize, Serialize};
use shapeasm_ast::Span;

use crate::ParseError;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Which class of problem a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Unterminated literal; the whole line was skipped
    Lex,
    /// Unknown keyword
    SchemaLookup,
    /// Argument count not accepted by the keyword
    Arity,
    /// Argument text does not match the expected kind
    KindMismatch,
    UnboundVariable,
    DuplicateDefinition,
    /// Missing or malformed function structure
    Structural,
    /// Malformed statement shape
    Syntax,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::Lex => "E-LEX-001",
            DiagnosticCode::SchemaLookup => "E-SCHEMA-001",
            DiagnosticCode::Arity => "E-ARITY-001",
            DiagnosticCode::KindMismatch => "E-KIND-001",
            DiagnosticCode::UnboundVariable => "E-UNBOUND-001",
            DiagnosticCode::DuplicateDefinition => "E-DUP-001",
            DiagnosticCode::Structural => "E-STRUCT-001",
            DiagnosticCode::Syntax => "E-SYNTAX-001",
        }
    }
}

/// A diagnostic with its source range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// Primary source span
    pub span: Span,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format the diagnostic as a single line
    pub fn format_simple(&self) -> String {
        format!(
            "{}: {} (at {}..{})",
            self.code.as_str(),
            self.message,
            self.span.start,
            self.span.end
        )
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        Diagnostic::new(error.code(), error.to_string(), error.span())
    }
}
