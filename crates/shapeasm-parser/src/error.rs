//! Parser error types

use shapeasm_ast::{ParameterKind, Span};
use shapeasm_lexer::{LexError, TokenKind};
use thiserror::Error;

use crate::DiagnosticCode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unrecognized keyword `{name}`")]
    UnknownKeyword { name: String, span: Span },

    #[error(
        "wrong number of arguments to `{keyword}`: expected {}, found {found}",
        arity_list(.expected)
    )]
    Arity {
        keyword: String,
        expected: Vec<usize>,
        found: usize,
        span: Span,
    },

    #[error("argument {position} of `{keyword}`: expected {expected}, found `{found}`")]
    KindMismatch {
        keyword: String,
        /// 1-based
        position: usize,
        expected: ParameterKind,
        found: String,
        span: Span,
    },

    #[error("expected {expected}, found `{found}`")]
    InvalidName {
        expected: ParameterKind,
        found: String,
        span: Span,
    },

    #[error("unbound variable `{name}`")]
    UnboundVariable { name: String, span: Span },

    #[error("duplicate definition of `{name}`")]
    DuplicateDefinition { name: String, span: Span },

    #[error("{message}")]
    Structural { message: String, span: Span },

    #[error("{message}")]
    Syntax { message: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::UnknownKeyword { span, .. } => *span,
            ParseError::Arity { span, .. } => *span,
            ParseError::KindMismatch { span, .. } => *span,
            ParseError::InvalidName { span, .. } => *span,
            ParseError::UnboundVariable { span, .. } => *span,
            ParseError::DuplicateDefinition { span, .. } => *span,
            ParseError::Structural { span, .. } => *span,
            ParseError::Syntax { span, .. } => *span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            ParseError::Lex(_) => DiagnosticCode::Lex,
            ParseError::UnknownKeyword { .. } => DiagnosticCode::SchemaLookup,
            ParseError::Arity { .. } => DiagnosticCode::Arity,
            ParseError::KindMismatch { .. } | ParseError::InvalidName { .. } => {
                DiagnosticCode::KindMismatch
            }
            ParseError::UnboundVariable { .. } => DiagnosticCode::UnboundVariable,
            ParseError::DuplicateDefinition { .. } => DiagnosticCode::DuplicateDefinition,
            ParseError::Structural { .. } => DiagnosticCode::Structural,
            ParseError::Syntax { .. } => DiagnosticCode::Syntax,
        }
    }

    pub fn structural(message: impl Into<String>, span: Span) -> Self {
        ParseError::Structural {
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        ParseError::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn unexpected(found: TokenKind, span: Span) -> Self {
        ParseError::syntax(format!("unexpected {}", found.describe()), span)
    }
}

/// "3", "0 or 4", "2, 3 or 4"
fn arity_list(arities: &[usize]) -> String {
    match arities {
        [] => "nothing".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init = init
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} or {}", init, last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message() {
        let err = ParseError::Arity {
            keyword: "Def".into(),
            expected: vec![0, 4],
            found: 3,
            span: Span::new(4, 17),
        };
        assert_eq!(
            err.to_string(),
            "wrong number of arguments to `Def`: expected 0 or 4, found 3"
        );
        assert_eq!(err.code(), DiagnosticCode::Arity);
    }

    #[test]
    fn test_kind_message_names_position() {
        let err = ParseError::KindMismatch {
            keyword: "Reflect".into(),
            position: 2,
            expected: ParameterKind::Axis,
            found: "Q".into(),
            span: Span::new(11, 12),
        };
        assert_eq!(
            err.to_string(),
            "argument 2 of `Reflect`: expected axis (X, Y or Z), found `Q`"
        );
    }

    #[test]
    fn test_lex_error_keeps_span() {
        let err = ParseError::from(LexError::UnterminatedString { span: Span::new(3, 9) });
        assert_eq!(err.span(), Span::new(3, 9));
        assert_eq!(err.code(), DiagnosticCode::Lex);
    }
}
