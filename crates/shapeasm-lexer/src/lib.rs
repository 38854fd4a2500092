//! ShapeAssembly Lexer - Tokenization using logos
//!
//! The language is line oriented: a statement never continues onto the
//! next line, so tokenization happens one line at a time and every token
//! carries a global byte span into the whole program text.

mod token;

pub use token::*;

use logos::Logos;
use shapeasm_ast::Span;
use thiserror::Error;

/// The only fatal lexing failure. It aborts the offending line only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span } => *span,
        }
    }
}

/// A token with its span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

/// Tokenize a single line that starts at global byte `offset`
pub fn tokenize_line(line: &str, offset: usize) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(line);

    while let Some(result) = lexer.next() {
        let span = Span::new(offset + lexer.span().start, offset + lexer.span().end);
        let kind = match result {
            Ok(TokenKind::UnterminatedString) => {
                return Err(LexError::UnterminatedString { span });
            }
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    Ok(tokens)
}

/// Tokenize a whole program, line by line
///
/// All or nothing: the first unterminated string fails the whole call and
/// no tokens are returned. Callers that must keep the other lines, such as
/// the program parser, call [`tokenize_line`] once per line instead.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for line in source.split('\n') {
        tokens.extend(tokenize_line(line, offset)?);
        offset += line.len() + 1;
    }

    Ok(tokens)
}
