//! Token definitions for ShapeAssembly

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+")] // Skip horizontal whitespace
#[logos(skip r"#[^\n]*")] // Skip line comments
pub enum TokenKind {
    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // === Punctuation ===
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,

    // === Literals ===
    #[regex(r"-?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    /// A string literal that reaches the end of the line without closing
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    // === Identifiers ===
    // Keywords, `def`, axis/face/bool literals and variable names all lex
    // as identifiers; the parser tells them apart.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // === Special ===
    /// Non-ASCII characters match whole, so the span stays on char boundaries
    #[regex(r"[^\x00-\x7F]")]
    Error,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Eq => "'='",
            TokenKind::Colon => "':'",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::UnterminatedString => "unterminated string",
            TokenKind::Ident => "identifier",
            TokenKind::Error => "unrecognized character",
        }
    }
}
