//! Whole-program parsing
//!
//! Splits the text into `def` blocks, validates each header against the
//! `Def` schema, and runs the statement parser over every body line with a
//! fresh symbol table per function. Always returns an AST; problems are
//! collected as diagnostics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shapeasm_ast::{FunctionDef, LineIndex, ParameterKind, Program, Span, Spanned};
use shapeasm_lexer::{tokenize_line, Token, TokenKind};
use tracing::debug;

use crate::schema::def_schema;
use crate::statement::{parse_call, parse_statement};
use crate::validate::{is_reserved, validate};
use crate::{BindingOrigin, Diagnostic, ParseError, Severity, SymbolTable};

/// The AST plus every diagnostic found while building it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Spans of every function name
    pub fn definition_names(&self) -> impl Iterator<Item = Span> + '_ {
        self.program
            .functions()
            .filter_map(|f| f.name.as_ref())
            .map(|name| name.span)
    }

    /// Spans of every `def` parameter
    pub fn definition_parameters(&self) -> impl Iterator<Item = Span> + '_ {
        self.program
            .functions()
            .flat_map(|f| f.parameters.iter())
            .map(|param| param.span)
    }

    /// Spans of assigned result variables and variable arguments
    pub fn variable_references(&self) -> impl Iterator<Item = Span> + '_ {
        self.program
            .functions()
            .flat_map(|f| f.statements.iter())
            .flat_map(|stmt| {
                stmt.result
                    .iter()
                    .map(|r| r.span)
                    .chain(stmt.variable_arguments().map(|a| a.raw.span))
            })
    }

    /// Spans of error diagnostics that cover at least one byte
    pub fn error_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.errors().map(|d| d.span).filter(|span| !span.is_empty())
    }
}

/// Parse a whole program. Never fails; see [`ParseResult::diagnostics`].
pub fn parse_program(source: &str) -> ParseResult {
    let result = ProgramParser::new(source).run();
    debug!(
        bytes = source.len(),
        functions = result.program.subfunctions.len() + 1,
        diagnostics = result.diagnostics.len(),
        "parsed program"
    );
    result
}

/// A function whose body is still being read
struct OpenFunction {
    def: FunctionDef,
    symbols: SymbolTable,
    is_entry: bool,
    /// False for blocks that are checked but left out of the AST
    keep: bool,
}

struct ProgramParser<'a> {
    source: &'a str,
    diagnostics: Vec<Diagnostic>,
    entry: Option<FunctionDef>,
    subfunctions: Vec<FunctionDef>,
    function_names: HashSet<String>,
    current: Option<OpenFunction>,
    seen_header: bool,
    first_content: Option<Span>,
}

impl<'a> ProgramParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            diagnostics: Vec::new(),
            entry: None,
            subfunctions: Vec::new(),
            function_names: HashSet::new(),
            current: None,
            seen_header: false,
            first_content: None,
        }
    }

    fn error(&mut self, error: ParseError) {
        self.diagnostics.push(error.into());
    }

    fn run(mut self) -> ParseResult {
        let index = LineIndex::new(self.source);

        for (_, line_span, text) in index.lines(self.source) {
            let tokens = match tokenize_line(text, line_span.start) {
                Ok(tokens) => tokens,
                Err(error) => {
                    if starts_with_def(text) {
                        self.close_function();
                        self.open_unreadable_function(line_span);
                    }
                    self.error(error.into());
                    continue;
                }
            };
            let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
                continue;
            };
            let content = first.span.merge(last.span);
            self.first_content.get_or_insert(content);

            if self.is_header(&tokens) {
                self.close_function();
                self.open_function(&tokens);
            } else if let Some(open) = self.current.as_mut() {
                let (statement, diagnostic) =
                    parse_statement(self.source, &tokens, &mut open.symbols).into_parts();
                if let Some(statement) = statement {
                    open.def.span = open.def.span.merge(statement.span);
                    open.def.statements.push(statement);
                }
                self.diagnostics.extend(diagnostic);
            } else {
                self.error(ParseError::structural(
                    "statement outside of a function definition",
                    content,
                ));
            }
        }
        self.close_function();

        let entry_function = match self.entry.take() {
            Some(entry) => entry,
            None => {
                let span = self.first_content.unwrap_or_default();
                self.error(ParseError::structural(
                    "missing entry function: a program must start with a `def` header",
                    span,
                ));
                FunctionDef::empty(Span::new(span.start, span.start))
            }
        };

        // The missing-entry error is reported last but may point at the
        // first line; put everything back in source order.
        self.diagnostics.sort_by_key(|d| d.span.start);

        ParseResult {
            program: Program {
                entry_function,
                subfunctions: self.subfunctions,
            },
            diagnostics: self.diagnostics,
        }
    }

    /// `def name(...)` or `def(...)`, in any case
    fn is_header(&self, tokens: &[Token]) -> bool {
        match tokens {
            [def, next, ..] => {
                def.kind == TokenKind::Ident
                    && def.text(self.source).eq_ignore_ascii_case("def")
                    && matches!(next.kind, TokenKind::LParen | TokenKind::Ident)
            }
            _ => false,
        }
    }

    fn open_function(&mut self, tokens: &[Token]) {
        let def_token = tokens[0];
        let is_entry = !self.seen_header;
        self.seen_header = true;

        let mut rest = &tokens[1..];
        let name = match rest.first() {
            Some(token) if token.kind == TokenKind::Ident => {
                rest = &rest[1..];
                Some(Spanned::from_source(self.source, token.span))
            }
            _ => None,
        };
        if let [init @ .., last] = rest {
            if last.kind == TokenKind::Colon {
                rest = init;
            }
        }

        let mut keep = true;
        match &name {
            Some(name) if is_reserved(&name.node) => {
                self.error(ParseError::InvalidName {
                    expected: ParameterKind::Identifier,
                    found: name.node.clone(),
                    span: name.span,
                });
                keep = is_entry;
            }
            Some(name) => {
                // The entry name is recorded too, so a subfunction cannot shadow it.
                if !self.function_names.insert(name.node.clone()) {
                    self.error(ParseError::DuplicateDefinition {
                        name: name.node.clone(),
                        span: name.span,
                    });
                    keep = false;
                }
            }
            None if !is_entry => {
                self.error(ParseError::structural(
                    "subfunction is missing a name",
                    def_token.span,
                ));
                keep = false;
            }
            None => {}
        }

        let head = name.as_ref().map_or(def_token.span, |n| n.span);
        let parameters = match parse_call(self.source, head, rest).and_then(|(args, list_span)| {
            validate(def_schema(), &args, list_span, &SymbolTable::new())
        }) {
            Ok(params) => params.into_iter().map(|arg| arg.raw).collect(),
            Err(error) => {
                self.error(error);
                Vec::new()
            }
        };

        let mut symbols = SymbolTable::new();
        for param in &parameters {
            if let Err(error) = symbols.define(param.clone(), BindingOrigin::Parameter) {
                self.error(error);
            }
        }

        let last = tokens[tokens.len() - 1].span;
        self.current = Some(OpenFunction {
            def: FunctionDef {
                name,
                parameters,
                statements: Vec::new(),
                span: def_token.span.merge(last),
            },
            symbols,
            is_entry,
            keep,
        });
    }

    /// A header that failed to lex still ends the previous block. Its body
    /// gets a scope of its own and is left out of the AST.
    fn open_unreadable_function(&mut self, line_span: Span) {
        let is_entry = !self.seen_header;
        self.seen_header = true;
        self.current = Some(OpenFunction {
            def: FunctionDef::empty(line_span),
            symbols: SymbolTable::new(),
            is_entry,
            keep: false,
        });
    }

    fn close_function(&mut self) {
        let Some(open) = self.current.take() else {
            return;
        };

        if open.is_entry {
            self.entry = Some(open.def);
        } else if open.keep {
            self.subfunctions.push(open.def);
        }
    }
}

/// Whether a line's first word is `def`, in any case
fn starts_with_def(text: &str) -> bool {
    let text = text.trim_start();
    let word_len = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    text[..word_len].eq_ignore_ascii_case("def")
}
