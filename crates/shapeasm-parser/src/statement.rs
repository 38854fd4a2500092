//! Statement parsing: `[result =] Keyword(arg, ...)`

use shapeasm_ast::{ParameterKind, Span, Spanned, Statement};
use shapeasm_lexer::{Token, TokenKind};
use tracing::trace;

use crate::schema::{lookup, ResultBinding, DEF};
use crate::validate::{is_reserved, validate, RawArgument};
use crate::{BindingOrigin, Diagnostic, ParseError, SymbolTable};

/// What parsing one statement line produced
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    Parsed(Statement),
    /// The keyword was recognized but the rest of the line was not valid;
    /// the statement keeps its keyword and result with no arguments
    Partial {
        statement: Statement,
        diagnostic: Diagnostic,
    },
    Failed(Diagnostic),
}

impl StatementOutcome {
    pub fn statement(&self) -> Option<&Statement> {
        match self {
            StatementOutcome::Parsed(statement) => Some(statement),
            StatementOutcome::Partial { statement, .. } => Some(statement),
            StatementOutcome::Failed(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            StatementOutcome::Parsed(_) => None,
            StatementOutcome::Partial { diagnostic, .. } => Some(diagnostic),
            StatementOutcome::Failed(diagnostic) => Some(diagnostic),
        }
    }

    pub fn into_parts(self) -> (Option<Statement>, Option<Diagnostic>) {
        match self {
            StatementOutcome::Parsed(statement) => (Some(statement), None),
            StatementOutcome::Partial {
                statement,
                diagnostic,
            } => (Some(statement), Some(diagnostic)),
            StatementOutcome::Failed(diagnostic) => (None, Some(diagnostic)),
        }
    }
}

/// Parse one non-empty statement line
///
/// `symbols` is the enclosing function's table. A successfully parsed
/// statement binds its result variable only after all arguments validate.
pub fn parse_statement(
    source: &str,
    tokens: &[Token],
    symbols: &mut SymbolTable,
) -> StatementOutcome {
    let Some(first) = tokens.first() else {
        let error = ParseError::syntax("empty statement", Span::dummy());
        return StatementOutcome::Failed(error.into());
    };
    let line_span = first.span.merge(tokens[tokens.len() - 1].span);

    let (result, rest) = match tokens {
        [name, eq, rest @ ..] if eq.kind == TokenKind::Eq => {
            if name.kind != TokenKind::Ident {
                return StatementOutcome::Failed(
                    ParseError::syntax("expected a variable name before '='", name.span).into(),
                );
            }
            if rest.is_empty() {
                return StatementOutcome::Failed(
                    ParseError::syntax("expected a keyword after '='", eq.span).into(),
                );
            }
            (Some(Spanned::from_source(source, name.span)), rest)
        }
        _ => (None, tokens),
    };

    let keyword_token = rest[0];
    if keyword_token.kind != TokenKind::Ident {
        return StatementOutcome::Failed(
            ParseError::syntax(
                format!("expected a keyword, found {}", keyword_token.kind.describe()),
                keyword_token.span,
            )
            .into(),
        );
    }
    let keyword = Spanned::from_source(source, keyword_token.span);

    let Some(schema) = lookup(&keyword.node) else {
        return StatementOutcome::Failed(
            ParseError::UnknownKeyword {
                name: keyword.node,
                span: keyword.span,
            }
            .into(),
        );
    };
    let Some(binding) = schema.result_binding() else {
        return StatementOutcome::Failed(
            ParseError::structural(
                format!("`{}` may only start a function header", DEF),
                keyword.span,
            )
            .into(),
        );
    };

    let after = &rest[1..];

    let partial = |diagnostic: Diagnostic| StatementOutcome::Partial {
        statement: Statement {
            keyword: keyword.clone(),
            result: result.clone(),
            arguments: Vec::new(),
            span: line_span,
        },
        diagnostic,
    };

    let checked = parse_call(source, keyword_token.span, after).and_then(|(args, list_span)| {
        if binding == ResultBinding::Required && result.is_none() {
            return Err(ParseError::syntax(
                format!("the result of `{}` must be assigned to a variable", schema.name),
                keyword.span,
            ));
        }
        let arguments = validate(schema, &args, list_span, symbols)?;
        if let Some(result) = &result {
            check_result_name(result, symbols)?;
        }
        Ok(arguments)
    });

    let arguments = match checked {
        Ok(arguments) => arguments,
        Err(error) => {
            trace!(keyword = %keyword.node, %error, "statement rejected");
            return partial(error.into());
        }
    };

    if let Some(result) = &result {
        // Freshness was checked above, so this cannot collide.
        if let Err(error) = symbols.define(
            result.clone(),
            BindingOrigin::Result {
                keyword: schema.name.to_string(),
            },
        ) {
            return partial(error.into());
        }
    }

    trace!(keyword = %keyword.node, args = arguments.len(), "statement parsed");
    StatementOutcome::Parsed(Statement {
        keyword,
        result,
        arguments,
        span: line_span,
    })
}

/// Parse `( args ) ` following a keyword or header name
///
/// Returns the raw arguments and the span of the parenthesized list.
pub(crate) fn parse_call(
    source: &str,
    head: Span,
    tokens: &[Token],
) -> Result<(Vec<RawArgument>, Span), ParseError> {
    let (open, inner_and_rest) = match tokens.split_first() {
        Some((open, rest)) if open.kind == TokenKind::LParen => (open, rest),
        Some((other, _)) => {
            return Err(ParseError::syntax(
                format!("expected '(', found {}", other.kind.describe()),
                other.span,
            ))
        }
        None => return Err(ParseError::syntax("expected '(' after this", head)),
    };

    let close = matching_paren(inner_and_rest).ok_or_else(|| {
        let end = inner_and_rest.last().map_or(open.span, |t| t.span);
        ParseError::syntax("unclosed '('", open.span.merge(end))
    })?;

    let inner = &inner_and_rest[..close];
    let list_span = open.span.merge(inner_and_rest[close].span);

    if let Some(bad) = inner.iter().find(|t| t.kind == TokenKind::Error) {
        return Err(ParseError::unexpected(bad.kind, bad.span));
    }

    let trailing = &inner_and_rest[close + 1..];
    if let (Some(first), Some(last)) = (trailing.first(), trailing.last()) {
        return Err(ParseError::syntax(
            format!("unexpected {} after ')'", first.kind.describe()),
            first.span.merge(last.span),
        ));
    }

    Ok((split_arguments(source, inner)?, list_span))
}

/// Index of the ')' closing an already-consumed '('
fn matching_paren(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen if depth == 0 => return Some(i),
            TokenKind::RParen => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split the tokens between a call's parentheses at top-level commas
pub fn split_arguments(source: &str, tokens: &[Token]) -> Result<Vec<RawArgument>, ParseError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                if start == i {
                    return Err(ParseError::syntax("empty argument", token.span));
                }
                args.push(RawArgument::from_tokens(source, &tokens[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }

    match tokens.get(start..) {
        Some(last) if !last.is_empty() => args.push(RawArgument::from_tokens(source, last)),
        _ => {
            let comma = tokens[tokens.len() - 1].span;
            return Err(ParseError::syntax("empty argument", comma));
        }
    }

    Ok(args)
}

fn check_result_name(result: &Spanned<String>, symbols: &SymbolTable) -> Result<(), ParseError> {
    if is_reserved(&result.node) {
        return Err(ParseError::InvalidName {
            expected: ParameterKind::NewVariable,
            found: result.node.clone(),
            span: result.span,
        });
    }
    if symbols.contains(&result.node) {
        return Err(ParseError::DuplicateDefinition {
            name: result.node.clone(),
            span: result.span,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticCode;
    use shapeasm_ast::{Axis, Value};
    use shapeasm_lexer::tokenize;

    fn parse(source: &str, symbols: &mut SymbolTable) -> StatementOutcome {
        let tokens = tokenize(source).unwrap();
        parse_statement(source, &tokens, symbols)
    }

    fn with_bound(names: &[&str]) -> SymbolTable {
        let mut symbols = SymbolTable::new();
        for (i, name) in names.iter().enumerate() {
            symbols
                .define(
                    Spanned::new(name.to_string(), Span::new(1000 + i, 1001 + i)),
                    BindingOrigin::Parameter,
                )
                .unwrap();
        }
        symbols
    }

    #[test]
    fn test_reflect_with_result() {
        let mut symbols = with_bound(&["existingVar"]);
        let outcome = parse("result = Reflect(existingVar, X)", &mut symbols);
        let StatementOutcome::Parsed(statement) = outcome else {
            panic!("expected a parsed statement, got {outcome:?}");
        };
        assert_eq!(statement.keyword.node, "Reflect");
        assert_eq!(statement.result.as_ref().unwrap().node, "result");
        assert_eq!(statement.arguments.len(), 2);
        assert_eq!(statement.arguments[0].kind, ParameterKind::ExistingVariable);
        assert_eq!(statement.arguments[1].value, Value::Axis(Axis::X));
        assert!(symbols.contains("result"));
    }

    #[test]
    fn test_unbound_variable_keeps_keyword() {
        let mut symbols = SymbolTable::new();
        let outcome = parse("Reflect(undefinedVar, X)", &mut symbols);
        let StatementOutcome::Partial {
            statement,
            diagnostic,
        } = outcome
        else {
            panic!("expected a partial statement, got {outcome:?}");
        };
        assert_eq!(statement.keyword.node, "Reflect");
        assert!(statement.arguments.is_empty());
        assert_eq!(diagnostic.code, DiagnosticCode::UnboundVariable);
        assert_eq!(diagnostic.span, Span::new(8, 20));
    }

    #[test]
    fn test_unknown_keyword() {
        let outcome = parse("x = Rotate(a, 90)", &mut SymbolTable::new());
        let diagnostic = outcome.diagnostic().unwrap();
        assert!(outcome.statement().is_none());
        assert_eq!(diagnostic.code, DiagnosticCode::SchemaLookup);
        assert_eq!(diagnostic.span, Span::new(4, 10));
        assert_eq!(diagnostic.message, "unrecognized keyword `Rotate`");
    }

    #[test]
    fn test_result_not_bound_on_failure() {
        let mut symbols = SymbolTable::new();
        let outcome = parse("cube = Cuboid(1, 2)", &mut symbols);
        assert_eq!(outcome.diagnostic().unwrap().code, DiagnosticCode::Arity);
        assert!(!symbols.contains("cube"));
    }

    #[test]
    fn test_variable_cannot_reference_itself() {
        let mut symbols = with_bound(&["b"]);
        let outcome = parse("a = Union(a, b)", &mut symbols);
        assert_eq!(
            outcome.diagnostic().unwrap().code,
            DiagnosticCode::UnboundVariable
        );
    }

    #[test]
    fn test_cuboid_requires_result() {
        let outcome = parse("Cuboid(1, 1, 1)", &mut SymbolTable::new());
        assert_eq!(outcome.diagnostic().unwrap().code, DiagnosticCode::Syntax);
        assert!(outcome.statement().is_some());
    }

    #[test]
    fn test_rebinding_is_duplicate() {
        let mut symbols = with_bound(&["cube"]);
        let outcome = parse("cube = Cuboid(1, 1, 1)", &mut symbols);
        let diagnostic = outcome.diagnostic().unwrap();
        assert_eq!(diagnostic.code, DiagnosticCode::DuplicateDefinition);
        assert_eq!(diagnostic.span, Span::new(0, 4));
    }

    #[test]
    fn test_reserved_result_name() {
        let outcome = parse("True = Cuboid(1, 1, 1)", &mut SymbolTable::new());
        assert_eq!(
            outcome.diagnostic().unwrap().code,
            DiagnosticCode::KindMismatch
        );
    }

    #[test]
    fn test_def_is_not_a_statement() {
        let outcome = parse("Def(a, b, c, d)", &mut SymbolTable::new());
        assert_eq!(outcome.diagnostic().unwrap().code, DiagnosticCode::Structural);
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            ("Reflect a, X", "expected '(', found identifier"),
            ("Reflect(a, X", "unclosed '('"),
            ("Reflect(a,, X)", "empty argument"),
            ("Reflect(a, X,)", "empty argument"),
            ("Reflect(a, X) extra", "unexpected identifier after ')'"),
            ("Reflect(a, $)", "unexpected unrecognized character"),
            ("0.5 = Reflect(a, X)", "expected a variable name before '='"),
            ("(a)", "expected a keyword, found '('"),
        ];
        for (source, message) in cases {
            let outcome = parse(source, &mut with_bound(&["a"]));
            let diagnostic = outcome.diagnostic().unwrap();
            assert_eq!(diagnostic.code, DiagnosticCode::Syntax, "{source}");
            assert_eq!(diagnostic.message, message, "{source}");
        }
    }

    #[test]
    fn test_nested_parens_form_one_argument() {
        let tokens = tokenize("a, (b, c), d").unwrap();
        let args = split_arguments("a, (b, c), d", &tokens).unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args[1].text.node, "(b, c)");
        assert_eq!(args[1].token, None);
    }
}
