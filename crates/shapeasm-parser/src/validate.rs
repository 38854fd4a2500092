//! Argument validation against a keyword schema
//!
//! Checks the argument count first, then coerces each raw argument to the
//! kind its position expects. The first failure aborts the whole call.

use shapeasm_ast::{
    bool_literal, Argument, Axis, Face, ParameterKind, Span, Spanned, Value, RESERVED_LITERALS,
};
use shapeasm_lexer::{Token, TokenKind};

use crate::{KeywordSchema, ParseError, SymbolTable};

/// One comma-separated argument before validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawArgument {
    /// Source text from the first to the last token of the argument
    pub text: Spanned<String>,
    /// Lexical kind when the argument is exactly one token
    pub token: Option<TokenKind>,
}

impl RawArgument {
    /// `tokens` must be non-empty
    pub fn from_tokens(source: &str, tokens: &[Token]) -> Self {
        let span = tokens[0].span.merge(tokens[tokens.len() - 1].span);
        Self {
            text: Spanned::from_source(source, span),
            token: match tokens {
                [single] => Some(single.kind),
                _ => None,
            },
        }
    }

    pub fn span(&self) -> Span {
        self.text.span
    }

    /// The identifier text, if this argument is a single identifier
    pub fn ident(&self) -> Option<&str> {
        match self.token {
            Some(TokenKind::Ident) => Some(&self.text.node),
            _ => None,
        }
    }
}

/// Validate `args` against `schema`
///
/// `list_span` covers the parentheses and is used for arity errors on an
/// empty argument list. Nothing is bound here; the caller binds new names
/// once the whole statement has validated.
pub fn validate(
    schema: &KeywordSchema,
    args: &[RawArgument],
    list_span: Span,
    symbols: &SymbolTable,
) -> Result<Vec<Argument>, ParseError> {
    let Some(kinds) = schema.kinds(args.len()) else {
        let span = match (args.first(), args.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => list_span,
        };
        return Err(ParseError::Arity {
            keyword: schema.name.to_string(),
            expected: schema.arities.iter().copied().collect(),
            found: args.len(),
            span,
        });
    };

    args.iter()
        .zip(kinds)
        .enumerate()
        .map(|(i, (arg, kind))| coerce(schema.name, i + 1, *kind, arg, symbols))
        .collect()
}

/// Coerce one argument to `kind`
pub fn coerce(
    keyword: &str,
    position: usize,
    kind: ParameterKind,
    arg: &RawArgument,
    symbols: &SymbolTable,
) -> Result<Argument, ParseError> {
    let mismatch = || ParseError::KindMismatch {
        keyword: keyword.to_string(),
        position,
        expected: kind,
        found: arg.text.node.clone(),
        span: arg.span(),
    };
    let text = arg.text.node.as_str();

    let value = match kind {
        // Overflowing literals such as `1e999` parse to infinity
        ParameterKind::Float => match arg.token {
            Some(TokenKind::Number) => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float)
                .ok_or_else(mismatch)?,
            _ => return Err(mismatch()),
        },
        ParameterKind::Bool => arg
            .ident()
            .and_then(bool_literal)
            .map(Value::Bool)
            .ok_or_else(mismatch)?,
        ParameterKind::Axis => arg
            .ident()
            .and_then(Axis::from_literal)
            .map(Value::Axis)
            .ok_or_else(mismatch)?,
        ParameterKind::Face => arg
            .ident()
            .and_then(Face::from_literal)
            .map(Value::Face)
            .ok_or_else(mismatch)?,
        ParameterKind::ExistingVariable => {
            let name = usable_name(arg).ok_or_else(mismatch)?;
            if !symbols.contains(name) {
                return Err(ParseError::UnboundVariable {
                    name: name.to_string(),
                    span: arg.span(),
                });
            }
            Value::Name(name.to_string())
        }
        ParameterKind::Identifier => {
            let name = usable_name(arg).ok_or_else(mismatch)?;
            Value::Name(name.to_string())
        }
        ParameterKind::NewVariable => {
            let name = usable_name(arg).ok_or_else(mismatch)?;
            if symbols.contains(name) {
                return Err(ParseError::DuplicateDefinition {
                    name: name.to_string(),
                    span: arg.span(),
                });
            }
            Value::Name(name.to_string())
        }
    };

    Ok(Argument {
        raw: arg.text.clone(),
        kind,
        value,
    })
}

/// A single identifier that is not a reserved literal
fn usable_name(arg: &RawArgument) -> Option<&str> {
    arg.ident().filter(|name| !is_reserved(name))
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_LITERALS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{def_schema, lookup};
    use crate::statement::split_arguments;
    use crate::BindingOrigin;
    use shapeasm_lexer::tokenize;

    /// Split an argument list written without parentheses
    fn args(source: &str) -> Vec<RawArgument> {
        let tokens = tokenize(source).unwrap();
        split_arguments(source, &tokens).unwrap()
    }

    fn list_span(source: &str) -> Span {
        Span::new(0, source.len())
    }

    fn validate_def(source: &str) -> Result<Vec<Argument>, ParseError> {
        validate(def_schema(), &args(source), list_span(source), &SymbolTable::new())
    }

    #[test]
    fn test_def_without_parameters() {
        assert_eq!(validate_def("").unwrap(), vec![]);
    }

    #[test]
    fn test_def_with_four_names() {
        let params = validate_def("one, two, three, four").unwrap();
        assert_eq!(params.len(), 4);
        assert!(params.iter().all(|p| p.kind == ParameterKind::Identifier));
        assert_eq!(params[2].value, Value::Name("three".into()));
    }

    #[test]
    fn test_arguments_in_place_of_parameters() {
        let err = validate_def("0.5, 0.5, 0.5, True").unwrap_err();
        match err {
            ParseError::KindMismatch {
                position,
                expected,
                found,
                span,
                ..
            } => {
                assert_eq!(position, 1);
                assert_eq!(expected, ParameterKind::Identifier);
                assert_eq!(found, "0.5");
                assert_eq!(span, Span::new(0, 3));
            }
            other => panic!("expected kind mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_bool_literal_is_not_an_identifier() {
        let err = validate_def("a, b, c, True").unwrap_err();
        assert!(matches!(err, ParseError::KindMismatch { position: 4, .. }));
    }

    #[test]
    fn test_wrong_count_is_arity_not_kind() {
        let err = validate_def("0.5, 0.5, 0.5").unwrap_err();
        assert_eq!(
            err,
            ParseError::Arity {
                keyword: "Def".into(),
                expected: vec![0, 4],
                found: 3,
                span: Span::new(0, 13),
            }
        );
    }

    #[test]
    fn test_wrong_type_reports_first_bad_position() {
        let err = validate_def("0.5, yikes, 0.5, False").unwrap_err();
        assert!(matches!(err, ParseError::KindMismatch { position: 1, .. }));
    }

    #[test]
    fn test_arity_checked_for_every_keyword() {
        for schema in crate::registry().iter() {
            let too_many = schema.arities.iter().max().unwrap() + 1;
            let source = vec!["0.5"; too_many].join(", ");
            let err = validate(schema, &args(&source), list_span(&source), &SymbolTable::new())
                .unwrap_err();
            assert_eq!(err.code(), crate::DiagnosticCode::Arity, "{}", schema.name);
        }
    }

    #[test]
    fn test_reflect_existing_and_axis() {
        let mut symbols = SymbolTable::new();
        symbols
            .define(
                Spanned::new("cube0".into(), Span::new(100, 105)),
                BindingOrigin::Parameter,
            )
            .unwrap();
        let source = "cube0, X";
        let reflect = lookup("Reflect").unwrap();
        let validated = validate(reflect, &args(source), list_span(source), &symbols).unwrap();
        assert_eq!(validated[0].kind, ParameterKind::ExistingVariable);
        assert_eq!(validated[1].value, Value::Axis(Axis::X));
    }

    #[test]
    fn test_unbound_variable_span() {
        let source = "ghost, X";
        let reflect = lookup("Reflect").unwrap();
        let err = validate(reflect, &args(source), list_span(source), &SymbolTable::new())
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::UnboundVariable {
                name: "ghost".into(),
                span: Span::new(0, 5)
            }
        );
    }

    #[test]
    fn test_float_needs_a_number_token() {
        let cuboid = lookup("Cuboid").unwrap();
        let source = "1, inf, 0.5";
        let err = validate(cuboid, &args(source), list_span(source), &SymbolTable::new())
            .unwrap_err();
        assert!(matches!(err, ParseError::KindMismatch { position: 2, .. }));

        let source = "1, -2.5e1, .5, False";
        let ok = validate(cuboid, &args(source), list_span(source), &SymbolTable::new()).unwrap();
        assert_eq!(ok[1].value, Value::Float(-25.0));
        assert_eq!(ok[3].value, Value::Bool(false));
    }

    #[test]
    fn test_overflowing_float_is_rejected() {
        let cuboid = lookup("Cuboid").unwrap();
        let source = "1e999, 1, 1";
        let err = validate(cuboid, &args(source), list_span(source), &SymbolTable::new())
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::KindMismatch {
                keyword: "Cuboid".into(),
                position: 1,
                expected: ParameterKind::Float,
                found: "1e999".into(),
                span: Span::new(0, 5),
            }
        );
    }

    #[test]
    fn test_face_literal() {
        let squeeze = lookup("Squeeze").unwrap();
        let mut symbols = SymbolTable::new();
        for (i, n) in ["a", "b", "c"].into_iter().enumerate() {
            symbols
                .define(Spanned::new(n.into(), Span::new(i, i + 1)), BindingOrigin::Parameter)
                .unwrap();
        }
        let source = "a, b, c, top, 0.5, 0.5";
        let ok = validate(squeeze, &args(source), list_span(source), &symbols).unwrap();
        assert_eq!(ok[3].value, Value::Face(Face::Top));

        let source = "a, b, c, X, 0.5, 0.5";
        let err = validate(squeeze, &args(source), list_span(source), &symbols).unwrap_err();
        assert!(matches!(
            err,
            ParseError::KindMismatch { position: 4, expected: ParameterKind::Face, .. }
        ));
    }

    #[test]
    fn test_new_variable_must_be_fresh() {
        let mut symbols = SymbolTable::new();
        symbols
            .define(Spanned::new("taken".into(), Span::new(0, 5)), BindingOrigin::Parameter)
            .unwrap();
        let raw = &args("taken")[0];
        let err = coerce("Test", 1, ParameterKind::NewVariable, raw, &symbols).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDefinition { .. }));

        let raw = &args("fresh")[0];
        let ok = coerce("Test", 1, ParameterKind::NewVariable, raw, &symbols).unwrap();
        assert_eq!(ok.value, Value::Name("fresh".into()));
    }
}
