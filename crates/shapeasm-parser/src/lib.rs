//! ShapeAssembly Parser - Schema-driven, diagnostic-accumulating parser
//!
//! Parses program text into a [`Program`](shapeasm_ast::Program) AST.
//! Key properties:
//! - Every keyword is a row in a static schema table; one generic validator
//!   checks arity and argument kinds against it
//! - Errors never abort the parse: each malformed line becomes a
//!   [`Diagnostic`] and parsing continues with the next line
//! - A parse is a pure function of the text, so re-parsing on every edit
//!   is the intended usage

mod error;
mod diagnostics;
mod symbols;
mod program;
pub mod schema;
pub mod statement;
pub mod validate;

pub use error::*;
pub use diagnostics::*;
pub use symbols::*;
pub use program::*;
pub use schema::{lookup, registry, KeywordSchema, Registry, ResultBinding, Usage};
pub use statement::{parse_statement, StatementOutcome};
pub use validate::{validate, RawArgument};
