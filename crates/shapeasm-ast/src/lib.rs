//! ShapeAssembly AST - Core types for the abstract syntax tree
//!
//! This crate defines the program/function/statement nodes, spans for
//! source locations, the argument kinds a keyword can expect, and the
//! global-to-line position mapping used by editors.

mod span;
mod kind;
mod program;
mod lines;
pub mod printer;

pub use span::*;
pub use kind::*;
pub use program::*;
pub use lines::*;
pub use printer::ToSource;
