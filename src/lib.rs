//! ShapeAssembly - front end for a cuboid modeling language
//!
//! This is the root workspace crate that provides integration tests.
//! The implementation lives in the workspace member crates.

pub use shapeasm_ast as ast;
pub use shapeasm_highlight as highlight;
pub use shapeasm_lexer as lexer;
pub use shapeasm_parser as parser;
