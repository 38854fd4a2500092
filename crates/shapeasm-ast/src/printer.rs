//! Canonical text printer for ShapeAssembly AST
//!
//! Serializes an AST back to source form: one `def` header per function,
//! four-space indented statements, a blank line between functions.

use crate::{Argument, FunctionDef, Program, Statement};

/// Trait for converting AST nodes to canonical source text.
pub trait ToSource {
    /// Convert to canonical source with the given indentation level.
    fn to_source(&self, indent: usize) -> String;
}

/// Helper to generate indentation string (four spaces per level).
fn indent_str(level: usize) -> String {
    "    ".repeat(level)
}

impl ToSource for Program {
    fn to_source(&self, indent: usize) -> String {
        self.functions()
            .map(|f| f.to_source(indent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ToSource for FunctionDef {
    fn to_source(&self, indent: usize) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| p.node.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let header = match self.name_str() {
            Some(name) => format!("{}def {}({}):\n", indent_str(indent), name, params),
            None => format!("{}def({}):\n", indent_str(indent), params),
        };

        self.statements
            .iter()
            .fold(header, |mut out, stmt| {
                out.push_str(&stmt.to_source(indent + 1));
                out.push('\n');
                out
            })
    }
}

impl ToSource for Statement {
    fn to_source(&self, indent: usize) -> String {
        let args = self
            .arguments
            .iter()
            .map(|a| a.to_source(0))
            .collect::<Vec<_>>()
            .join(", ");
        match &self.result {
            Some(result) => format!(
                "{}{} = {}({})",
                indent_str(indent),
                result.node,
                self.keyword.node,
                args
            ),
            None => format!("{}{}({})", indent_str(indent), self.keyword.node, args),
        }
    }
}

impl ToSource for Argument {
    fn to_source(&self, _indent: usize) -> String {
        self.raw.node.clone()
    }
}
