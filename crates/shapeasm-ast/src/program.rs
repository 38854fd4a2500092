//! Program, function and statement nodes

use serde::{Deserialize, Serialize};

use crate::{ParameterKind, Span, Spanned, Value};

/// A parsed program: one entry function plus named subfunctions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub entry_function: FunctionDef,
    pub subfunctions: Vec<FunctionDef>,
}

impl Program {
    /// All functions, entry first
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        std::iter::once(&self.entry_function).chain(self.subfunctions.iter())
    }

    /// Look up a subfunction by name
    pub fn subfunction(&self, name: &str) -> Option<&FunctionDef> {
        self.subfunctions
            .iter()
            .find(|f| f.name.as_ref().is_some_and(|n| n.node == name))
    }
}

/// A `def` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Omitted names are only allowed on the entry function
    pub name: Option<Spanned<String>>,
    /// Either empty or exactly four identifiers
    pub parameters: Vec<Spanned<String>>,
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl FunctionDef {
    /// An unnamed function with no parameters or body
    pub fn empty(span: Span) -> Self {
        Self {
            name: None,
            parameters: Vec::new(),
            statements: Vec::new(),
            span,
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.node.as_str())
    }
}

/// `[result =] Keyword(args...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Keyword as written in the source
    pub keyword: Spanned<String>,
    pub result: Option<Spanned<String>>,
    /// Empty when validation failed
    pub arguments: Vec<Argument>,
    pub span: Span,
}

impl Statement {
    /// Names this statement reads from the symbol table
    pub fn variable_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments
            .iter()
            .filter(|a| a.kind == ParameterKind::ExistingVariable)
    }
}

/// A validated argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub raw: Spanned<String>,
    pub kind: ParameterKind,
    pub value: Value,
}
