//! Per-function symbol table for variable existence checks

use std::collections::HashMap;

use shapeasm_ast::Spanned;

use crate::ParseError;

/// How a name came to be bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingOrigin {
    /// A `def` header parameter
    Parameter,
    /// The assigned result of a statement
    Result { keyword: String },
}

/// A bound name and where it was declared
#[derive(Debug, Clone)]
pub struct Binding {
    pub declaration: Spanned<String>,
    pub origin: BindingOrigin,
}

/// Symbol table mapping names to their declarations
///
/// Scoped to one function; created when the function's header is parsed and
/// dropped once its body is done.
#[derive(Debug, Default)]
pub struct SymbolTable {
    bindings: Vec<Binding>,
    by_name: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new name; rebinding an existing name is an error
    pub fn define(
        &mut self,
        declaration: Spanned<String>,
        origin: BindingOrigin,
    ) -> Result<(), ParseError> {
        if self.contains(&declaration.node) {
            return Err(ParseError::DuplicateDefinition {
                name: declaration.node,
                span: declaration.span,
            });
        }
        self.by_name
            .insert(declaration.node.clone(), self.bindings.len());
        self.bindings.push(Binding {
            declaration,
            origin,
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.by_name.get(name).map(|&i| &self.bindings[i])
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }
}
