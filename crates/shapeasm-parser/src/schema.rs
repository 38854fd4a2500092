//! Keyword schema registry
//!
//! One [`KeywordSchema`] row per keyword. Validation is a single generic
//! routine driven by these rows, so adding a keyword means adding a row to
//! [`build_registry`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use shapeasm_ast::ParameterKind::{self, *};

/// Keyword used for function headers
pub const DEF: &str = "Def";

/// Whether a statement must assign its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultBinding {
    Required,
    Optional,
}

/// Where a keyword may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Statement(ResultBinding),
    /// Only valid as a `def` header parameter list
    Header,
}

/// Accepted arities and the kind of every position for each arity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSchema {
    pub name: &'static str,
    pub arities: BTreeSet<usize>,
    pub kinds_by_arity: BTreeMap<usize, Vec<ParameterKind>>,
    pub usage: Usage,
}

impl KeywordSchema {
    /// Build a schema from its accepted signatures. Each signature's length
    /// is its arity, so `arities` and `kinds_by_arity` always agree.
    pub fn new(name: &'static str, usage: Usage, signatures: &[&[ParameterKind]]) -> Self {
        let kinds_by_arity: BTreeMap<usize, Vec<ParameterKind>> = signatures
            .iter()
            .map(|kinds| (kinds.len(), kinds.to_vec()))
            .collect();
        Self {
            name,
            arities: kinds_by_arity.keys().copied().collect(),
            kinds_by_arity,
            usage,
        }
    }

    pub fn accepts_arity(&self, arity: usize) -> bool {
        self.arities.contains(&arity)
    }

    pub fn kinds(&self, arity: usize) -> Option<&[ParameterKind]> {
        self.kinds_by_arity.get(&arity).map(Vec::as_slice)
    }

    pub fn result_binding(&self) -> Option<ResultBinding> {
        match self.usage {
            Usage::Statement(binding) => Some(binding),
            Usage::Header => None,
        }
    }
}

/// Name-keyed registry, keys are lowercase
#[derive(Debug)]
pub struct Registry {
    schemas: HashMap<String, KeywordSchema>,
}

impl Registry {
    /// Case-insensitive lookup
    pub fn lookup(&self, keyword: &str) -> Option<&KeywordSchema> {
        self.schemas.get(&keyword.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordSchema> {
        self.schemas.values()
    }

    fn insert(&mut self, schema: KeywordSchema) {
        self.schemas.insert(schema.name.to_ascii_lowercase(), schema);
    }
}

fn build_registry() -> Registry {
    use ResultBinding::*;

    let mut registry = Registry {
        schemas: HashMap::new(),
    };

    // Cuboid(length, height, width [, aligned])
    registry.insert(KeywordSchema::new(
        "Cuboid",
        Usage::Statement(Required),
        &[&[Float, Float, Float], &[Float, Float, Float, Bool]],
    ));
    // Attach(c1, c2, x1, y1, z1, x2, y2, z2)
    registry.insert(KeywordSchema::new(
        "Attach",
        Usage::Statement(Optional),
        &[&[
            ExistingVariable,
            ExistingVariable,
            Float,
            Float,
            Float,
            Float,
            Float,
            Float,
        ]],
    ));
    // Squeeze(c1, c2, c3, face, u, v)
    registry.insert(KeywordSchema::new(
        "Squeeze",
        Usage::Statement(Optional),
        &[&[
            ExistingVariable,
            ExistingVariable,
            ExistingVariable,
            Face,
            Float,
            Float,
        ]],
    ));
    registry.insert(KeywordSchema::new(
        "Reflect",
        Usage::Statement(Optional),
        &[&[ExistingVariable, Axis]],
    ));
    // Translate(c, axis, copies, distance)
    registry.insert(KeywordSchema::new(
        "Translate",
        Usage::Statement(Optional),
        &[&[ExistingVariable, Axis, Float, Float]],
    ));
    registry.insert(KeywordSchema::new(
        "Union",
        Usage::Statement(Optional),
        &[&[ExistingVariable, ExistingVariable]],
    ));
    // Functions take no parameters or exactly four names
    registry.insert(KeywordSchema::new(
        DEF,
        Usage::Header,
        &[&[], &[Identifier, Identifier, Identifier, Identifier]],
    ));

    registry
}

/// The process-wide registry, built on first use and never mutated
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

/// Look up a keyword in the global registry
pub fn lookup(keyword: &str) -> Option<&'static KeywordSchema> {
    registry().lookup(keyword)
}

/// The `Def` header schema
pub fn def_schema() -> &'static KeywordSchema {
    lookup(DEF).expect("Def is always registered")
}
