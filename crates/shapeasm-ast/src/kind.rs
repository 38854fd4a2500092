//! Argument kinds and the literal values they parse to

use std::fmt;

use serde::{Deserialize, Serialize};

/// The expected semantic type of one argument position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    /// A fresh name that this statement binds
    NewVariable,
    /// A name bound earlier in the same function
    ExistingVariable,
    /// A numeric literal
    Float,
    /// `True` or `False`
    Bool,
    /// `X`, `Y` or `Z`
    Axis,
    /// One of the six cuboid faces
    Face,
    /// A declared name, e.g. a function parameter
    Identifier,
}

impl ParameterKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ParameterKind::NewVariable => "new variable name",
            ParameterKind::ExistingVariable => "existing variable",
            ParameterKind::Float => "float",
            ParameterKind::Bool => "bool (True or False)",
            ParameterKind::Axis => "axis (X, Y or Z)",
            ParameterKind::Face => "face (left, right, bot, top, back or front)",
            ParameterKind::Identifier => "identifier",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_literal(text: &str) -> Option<Self> {
        match text {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Left,
    Right,
    Bot,
    Top,
    Back,
    Front,
}

impl Face {
    pub fn from_literal(text: &str) -> Option<Self> {
        match text {
            "left" => Some(Face::Left),
            "right" => Some(Face::Right),
            "bot" => Some(Face::Bot),
            "top" => Some(Face::Top),
            "back" => Some(Face::Back),
            "front" => Some(Face::Front),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Face::Left => "left",
            Face::Right => "right",
            Face::Bot => "bot",
            Face::Top => "top",
            Face::Back => "back",
            Face::Front => "front",
        }
    }
}

/// A validated argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Float(f64),
    Bool(bool),
    Axis(Axis),
    Face(Face),
    /// A variable or identifier name
    Name(String),
}

/// Literal spellings that can never be used as names
pub const RESERVED_LITERALS: &[&str] = &["True", "False"];

pub fn bool_literal(text: &str) -> Option<bool> {
    match text {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_literals_are_case_sensitive() {
        assert_eq!(Axis::from_literal("Y"), Some(Axis::Y));
        assert_eq!(Axis::from_literal("y"), None);
    }

    #[test]
    fn test_face_round_trips_through_str() {
        for face in [Face::Left, Face::Right, Face::Bot, Face::Top, Face::Back, Face::Front] {
            assert_eq!(Face::from_literal(face.as_str()), Some(face));
        }
    }
}
