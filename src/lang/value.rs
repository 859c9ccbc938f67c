//! Runtime value representation.

use std::fmt;

use super::program::Function;

/// Dynamically typed value held by a variable
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric value (IEEE 754)
    Number(f64),

    /// Text built from code points
    String(String),

    /// Stored instruction sequence, run by inlining
    Function(Function),
}

impl Default for Value {
    fn default() -> Self {
        Value::Number(0.0)
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Text emitted by Print and produced by Cycle-Type; functions have none
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Function(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Function(body) => write!(f, "<function: {} instructions>", body.len()),
        }
    }
}
