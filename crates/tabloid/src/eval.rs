//! The expression evaluator capability used by [`filter`](crate::filter).
//!
//! The filter does not know any expression language. It hands each row to an
//! [`Evaluator`] and keeps the row when the result is `true`. Backends decide
//! the grammar and which helper functions are visible inside expressions.

use std::fmt;

use crate::column::Row;
use crate::error::EvaluationError;

/// Result of evaluating an expression against a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    /// Extracts the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Compiles and evaluates filter expressions against rows.
///
/// An expression is compiled once per [`filter`](crate::filter) call, so
/// syntax errors surface before any row is evaluated, and the compiled
/// program is then run against every row.
///
/// # Example
///
/// ```
/// use tabloid::{EvaluationError, Evaluator, Row, Value};
///
/// /// Keeps rows whose `status` column equals the expression text.
/// struct StatusIs;
///
/// impl Evaluator for StatusIs {
///     type Program = String;
///
///     fn compile(&self, expression: &str) -> Result<String, EvaluationError> {
///         Ok(expression.to_string())
///     }
///
///     fn evaluate(&self, program: &String, row: &Row<'_>) -> Result<Value, EvaluationError> {
///         let status = row
///             .get("status")
///             .ok_or_else(|| EvaluationError::new("no status column"))?;
///         Ok(Value::Bool(status == program))
///     }
/// }
/// ```
pub trait Evaluator {
    /// Compiled form of an expression.
    type Program;

    /// Parses and checks an expression.
    fn compile(&self, expression: &str) -> Result<Self::Program, EvaluationError>;

    /// Runs a compiled expression with the row's values as its variables.
    fn evaluate(&self, program: &Self::Program, row: &Row<'_>) -> Result<Value, EvaluationError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    type Program = E::Program;

    fn compile(&self, expression: &str) -> Result<Self::Program, EvaluationError> {
        (**self).compile(expression)
    }

    fn evaluate(&self, program: &Self::Program, row: &Row<'_>) -> Result<Value, EvaluationError> {
        (**self).evaluate(program, row)
    }
}
