//! Error types for expression compilation and evaluation.

use thiserror::Error;

/// Errors raised while compiling or evaluating an expression.
#[derive(Debug, Error)]
pub enum ExprError {
    /// A character that starts no token.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// A string literal without its closing quote.
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A malformed number literal.
    #[error("invalid number {text:?} at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    /// A token the parser did not expect.
    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    /// The expression ended too early.
    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Parentheses, calls or prefix operators nested past the limit.
    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// A call to a function that is not registered.
    #[error("unknown function {0:?}")]
    UnknownFunction(String),

    /// A call with the wrong number of arguments.
    #[error("{name} function only accepts {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// An invalid regular expression.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A name that is not a column of the row.
    #[error("no column named {0:?}")]
    UnknownIdentifier(String),

    /// An operator applied to values it cannot handle.
    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// A unary operator applied to a value it cannot handle.
    #[error("operator '{op}' cannot be applied to {operand}")]
    UnaryTypeMismatch {
        op: &'static str,
        operand: &'static str,
    },

    /// A value that does not parse as a duration.
    #[error("unable to parse duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    /// A helper function rejected its arguments.
    #[error("{name} function {message}")]
    Function { name: String, message: String },
}

impl ExprError {
    /// Create a helper function error.
    pub fn function(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a duration parse error.
    pub fn duration(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl From<ExprError> for tabloid::EvaluationError {
    fn from(err: ExprError) -> Self {
        tabloid::EvaluationError::new(err)
    }
}

/// Result type for expression operations.
pub type Result<T> = std::result::Result<T, ExprError>;
