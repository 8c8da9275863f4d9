//! Error types for the tabloid crate.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::column::ColumnRange;

/// Errors that can occur while parsing, filtering or selecting columns.
#[derive(Debug, Error)]
pub enum TabloidError {
    /// The header line is empty or whitespace only.
    #[error("no column titles found: the header line is empty")]
    EmptyInput,

    /// Two column titles normalize to the same key.
    #[error("duplicate column title found: {title:?} -- unable to work with non-unique column titles")]
    DuplicateColumnTitle { title: String },

    /// A data line is too short to fill one of the columns.
    #[error(
        "input line {row} does not contain enough data to fill column {column:?}: \
         the line is {length} characters long, column expects data between {expected}"
    )]
    ShortLine {
        row: usize,
        column: String,
        expected: ColumnRange,
        length: usize,
    },

    /// The filter expression could not be compiled.
    #[error("unable to process expression {expression:?}: {source}")]
    CompileError {
        expression: String,
        #[source]
        source: EvaluationError,
    },

    /// The filter expression produced something other than a boolean.
    #[error("expression {expression:?} must return a boolean value, got {found}")]
    TypeMismatch {
        expression: String,
        found: &'static str,
    },

    /// The filter expression failed against a row.
    #[error("unable to evaluate expression for row {row}: {source}")]
    RowEvaluationError {
        row: usize,
        #[source]
        source: EvaluationError,
    },

    /// A requested column does not exist.
    #[error("column {name:?} does not exist in the input dataset")]
    ColumnNotFound { name: String },

    /// The input has a header but no data rows.
    #[error("no data found in input")]
    NoData,

    /// Filtering and selection left nothing to display.
    #[error("no rows left to display after filtering")]
    EmptyResult,
}

/// Broad category of a [`TabloidError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input violates the rectangular layout.
    Structural,
    /// The filter expression is invalid or fails against a row.
    Expression,
    /// A projection names a column that does not exist.
    Lookup,
}

impl TabloidError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TabloidError::EmptyInput
            | TabloidError::DuplicateColumnTitle { .. }
            | TabloidError::ShortLine { .. }
            | TabloidError::NoData
            | TabloidError::EmptyResult => ErrorKind::Structural,
            TabloidError::CompileError { .. }
            | TabloidError::TypeMismatch { .. }
            | TabloidError::RowEvaluationError { .. } => ErrorKind::Expression,
            TabloidError::ColumnNotFound { .. } => ErrorKind::Lookup,
        }
    }
}

/// Failure reported by an [`Evaluator`](crate::Evaluator).
///
/// Wraps whatever error type the concrete evaluator uses so the filter can
/// attach row context without knowing the backend.
#[derive(Debug)]
pub struct EvaluationError {
    cause: Box<dyn StdError + Send + Sync + 'static>,
}

impl EvaluationError {
    /// Wraps an evaluator-specific error.
    pub fn new(cause: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// Returns the underlying evaluator error.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cause, f)
    }
}

impl StdError for EvaluationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Result type for tabloid operations.
pub type Result<T> = std::result::Result<T, TabloidError>;
