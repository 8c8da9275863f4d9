//! End-to-end processing of a buffered table.

use crate::column::Table;
use crate::decompose::decompose;
use crate::error::{Result, TabloidError};
use crate::eval::Evaluator;
use crate::filter::filter;
use crate::project::project;
use crate::segment::segment_header;

/// Configured parse → filter → select run over a whole input.
///
/// # Example
///
/// ```
/// use tabloid::{EvaluationError, Evaluator, Pipeline, Row, Value};
///
/// struct KeepAll;
///
/// impl Evaluator for KeepAll {
///     type Program = ();
///     fn compile(&self, _: &str) -> Result<(), EvaluationError> {
///         Ok(())
///     }
///     fn evaluate(&self, _: &(), _: &Row<'_>) -> Result<Value, EvaluationError> {
///         Ok(Value::Bool(true))
///     }
/// }
///
/// let input = "NAME   STATUS    RESTARTS\nweb      Running   0\ndb       Failed    3\n";
/// let table = Pipeline::new(KeepAll)
///     .expression("anything")
///     .columns(["restarts", "name"])
///     .run(input)
///     .unwrap();
///
/// assert_eq!(table.titles(), vec!["RESTARTS", "NAME"]);
/// assert_eq!(table.row_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<E> {
    evaluator: E,
    expression: String,
    columns: Vec<String>,
}

impl<E: Evaluator> Pipeline<E> {
    /// Creates a pipeline that keeps every row and column.
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            expression: String::new(),
            columns: Vec::new(),
        }
    }

    /// Sets the filter expression. Empty keeps every row.
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    /// Sets the columns to display, in order. Empty keeps every column.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The evaluator used for filtering.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Parses `input`, filters its rows and selects the requested columns.
    ///
    /// The first line is the header. Besides the errors of each stage, this
    /// fails with [`TabloidError::NoData`] when the input has no data rows
    /// and with [`TabloidError::EmptyResult`] when nothing is left to
    /// display.
    pub fn run(&self, input: &str) -> Result<Table> {
        let mut lines = input.lines();
        let header = lines.next().ok_or(TabloidError::EmptyInput)?;

        let table = decompose(segment_header(header)?, lines)?;
        if table.row_count() == 0 {
            return Err(TabloidError::NoData);
        }

        let table = filter(&table, &self.expression, &self.evaluator)?;
        let table = project(&table, self.columns.as_slice())?;

        if table.is_empty() || table.row_count() == 0 {
            return Err(TabloidError::EmptyResult);
        }
        Ok(table)
    }
}
