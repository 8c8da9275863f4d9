//! Row filtering.

use crate::column::Table;
use crate::error::{Result, TabloidError};
use crate::eval::{Evaluator, Value};

/// Keeps the rows of `table` for which `expression` evaluates to `true`.
///
/// Every column's key is bound to that row's value while the expression
/// runs, so any column can be referenced. A kept or dropped row is kept or
/// dropped in every column, and kept rows stay in their original order.
/// An empty (or whitespace only) expression returns the table unchanged
/// without touching the evaluator.
///
/// Filtering is all or nothing: the first row that cannot be evaluated
/// aborts the whole call.
///
/// # Errors
///
/// - [`TabloidError::CompileError`] if the evaluator rejects the expression.
/// - [`TabloidError::TypeMismatch`] if a row evaluates to a non-boolean.
/// - [`TabloidError::RowEvaluationError`] if a row fails to evaluate; rows
///   are numbered from 1.
pub fn filter<E>(table: &Table, expression: &str, evaluator: &E) -> Result<Table>
where
    E: Evaluator + ?Sized,
{
    let expression = expression.trim();
    if expression.is_empty() {
        log::debug!("no filter expression provided, returning all rows");
        return Ok(table.clone());
    }

    let program = evaluator
        .compile(expression)
        .map_err(|source| TabloidError::CompileError {
            expression: expression.to_string(),
            source,
        })?;

    let mut kept = Vec::new();
    for index in 0..table.row_count() {
        let Some(row) = table.row(index) else {
            break;
        };

        let result = evaluator
            .evaluate(&program, &row)
            .map_err(|source| TabloidError::RowEvaluationError {
                row: index + 1,
                source,
            })?;

        match result {
            Value::Bool(true) => {
                log::trace!("row {} kept", index + 1);
                kept.push(index);
            }
            Value::Bool(false) => log::trace!("row {} dropped", index + 1),
            other => {
                return Err(TabloidError::TypeMismatch {
                    expression: expression.to_string(),
                    found: other.type_name(),
                })
            }
        }
    }

    log::debug!(
        "expression {:?} kept {} of {} rows",
        expression,
        kept.len(),
        table.row_count()
    );

    let columns = table
        .columns()
        .iter()
        .map(|column| {
            let values = kept
                .iter()
                .filter_map(|&i| column.value(i).map(str::to_string))
                .collect();
            column.with_values(values)
        })
        .collect();
    Ok(Table::new(columns))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::column::Row;
    use crate::error::EvaluationError;
    use crate::{decompose, segment_header};

    /// Understands `true`, `false`, `name` (returns the cell) and
    /// `key == "value"`.
    #[derive(Default)]
    struct TinyEvaluator {
        compiled: Cell<usize>,
        evaluated: Cell<usize>,
    }

    enum Program {
        Literal(bool),
        Column(String),
        Equals(String, String),
    }

    impl Evaluator for TinyEvaluator {
        type Program = Program;

        fn compile(&self, expression: &str) -> std::result::Result<Program, EvaluationError> {
            self.compiled.set(self.compiled.get() + 1);
            match expression {
                "true" => Ok(Program::Literal(true)),
                "false" => Ok(Program::Literal(false)),
                _ => match expression.split_once("==") {
                    Some((key, value)) => Ok(Program::Equals(
                        key.trim().to_string(),
                        value.trim().trim_matches('"').to_string(),
                    )),
                    None if expression.chars().all(char::is_alphanumeric) => {
                        Ok(Program::Column(expression.to_string()))
                    }
                    None => Err(EvaluationError::new(format!(
                        "unexpected token in {expression:?}"
                    ))),
                },
            }
        }

        fn evaluate(
            &self,
            program: &Program,
            row: &Row<'_>,
        ) -> std::result::Result<Value, EvaluationError> {
            self.evaluated.set(self.evaluated.get() + 1);
            let lookup = |key: &str| {
                row.get(key)
                    .ok_or_else(|| EvaluationError::new(format!("unknown column {key:?}")))
            };
            match program {
                Program::Literal(b) => Ok(Value::Bool(*b)),
                Program::Column(key) => Ok(Value::from(lookup(key)?)),
                Program::Equals(key, value) => Ok(Value::Bool(lookup(key)? == value)),
            }
        }
    }

    fn pods() -> Table {
        let table = segment_header("NAME   STATUS    RESTARTS").unwrap();
        decompose(
            table,
            [
                "web      Running   0",
                "db       Failed    3",
                "cache    Running   1",
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_expression_is_identity() {
        let table = pods();
        let evaluator = TinyEvaluator::default();

        let filtered = filter(&table, "", &evaluator).unwrap();
        assert_eq!(filtered, table);

        let filtered = filter(&table, "   ", &evaluator).unwrap();
        assert_eq!(filtered, table);

        assert_eq!(evaluator.compiled.get(), 0);
        assert_eq!(evaluator.evaluated.get(), 0);
    }

    #[test]
    fn true_keeps_everything() {
        let table = pods();
        let filtered = filter(&table, "true", &TinyEvaluator::default()).unwrap();
        assert_eq!(filtered.row_count(), 3);
        assert_eq!(filtered, table);
    }

    #[test]
    fn false_drops_everything_but_keeps_columns() {
        let table = pods();
        let filtered = filter(&table, "false", &TinyEvaluator::default()).unwrap();
        assert_eq!(filtered.width(), 3);
        for column in filtered.columns() {
            assert!(column.is_empty());
        }
    }

    #[test]
    fn keeps_matching_rows_in_every_column() {
        let table = pods();
        let filtered = filter(&table, "status == \"Running\"", &TinyEvaluator::default()).unwrap();

        assert_eq!(filtered.column("name").unwrap().values(), ["web", "cache"]);
        assert_eq!(
            filtered.column("status").unwrap().values(),
            ["Running", "Running"]
        );
        assert_eq!(filtered.column("restarts").unwrap().values(), ["0", "1"]);
    }

    #[test]
    fn compiles_once() {
        let table = pods();
        let evaluator = TinyEvaluator::default();
        filter(&table, "status == \"Failed\"", &evaluator).unwrap();
        assert_eq!(evaluator.compiled.get(), 1);
        assert_eq!(evaluator.evaluated.get(), 3);
    }

    #[test]
    fn compile_errors_carry_the_expression() {
        let err = filter(&pods(), "status ~", &TinyEvaluator::default()).unwrap_err();
        match err {
            TabloidError::CompileError { expression, .. } => assert_eq!(expression, "status ~"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_boolean_results_are_rejected() {
        let err = filter(&pods(), "name", &TinyEvaluator::default()).unwrap_err();
        match err {
            TabloidError::TypeMismatch { expression, found } => {
                assert_eq!(expression, "name");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn row_failures_abort_with_row_number() {
        let err = filter(&pods(), "missing == \"x\"", &TinyEvaluator::default()).unwrap_err();
        match err {
            TabloidError::RowEvaluationError { row, source } => {
                assert_eq!(row, 1);
                assert_eq!(source.to_string(), "unknown column \"missing\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_table_never_evaluates() {
        let table = segment_header("NAME   STATUS").unwrap();
        let evaluator = TinyEvaluator::default();
        let filtered = filter(&table, "name", &evaluator).unwrap();
        assert_eq!(filtered.row_count(), 0);
        assert_eq!(evaluator.compiled.get(), 1);
        assert_eq!(evaluator.evaluated.get(), 0);
    }
}
