//! Tree-walking interpreter and the [`tabloid::Evaluator`] implementation.

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};
use regex::Regex;
use tabloid::{EvaluationError, Evaluator, Row, Value};

use crate::error::{ExprError, Result};
use crate::functions::FunctionRegistry;
use crate::lexer::tokenize;
use crate::parser::{parse, CompareOp, Expr, Pattern};

/// A compiled expression.
#[derive(Debug, Clone)]
pub struct Program {
    source: String,
    expr: Expr,
}

impl Program {
    /// The expression text this program was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Program {
    /// Fully parenthesized form, useful to check how an expression parsed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// Evaluates filter expressions with a set of helper functions.
///
/// # Example
///
/// ```
/// use tabloid::{Pipeline, TabloidError};
/// use tabloid_expr::ExprEvaluator;
///
/// let input = "NAME   READY   STATUS\nweb    1/1     Running\ndb     0/1     Pending\n";
/// let table = Pipeline::new(ExprEvaluator::new())
///     .expression("isready(ready) && status == 'Running'")
///     .columns(["name"])
///     .run(input)?;
///
/// assert_eq!(table.column("name").unwrap().values(), ["web"]);
/// # Ok::<(), TabloidError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExprEvaluator {
    registry: FunctionRegistry,
}

impl ExprEvaluator {
    /// Creates an evaluator with the built-in functions.
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::builtin())
    }

    /// Creates an evaluator with a custom function registry.
    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    /// The function registry.
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for adding functions.
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Parses an expression and resolves its function calls.
    pub fn parse(&self, expression: &str) -> Result<Program> {
        let tokens = tokenize(expression)?;
        let expr = parse(&tokens, &self.registry)?;
        debug!("compiled {expression:?} as {expr}");
        Ok(Program {
            source: expression.to_string(),
            expr,
        })
    }

    /// Runs a compiled program against a row.
    pub fn eval(&self, program: &Program, row: &Row<'_>) -> Result<Value> {
        let value = eval(&program.expr, row)?;
        trace!("row {}: {} => {value}", row.index() + 1, program.source);
        Ok(value)
    }
}

impl Default for ExprEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for ExprEvaluator {
    type Program = Program;

    fn compile(&self, expression: &str) -> std::result::Result<Program, EvaluationError> {
        Ok(self.parse(expression)?)
    }

    fn evaluate(&self, program: &Program, row: &Row<'_>) -> std::result::Result<Value, EvaluationError> {
        Ok(self.eval(program, row)?)
    }
}

fn eval(expr: &Expr, row: &Row<'_>) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident { name, lowered } => row
            .get(name)
            .or_else(|| row.get(lowered))
            .map(Value::from)
            .ok_or_else(|| ExprError::UnknownIdentifier(name.clone())),
        Expr::Not(inner) => {
            let value = eval(inner, row)?;
            match value {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(ExprError::UnaryTypeMismatch {
                    op: "!",
                    operand: other.type_name(),
                }),
            }
        }
        Expr::Neg(inner) => {
            let value = eval(inner, row)?;
            numeric(&value)
                .map(|n| Value::Number(-n))
                .ok_or(ExprError::UnaryTypeMismatch {
                    op: "-",
                    operand: value.type_name(),
                })
        }
        Expr::And(lhs, rhs) => {
            if !boolean("&&", eval(lhs, row)?)? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(boolean("&&", eval(rhs, row)?)?))
        }
        Expr::Or(lhs, rhs) => {
            if boolean("||", eval(lhs, row)?)? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(boolean("||", eval(rhs, row)?)?))
        }
        Expr::Compare { op, lhs, rhs } => {
            let lhs = eval(lhs, row)?;
            let rhs = eval(rhs, row)?;
            compare(*op, &lhs, &rhs).map(Value::Bool)
        }
        Expr::Match {
            lhs,
            pattern,
            negated,
        } => {
            let op = if *negated { "!~" } else { "=~" };
            let subject = eval(lhs, row)?;
            let matched = match pattern {
                Pattern::Compiled(re) => is_match(op, &subject, re)?,
                Pattern::Dynamic(expr) => match eval(expr, row)? {
                    Value::String(source) => is_match(op, &subject, &Regex::new(&source)?)?,
                    other => {
                        return Err(ExprError::TypeMismatch {
                            op,
                            left: subject.type_name(),
                            right: other.type_name(),
                        })
                    }
                },
            };
            Ok(Value::Bool(matched != *negated))
        }
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| eval(arg, row))
                .collect::<Result<Vec<_>>>()?;
            function.call(&args)
        }
    }
}

fn boolean(op: &'static str, value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(ExprError::UnaryTypeMismatch {
            op,
            operand: other.type_name(),
        }),
    }
}

fn is_match(op: &'static str, subject: &Value, re: &Regex) -> Result<bool> {
    match subject {
        Value::String(s) => Ok(re.is_match(s)),
        other => Err(ExprError::TypeMismatch {
            op,
            left: other.type_name(),
            right: "string",
        }),
    }
}

/// Numbers as they are, strings when they hold a finite number.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Bool(_) => None,
    }
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool> {
    match op {
        CompareOp::Eq => Ok(equals(lhs, rhs)),
        CompareOp::Ne => Ok(!equals(lhs, rhs)),
        _ => {
            let Some(ordering) = order(op, lhs, rhs)? else {
                return Ok(false);
            };
            Ok(match op {
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Le => ordering != Ordering::Greater,
                CompareOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
    }
}

fn equals(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(_), Value::Number(_) | Value::String(_))
        | (Value::String(_), Value::Number(_)) => match (numeric(lhs), numeric(rhs)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => false,
    }
}

/// `None` when the numbers are unordered (NaN).
fn order(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<Option<Ordering>> {
    if let (Some(a), Some(b)) = (numeric(lhs), numeric(rhs)) {
        return Ok(a.partial_cmp(&b));
    }
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        _ => Err(ExprError::TypeMismatch {
            op: op.as_str(),
            left: lhs.type_name(),
            right: rhs.type_name(),
        }),
    }
}
