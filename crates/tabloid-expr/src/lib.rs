//! Tabloid-expr - filter expressions for tabloid tables.
//!
//! [`ExprEvaluator`] implements [`tabloid::Evaluator`] with a small boolean
//! expression language. Every column of a row is a variable named after its
//! key, so `STATUS` is `status` and `AGE GAP` is `age_gap`.
//!
//! ```text
//! status == "Running" && cpu > 100
//! name =~ "^web-" || !isready(ready)
//! age.olderthan("1d") && hasrestarts(restarts)
//! ```
//!
//! # Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `"text"`, `'text'` | string literal |
//! | `3`, `2.5` | number literal |
//! | `true`, `false` | boolean literal |
//! | `a == b`, `a != b` | equality; numeric when both sides are numbers |
//! | `<`, `<=`, `>`, `>=` | numeric, or lexicographic for two strings |
//! | `a =~ re`, `a !~ re` | regular expression match |
//! | `&&`, `\|\|`, `!` | boolean logic, short-circuiting |
//! | `f(a, b)`, `a.f(b)` | function call |
//!
//! Identifiers may start with digits when letters follow, so a `5XX ERRORS`
//! column is reachable as `5xx_errors`. Function names are case-insensitive
//! and resolved when the expression is compiled. See [`FunctionRegistry`]
//! for the built-in helpers.
//!
//! # Quick Start
//!
//! ```rust
//! use tabloid::Pipeline;
//! use tabloid_expr::ExprEvaluator;
//!
//! let input = "NAME   STATUS    RESTARTS\nweb      Running   0\ndb       Failed    3\n";
//!
//! let table = Pipeline::new(ExprEvaluator::new())
//!     .expression(r#"status == "Failed""#)
//!     .columns(["status", "name"])
//!     .run(input)
//!     .unwrap();
//!
//! assert_eq!(table.titles(), vec!["STATUS", "NAME"]);
//! assert_eq!(table.column("name").unwrap().values(), ["db"]);
//! ```

mod duration;
mod error;
mod evaluator;
mod functions;
mod lexer;
mod parser;

// Re-export public API
pub use duration::parse_duration;
pub use error::{ExprError, Result};
pub use evaluator::{ExprEvaluator, Program};
pub use functions::{Function, FunctionRegistry};
