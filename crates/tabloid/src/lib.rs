//! Tabloid - parse, filter and select columns from CLI table output.
//!
//! Commands like `kubectl get pods` or `docker ps` print tables whose columns
//! are padded with runs of spaces. Tabloid turns that text into a column
//! oriented [`Table`], filters its rows with a boolean expression and selects
//! a subset of its columns:
//!
//! ```text
//! text ─► segment_header ─► decompose ─► filter ─► project ─► Table
//!         (first line)      (the rest)   (Evaluator)
//! ```
//!
//! - [`segment_header`] infers column boundaries from the header line: a gap
//!   of at least [`MIN_COLUMN_GAP`] whitespace characters separates columns.
//! - [`decompose`] slices every data line at those boundaries.
//! - [`filter`] keeps rows for which an [`Evaluator`] returns `true`. Each
//!   column is visible to the expression under its [`normalize_key`] name.
//! - [`project`] selects and reorders columns.
//!
//! [`Pipeline`] wires the four stages together.
//!
//! # Quick Start
//!
//! ```rust
//! use tabloid::{decompose, project, segment_header};
//!
//! let input = "NAME   STATUS    RESTARTS\nweb      Running   0\ndb       Failed    3";
//! let mut lines = input.lines();
//!
//! let table = segment_header(lines.next().unwrap()).unwrap();
//! assert_eq!(table.keys(), vec!["name", "status", "restarts"]);
//!
//! let table = decompose(table, lines).unwrap();
//! assert_eq!(table.column("restarts").unwrap().values(), ["0", "3"]);
//!
//! let table = project(&table, &["status", "name"]).unwrap();
//! assert_eq!(table.titles(), vec!["STATUS", "NAME"]);
//! ```
//!
//! # Errors
//!
//! Every stage fails fast with a [`TabloidError`]; there is no partial
//! output. See [`ErrorKind`] for the broad categories.

mod column;
mod decompose;
mod error;
mod eval;
mod filter;
mod key;
mod pipeline;
mod project;
mod segment;

// Re-export public API
pub use column::{Column, ColumnEnd, ColumnRange, Row, Table};
pub use decompose::decompose;
pub use error::{ErrorKind, EvaluationError, Result, TabloidError};
pub use eval::{Evaluator, Value};
pub use filter::filter;
pub use key::normalize_key;
pub use pipeline::Pipeline;
pub use project::project;
pub use segment::{segment_header, MIN_COLUMN_GAP};
