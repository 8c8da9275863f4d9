//! Column, table and row types.
//!
//! A [`Table`] is column oriented: every [`Column`] carries its title, its
//! expression key, the character range it occupies on each input line and
//! the values found in that range. Rows only exist as an index shared by
//! all columns, and are materialized as a [`Row`] when a filter needs them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// End of a column's character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnEnd {
    /// Exclusive character index where the next column starts.
    At(usize),
    /// The column extends to the end of every line.
    EndOfLine,
}

/// Half-open character range `[start, end)` a column occupies on each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnRange {
    pub start: usize,
    pub end: ColumnEnd,
}

impl ColumnRange {
    /// Creates a new range.
    pub fn new(start: usize, end: ColumnEnd) -> Self {
        Self { start, end }
    }

    /// Returns `true` if this range extends to the end of the line.
    pub fn is_end_of_line(&self) -> bool {
        self.end == ColumnEnd::EndOfLine
    }

    /// Checks whether a line of `length` characters can fill this range.
    pub fn fits(&self, length: usize) -> bool {
        if self.start >= length {
            return false;
        }
        match self.end {
            ColumnEnd::At(end) => end <= length,
            ColumnEnd::EndOfLine => true,
        }
    }

    /// Returns the trimmed text of `line` within this range.
    ///
    /// Indexes count characters, not bytes. The caller is expected to have
    /// checked [`fits`](Self::fits) first; out of range positions clamp to
    /// the end of the line.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let from = byte_offset(line, self.start);
        let to = match self.end {
            ColumnEnd::At(end) => byte_offset(line, end),
            ColumnEnd::EndOfLine => line.len(),
        };
        line[from..to].trim()
    }
}

// 1-based, inclusive, for people reading error messages.
impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            ColumnEnd::At(end) => write!(f, "characters {} and {}", self.start + 1, end),
            ColumnEnd::EndOfLine => {
                write!(f, "characters {} and the end of the line", self.start + 1)
            }
        }
    }
}

fn byte_offset(line: &str, chars: usize) -> usize {
    line.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

/// A single column of a parsed table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Title as it appears in the header, trimmed.
    pub title: String,
    /// Expression-safe identifier derived from the title.
    pub key: String,
    /// 1-based position in the header.
    pub position: usize,
    /// Character range on each line.
    pub range: ColumnRange,
    values: Arc<[String]>,
}

impl Column {
    /// Creates a column with no values.
    pub fn new(title: impl Into<String>, position: usize, range: ColumnRange) -> Self {
        let title = title.into();
        Self {
            key: crate::normalize_key(&title),
            title,
            position,
            range,
            values: Arc::from(Vec::new()),
        }
    }

    /// Returns a copy of this column's metadata with the given values.
    pub fn with_values(&self, values: Vec<String>) -> Self {
        Self {
            title: self.title.clone(),
            key: self.key.clone(),
            position: self.position,
            range: self.range,
            values: Arc::from(values),
        }
    }

    /// Values in row order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value at `row` (0-based).
    pub fn value(&self, row: usize) -> Option<&str> {
        self.values.get(row).map(String::as_str)
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the column has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if both columns share the same value storage.
    pub fn shares_values_with(&self, other: &Column) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

/// An ordered set of columns with equally long value lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consumes the table, returning its columns.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Returns `true` if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column by its normalized key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Column titles in display order.
    pub fn titles(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.title.as_str()).collect()
    }

    /// Column keys in display order.
    pub fn keys(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.key.as_str()).collect()
    }

    /// Builds the name→value mapping for row `index` (0-based).
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        if index >= self.row_count() {
            return None;
        }
        let values = self
            .columns
            .iter()
            .filter_map(|c| c.value(index).map(|v| (c.key.as_str(), v)))
            .collect();
        Some(Row { index, values })
    }
}

impl IntoIterator for Table {
    type Item = Column;
    type IntoIter = std::vec::IntoIter<Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// One row of a table, keyed by normalized column key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    index: usize,
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Row<'a> {
    /// Builds a row from key/value pairs.
    pub fn from_pairs(index: usize, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            index,
            values: pairs.into_iter().collect(),
        }
    }

    /// 0-based row index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of the column with the given key.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied()
    }

    /// Iterates over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
