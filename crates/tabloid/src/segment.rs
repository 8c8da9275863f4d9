//! Header segmentation.
//!
//! Tools like `kubectl` and `docker` pad their columns with a tab writer,
//! leaving at least [`MIN_COLUMN_GAP`] spaces between the widest cell of a
//! column and the next one. Titles themselves may contain shorter runs
//! (`AGE GAP`, `NOMINATED NODE`), so only a run of the full width splits.

use std::collections::HashSet;

use crate::column::{Column, ColumnEnd, ColumnRange, Table};
use crate::error::{Result, TabloidError};

/// Minimum run of whitespace that separates two columns.
pub const MIN_COLUMN_GAP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InTitle,
    /// Inside a whitespace run of `len` characters.
    InGap { len: usize },
}

/// Infers columns and their boundaries from a header line.
///
/// The first column starts at character 0; every later column starts at the
/// first non-whitespace character after a gap of at least
/// [`MIN_COLUMN_GAP`] characters. Each column ends where the next one
/// starts, and the last one extends to the end of the line.
///
/// # Errors
///
/// - [`TabloidError::EmptyInput`] if the header is blank.
/// - [`TabloidError::DuplicateColumnTitle`] if two titles normalize to the
///   same key.
///
/// # Example
///
/// ```
/// use tabloid::{segment_header, ColumnEnd};
///
/// let table = segment_header("NAME   STATUS    RESTARTS").unwrap();
/// assert_eq!(table.keys(), vec!["name", "status", "restarts"]);
/// assert_eq!(table.columns()[1].range.start, 7);
/// assert_eq!(table.columns()[2].range.end, ColumnEnd::EndOfLine);
/// ```
pub fn segment_header(line: &str) -> Result<Table> {
    let line = line.trim_end();
    if line.trim_start().is_empty() {
        return Err(TabloidError::EmptyInput);
    }

    // (start, title) pairs; ranges are closed once every start is known.
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut start = 0;
    let mut title = String::new();
    let mut gap = String::new();
    let mut state = State::InTitle;

    for (index, c) in line.chars().enumerate() {
        state = match (state, c.is_whitespace()) {
            (State::InTitle, false) => {
                title.push(c);
                State::InTitle
            }
            (State::InTitle, true) => {
                gap.push(c);
                State::InGap { len: 1 }
            }
            (State::InGap { len }, true) => {
                gap.push(c);
                State::InGap { len: len + 1 }
            }
            (State::InGap { len }, false) => {
                if len >= MIN_COLUMN_GAP && !title.trim().is_empty() {
                    found.push((start, std::mem::take(&mut title)));
                    start = index;
                } else {
                    // Short run: the whitespace belongs to the title.
                    title.push_str(&gap);
                }
                gap.clear();
                title.push(c);
                State::InTitle
            }
        };
    }
    found.push((start, title));

    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(found.len());

    for (i, (start, title)) in found.iter().enumerate() {
        let end = match found.get(i + 1) {
            Some((next, _)) => ColumnEnd::At(*next),
            None => ColumnEnd::EndOfLine,
        };

        let column = Column::new(title.trim(), i + 1, ColumnRange::new(*start, end));
        if !seen.insert(column.key.clone()) {
            return Err(TabloidError::DuplicateColumnTitle {
                title: column.title,
            });
        }

        log::debug!(
            "found column named {:?} (key {:?}), located between {}",
            column.title,
            column.key,
            column.range
        );
        columns.push(column);
    }

    log::debug!("finished parsing columns, found: {}", columns.len());
    Ok(Table::new(columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(table: &Table) -> Vec<(usize, ColumnEnd)> {
        table
            .columns()
            .iter()
            .map(|c| (c.range.start, c.range.end))
            .collect()
    }

    #[test]
    fn kubectl_style_header() {
        let table = segment_header("NAME   READY   STATUS    %RESTART   AGE GAP").unwrap();

        assert_eq!(
            table.titles(),
            vec!["NAME", "READY", "STATUS", "%RESTART", "AGE GAP"]
        );
        assert_eq!(
            table.keys(),
            vec!["name", "ready", "status", "restart", "age_gap"]
        );
        assert_eq!(
            ranges(&table),
            vec![
                (0, ColumnEnd::At(7)),
                (7, ColumnEnd::At(15)),
                (15, ColumnEnd::At(25)),
                (25, ColumnEnd::At(36)),
                (36, ColumnEnd::EndOfLine),
            ]
        );
    }

    #[test]
    fn positions_are_one_based() {
        let table = segment_header("A   B   C").unwrap();
        let positions: Vec<usize> = table.columns().iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn short_runs_stay_inside_titles() {
        let table = segment_header("NAME  WITH  SPACES   NOMINATED NODE").unwrap();
        assert_eq!(table.titles(), vec!["NAME  WITH  SPACES", "NOMINATED NODE"]);
        assert_eq!(table.columns()[1].range.start, 21);
    }

    #[test]
    fn single_column() {
        let table = segment_header("NAME").unwrap();
        assert_eq!(ranges(&table), vec![(0, ColumnEnd::EndOfLine)]);
    }

    #[test]
    fn leading_and_trailing_whitespace() {
        let table = segment_header("   NAME   STATUS     ").unwrap();
        assert_eq!(table.titles(), vec!["NAME", "STATUS"]);
        assert_eq!(
            ranges(&table),
            vec![(0, ColumnEnd::At(10)), (10, ColumnEnd::EndOfLine)]
        );
    }

    #[test]
    fn tabs_count_as_gap() {
        let table = segment_header("NAME\t\t\tSTATUS").unwrap();
        assert_eq!(table.titles(), vec!["NAME", "STATUS"]);
        assert_eq!(table.columns()[1].range.start, 7);
    }

    #[test]
    fn multibyte_titles_use_character_positions() {
        let table = segment_header("ÉTAT   NOM").unwrap();
        assert_eq!(table.keys(), vec!["état", "nom"]);
        assert_eq!(table.columns()[1].range.start, 7);
    }

    #[test]
    fn empty_header_fails() {
        assert!(matches!(segment_header(""), Err(TabloidError::EmptyInput)));
        assert!(matches!(
            segment_header("     "),
            Err(TabloidError::EmptyInput)
        ));
    }

    #[test]
    fn duplicate_titles_fail() {
        let err = segment_header("NAME   STATUS   NAME").unwrap_err();
        match err {
            TabloidError::DuplicateColumnTitle { title } => assert_eq!(title, "NAME"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn titles_with_the_same_key_fail() {
        let err = segment_header("AGE GAP   age-gap").unwrap_err();
        match err {
            TabloidError::DuplicateColumnTitle { title } => assert_eq!(title, "age-gap"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
