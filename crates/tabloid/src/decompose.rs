//! Row decomposition: slicing data lines into column values.

use crate::column::Table;
use crate::error::{Result, TabloidError};

/// Slices every data line into the columns of `table`.
///
/// Blank lines are skipped and do not count as rows. Every other line is cut
/// at each column's character range and the trimmed slice is appended to
/// that column's values, so row `n` of every column comes from the `n`th
/// non-blank line. Existing values in `table` are kept and new rows are
/// appended after them.
///
/// # Errors
///
/// [`TabloidError::ShortLine`] if a line does not reach a column's start, or
/// ends before a bounded column's end. Rows are numbered from 1, header
/// excluded.
///
/// # Example
///
/// ```
/// use tabloid::{decompose, segment_header};
///
/// let table = segment_header("NAME   STATUS    RESTARTS").unwrap();
/// let table = decompose(table, ["web      Running   0", "", "db       Failed    3"]).unwrap();
///
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.column("status").unwrap().values(), ["Running", "Failed"]);
/// ```
pub fn decompose<I>(table: Table, lines: I) -> Result<Table>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let columns = table.into_columns();
    let mut buffers: Vec<Vec<String>> = columns.iter().map(|c| c.values().to_vec()).collect();
    let mut rows = buffers.first().map(Vec::len).unwrap_or(0);

    for (number, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.trim().is_empty() {
            log::debug!("omitting empty row found in data line {}", number + 1);
            continue;
        }

        let length = line.chars().count();
        for column in &columns {
            if !column.range.fits(length) {
                return Err(TabloidError::ShortLine {
                    row: rows + 1,
                    column: column.title.clone(),
                    expected: column.range,
                    length,
                });
            }
        }

        for (column, values) in columns.iter().zip(buffers.iter_mut()) {
            values.push(column.range.slice(line).to_string());
        }
        rows += 1;
        log::trace!("parsed row {}: {:?}", rows, line);
    }

    log::debug!("rows parsed: {}", rows);

    let columns = columns
        .iter()
        .zip(buffers)
        .map(|(column, values)| column.with_values(values))
        .collect();
    Ok(Table::new(columns))
}
