//! Column selection and reordering.

use crate::column::{Column, Table};
use crate::error::{Result, TabloidError};

/// Selects `names` from `table`, in the requested order.
///
/// Each name is matched against, in order of precedence, the exact title,
/// the title ignoring case, and the normalized key; the first column that
/// matches wins. An empty request returns every column in its original
/// order. Values are shared with `table`, not copied.
///
/// # Errors
///
/// [`TabloidError::ColumnNotFound`] if a name matches no column.
///
/// # Example
///
/// ```
/// use tabloid::{project, segment_header};
///
/// let table = segment_header("NAME   STATUS    RESTARTS").unwrap();
/// let table = project(&table, &["status", "NAME"]).unwrap();
/// assert_eq!(table.titles(), vec!["STATUS", "NAME"]);
/// ```
pub fn project<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    if names.is_empty() {
        return Ok(table.clone());
    }

    let columns = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            find_column(table.columns(), name)
                .cloned()
                .ok_or_else(|| TabloidError::ColumnNotFound {
                    name: name.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "selected columns: {:?}",
        columns.iter().map(|c| c.title.as_str()).collect::<Vec<_>>()
    );
    Ok(Table::new(columns))
}

fn find_column<'a>(columns: &'a [Column], name: &str) -> Option<&'a Column> {
    let lowered = name.to_lowercase();
    columns
        .iter()
        .find(|c| c.title == name)
        .or_else(|| columns.iter().find(|c| c.title.to_lowercase() == lowered))
        .or_else(|| columns.iter().find(|c| c.key == name))
}
