//! Sort-key extraction: column names to a flat list of comparable arrays

use ahash::AHashSet;
use arrow::array::{Array, ArrayRef};

use crate::table::Table;
use crate::{OrdError, Result};

/// Resolve `keys` against `table` and flatten each column's sortable
/// decomposition into one ordered array list.
///
/// Keys are given most significant first; within the output, each column
/// contributes its arrays in canonical component order, so the list as a
/// whole is also most-significant-first. An empty `keys` slice yields an
/// empty list, which downstream sorting treats as "no ordering requested".
///
/// Fails with [`OrdError::DuplicateKey`] on a repeated name,
/// [`OrdError::UnknownColumn`] when a name does not resolve,
/// [`OrdError::NotSortable`] when a column lacks the sortable capability,
/// and [`OrdError::LengthMismatch`] if a column's arrays disagree with the
/// table's row count. Never mutates the table.
pub fn extract_sort_keys(table: &Table, keys: &[&str]) -> Result<Vec<ArrayRef>> {
    let num_rows = table.row_count();
    let mut seen = AHashSet::with_capacity(keys.len());
    let mut arrays = Vec::with_capacity(keys.len());

    for &name in keys {
        if !seen.insert(name) {
            return Err(OrdError::DuplicateKey(name.to_string()));
        }
        let column = table
            .column(name)
            .ok_or_else(|| OrdError::UnknownColumn(name.to_string()))?;
        let decomposed = column
            .sort_keys()
            .ok_or_else(|| OrdError::NotSortable(name.to_string()))?;
        for array in decomposed {
            if array.len() != num_rows {
                return Err(OrdError::LengthMismatch {
                    expected: num_rows,
                    actual: array.len(),
                });
            }
            arrays.push(array);
        }
    }
    Ok(arrays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn sample_table() -> Table {
        let mut table = Table::new();
        table
            .with_column("id", Column::from(vec![3i64, 1, 2]))
            .unwrap();
        table
            .with_column("when", Column::time(vec![0, 0, 1], vec![2, 1, 0]).unwrap())
            .unwrap();
        table
            .with_column("payload", Column::from(vec![vec![0u8], vec![1], vec![2]]))
            .unwrap();
        table
    }

    #[test]
    fn test_flattens_composite_columns() {
        let table = sample_table();
        let arrays = extract_sort_keys(&table, &["id", "when"]).unwrap();
        // one array for id, two for the split-precision time column
        assert_eq!(arrays.len(), 3);
        assert!(arrays.iter().all(|a| a.len() == 3));
    }

    #[test]
    fn test_empty_keys() {
        let table = sample_table();
        assert!(extract_sort_keys(&table, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_column() {
        let table = sample_table();
        let err = extract_sort_keys(&table, &["missing"]).unwrap_err();
        assert!(matches!(err, OrdError::UnknownColumn(name) if name == "missing"));
    }

    #[test]
    fn test_duplicate_key() {
        let table = sample_table();
        let err = extract_sort_keys(&table, &["id", "id"]).unwrap_err();
        assert!(matches!(err, OrdError::DuplicateKey(name) if name == "id"));
    }

    #[test]
    fn test_opaque_column_not_sortable() {
        let table = sample_table();
        let err = extract_sort_keys(&table, &["payload"]).unwrap_err();
        assert!(matches!(err, OrdError::NotSortable(name) if name == "payload"));
    }
}
