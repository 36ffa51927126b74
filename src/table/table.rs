//! Columnar table: ordered named columns of equal length

use ahash::AHashMap;

use crate::data::{Column, DataType, Value};
use crate::index::SortedIndex;
use crate::sort::Permutation;
use crate::{OrdError, Result};

/// An ordered collection of named columns, all of equal length.
///
/// The table owns its columns and any declared sort indexes. All cell
/// mutation goes through table methods so column version counters stay
/// accurate for index staleness checks.
#[derive(Debug, Default)]
pub struct Table {
    names: Vec<String>,
    lookup: AHashMap<String, usize>,
    columns: Vec<Column>,
    pub(crate) indexes: Vec<SortedIndex>,
}

impl Table {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (all columns share this length)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.lookup.get(name).map(|&i| &self.columns[i])
    }

    /// Add an empty column of the given type. Only valid while the table
    /// has no rows; populated tables take columns via [`Table::with_column`].
    pub fn add_column(&mut self, name: &str, dtype: DataType) -> Result<()> {
        if self.row_count() > 0 {
            return Err(OrdError::LengthMismatch {
                expected: self.row_count(),
                actual: 0,
            });
        }
        self.with_column(name, Column::new(dtype))
    }

    /// Add a populated column; its length must match the current row count
    /// (any length is accepted for the first column).
    pub fn with_column(&mut self, name: &str, column: Column) -> Result<()> {
        if self.lookup.contains_key(name) {
            return Err(OrdError::ColumnExists(name.to_string()));
        }
        if !self.columns.is_empty() && column.len() != self.row_count() {
            return Err(OrdError::LengthMismatch {
                expected: self.row_count(),
                actual: column.len(),
            });
        }
        self.lookup.insert(name.to_string(), self.columns.len());
        self.names.push(name.to_string());
        self.columns.push(column);
        Ok(())
    }

    /// Append one row; `values` must line up with the columns in order
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(OrdError::LengthMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        // Validate every value before touching any column, so a failed
        // push leaves the table unchanged.
        for (i, (column, value)) in self.columns.iter().zip(&values).enumerate() {
            if column.data_type() != value.data_type() {
                return Err(OrdError::TypeMismatch {
                    column: self.names[i].clone(),
                    expected: column.data_type(),
                    got: value.data_type(),
                });
            }
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value)?;
        }
        Ok(())
    }

    /// Read the cell at (`name`, `row`)
    pub fn value(&self, name: &str, row: usize) -> Result<Value> {
        let column = self
            .column(name)
            .ok_or_else(|| OrdError::UnknownColumn(name.to_string()))?;
        column.get(row).ok_or(OrdError::RowOutOfBounds {
            row,
            rows: self.row_count(),
        })
    }

    /// Overwrite the cell at (`name`, `row`) in place
    pub fn set_value(&mut self, name: &str, row: usize, value: Value) -> Result<()> {
        let index = *self
            .lookup
            .get(name)
            .ok_or_else(|| OrdError::UnknownColumn(name.to_string()))?;
        self.columns[index]
            .set(row, value)
            .map_err(|err| match err {
                OrdError::TypeMismatch { expected, got, .. } => OrdError::TypeMismatch {
                    column: name.to_string(),
                    expected,
                    got,
                },
                other => other,
            })
    }

    /// Reorder every column by the same permutation
    pub(crate) fn apply_permutation(&mut self, perm: &Permutation) {
        for column in &mut self.columns {
            column.apply_permutation(perm);
        }
    }

    /// Version stamps of the named columns, used by sort indexes
    pub(crate) fn column_versions(&self, keys: &[String]) -> Result<Vec<u64>> {
        keys.iter()
            .map(|name| {
                self.column(name)
                    .map(Column::version)
                    .ok_or_else(|| OrdError::UnknownColumn(name.clone()))
            })
            .collect()
    }
}
