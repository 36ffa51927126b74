//! ordbase — a columnar in-memory table with one ordering pipeline.
//!
//! Every consumer of row order goes through the same two steps: key
//! extraction (each column renders itself as one or more comparable
//! arrays) followed by a stable lexicographic argsort. Ad-hoc sorting
//! ([`Table::argsort`] / [`Table::sort`]), group partitioning
//! ([`Table::group_by`]) and maintained sort indexes
//! ([`Table::sorted_data`]) all produce identical permutations for
//! identical keys, including tie-breaking.

pub mod data;
pub mod index;
pub mod sort;
pub mod table;

// Re-export main types
pub use data::{Column, DataType, Value};
pub use index::SortedIndex;
pub use sort::{extract_sort_keys, lexsort_indices, Permutation, SortKind};
pub use table::{group_by_array, ArrayGroups, Table, TableGroups};

/// Ordering pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum OrdError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column already exists: {0}")]
    ColumnExists(String),

    #[error("duplicate sort key: {0}")]
    DuplicateKey(String),

    #[error("grouping requires at least one key column")]
    EmptyKeys,

    #[error("column has no sortable representation: {0}")]
    NotSortable(String),

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("type mismatch in column {column}: expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        got: DataType,
    },

    #[error("row {row} out of bounds for table with {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("no sort index declared for keys: {0}")]
    UnknownIndex(String),

    #[error("arrow compute error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, OrdError>;
