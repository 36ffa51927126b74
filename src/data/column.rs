//! Typed column storage and the sortable-array capability

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};

use super::{DataType, Value};
use crate::{OrdError, Result};

/// Type-specific column storage
#[derive(Debug, Clone)]
enum ColumnData {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Utf8(Vec<String>),
    Bool(Vec<bool>),
    /// Split-precision instant: `secs` is the most significant component,
    /// `nanos` breaks ties within a second. Both vectors share one length.
    Time { secs: Vec<i64>, nanos: Vec<u32> },
    Blob(Vec<Vec<u8>>),
}

/// A typed column of values.
///
/// Every in-place mutation bumps [`Column::version`], which sort indexes
/// use to detect staleness. The ordering pipeline never inspects the
/// concrete variant: it only calls [`Column::sort_keys`].
#[derive(Debug, Clone)]
pub struct Column {
    data: ColumnData,
    version: u64,
}

impl Column {
    /// Create an empty column of the given type
    pub fn new(dtype: DataType) -> Self {
        let data = match dtype {
            DataType::Int64 => ColumnData::Int64(Vec::new()),
            DataType::Float64 => ColumnData::Float64(Vec::new()),
            DataType::Utf8 => ColumnData::Utf8(Vec::new()),
            DataType::Bool => ColumnData::Bool(Vec::new()),
            DataType::Time => ColumnData::Time {
                secs: Vec::new(),
                nanos: Vec::new(),
            },
            DataType::Blob => ColumnData::Blob(Vec::new()),
        };
        Self { data, version: 0 }
    }

    /// Build a time column from parallel component vectors
    pub fn time(secs: Vec<i64>, nanos: Vec<u32>) -> Result<Self> {
        if secs.len() != nanos.len() {
            return Err(OrdError::LengthMismatch {
                expected: secs.len(),
                actual: nanos.len(),
            });
        }
        Ok(Self {
            data: ColumnData::Time { secs, nanos },
            version: 0,
        })
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Int64(data) => data.len(),
            ColumnData::Float64(data) => data.len(),
            ColumnData::Utf8(data) => data.len(),
            ColumnData::Bool(data) => data.len(),
            ColumnData::Time { secs, .. } => secs.len(),
            ColumnData::Blob(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match &self.data {
            ColumnData::Int64(_) => DataType::Int64,
            ColumnData::Float64(_) => DataType::Float64,
            ColumnData::Utf8(_) => DataType::Utf8,
            ColumnData::Bool(_) => DataType::Bool,
            ColumnData::Time { .. } => DataType::Time,
            ColumnData::Blob(_) => DataType::Blob,
        }
    }

    /// Mutation counter used by sort indexes for staleness checks
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the value at `index`, or `None` past the end
    pub fn get(&self, index: usize) -> Option<Value> {
        if index >= self.len() {
            return None;
        }
        let value = match &self.data {
            ColumnData::Int64(data) => Value::Int64(data[index]),
            ColumnData::Float64(data) => Value::Float64(data[index]),
            ColumnData::Utf8(data) => Value::Utf8(data[index].clone()),
            ColumnData::Bool(data) => Value::Bool(data[index]),
            ColumnData::Time { secs, nanos } => Value::Time {
                secs: secs[index],
                nanos: nanos[index],
            },
            ColumnData::Blob(data) => Value::Blob(data[index].clone()),
        };
        Some(value)
    }

    /// Append a value of the column's own type
    pub fn push(&mut self, value: Value) -> Result<()> {
        match (&mut self.data, value) {
            (ColumnData::Int64(data), Value::Int64(v)) => data.push(v),
            (ColumnData::Float64(data), Value::Float64(v)) => data.push(v),
            (ColumnData::Utf8(data), Value::Utf8(v)) => data.push(v),
            (ColumnData::Bool(data), Value::Bool(v)) => data.push(v),
            (ColumnData::Time { secs, nanos }, Value::Time { secs: s, nanos: n }) => {
                secs.push(s);
                nanos.push(n);
            }
            (ColumnData::Blob(data), Value::Blob(v)) => data.push(v),
            (_, value) => {
                return Err(OrdError::TypeMismatch {
                    column: String::new(),
                    expected: self.data_type(),
                    got: value.data_type(),
                })
            }
        }
        self.version += 1;
        Ok(())
    }

    /// Overwrite the value at `index` in place
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        if index >= self.len() {
            return Err(OrdError::RowOutOfBounds {
                row: index,
                rows: self.len(),
            });
        }
        match (&mut self.data, value) {
            (ColumnData::Int64(data), Value::Int64(v)) => data[index] = v,
            (ColumnData::Float64(data), Value::Float64(v)) => data[index] = v,
            (ColumnData::Utf8(data), Value::Utf8(v)) => data[index] = v,
            (ColumnData::Bool(data), Value::Bool(v)) => data[index] = v,
            (ColumnData::Time { secs, nanos }, Value::Time { secs: s, nanos: n }) => {
                secs[index] = s;
                nanos[index] = n;
            }
            (ColumnData::Blob(data), Value::Blob(v)) => data[index] = v,
            (_, value) => {
                return Err(OrdError::TypeMismatch {
                    column: String::new(),
                    expected: self.data_type(),
                    got: value.data_type(),
                })
            }
        }
        self.version += 1;
        Ok(())
    }

    /// The sortable-array capability.
    ///
    /// Returns the column's canonical decomposition into comparable arrays,
    /// most significant component first, or `None` for opaque column kinds.
    /// This is the only interface the ordering pipeline requires from a
    /// column; composite kinds plug into sorting, grouping and indexing by
    /// implementing it once.
    pub fn sort_keys(&self) -> Option<Vec<ArrayRef>> {
        let arrays: Vec<ArrayRef> = match &self.data {
            ColumnData::Int64(data) => {
                vec![Arc::new(Int64Array::from(data.clone()))]
            }
            ColumnData::Float64(data) => {
                vec![Arc::new(Float64Array::from(data.clone()))]
            }
            ColumnData::Utf8(data) => {
                vec![Arc::new(StringArray::from_iter_values(data.iter()))]
            }
            ColumnData::Bool(data) => {
                vec![Arc::new(BooleanArray::from(data.clone()))]
            }
            ColumnData::Time { secs, nanos } => vec![
                Arc::new(Int64Array::from(secs.clone())),
                Arc::new(Int64Array::from_iter_values(
                    nanos.iter().map(|&n| n as i64),
                )),
            ],
            ColumnData::Blob(_) => return None,
        };
        Some(arrays)
    }

    /// New column holding `self[indices[0]], self[indices[1]], ...`
    pub fn take(&self, indices: &[u32]) -> Column {
        let data = match &self.data {
            ColumnData::Int64(data) => {
                ColumnData::Int64(indices.iter().map(|&i| data[i as usize]).collect())
            }
            ColumnData::Float64(data) => {
                ColumnData::Float64(indices.iter().map(|&i| data[i as usize]).collect())
            }
            ColumnData::Utf8(data) => {
                ColumnData::Utf8(indices.iter().map(|&i| data[i as usize].clone()).collect())
            }
            ColumnData::Bool(data) => {
                ColumnData::Bool(indices.iter().map(|&i| data[i as usize]).collect())
            }
            ColumnData::Time { secs, nanos } => ColumnData::Time {
                secs: indices.iter().map(|&i| secs[i as usize]).collect(),
                nanos: indices.iter().map(|&i| nanos[i as usize]).collect(),
            },
            ColumnData::Blob(data) => {
                ColumnData::Blob(indices.iter().map(|&i| data[i as usize].clone()).collect())
            }
        };
        Column { data, version: 0 }
    }

    /// Reorder this column in place; `perm` must be a permutation of
    /// `[0, len)`.
    pub(crate) fn apply_permutation(&mut self, perm: &[u32]) {
        self.data = self.take(perm).data;
        self.version += 1;
    }
}

impl From<Vec<i64>> for Column {
    fn from(data: Vec<i64>) -> Self {
        Column {
            data: ColumnData::Int64(data),
            version: 0,
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(data: Vec<f64>) -> Self {
        Column {
            data: ColumnData::Float64(data),
            version: 0,
        }
    }
}

impl From<Vec<String>> for Column {
    fn from(data: Vec<String>) -> Self {
        Column {
            data: ColumnData::Utf8(data),
            version: 0,
        }
    }
}

impl From<Vec<&str>> for Column {
    fn from(data: Vec<&str>) -> Self {
        Column {
            data: ColumnData::Utf8(data.into_iter().map(str::to_string).collect()),
            version: 0,
        }
    }
}

impl From<Vec<bool>> for Column {
    fn from(data: Vec<bool>) -> Self {
        Column {
            data: ColumnData::Bool(data),
            version: 0,
        }
    }
}

impl From<Vec<Vec<u8>>> for Column {
    fn from(data: Vec<Vec<u8>>) -> Self {
        Column {
            data: ColumnData::Blob(data),
            version: 0,
        }
    }
}
