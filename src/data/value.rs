//! Scalar values and data types

use std::fmt;

/// Data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int64,
    Float64,
    Utf8,
    Bool,
    /// Split-precision instant: whole seconds plus a sub-second
    /// nanosecond component. Orders by seconds first, nanoseconds second.
    Time,
    /// Opaque byte payload with no defined ordering
    Blob,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Utf8 => "utf8",
            DataType::Bool => "bool",
            DataType::Time => "time",
            DataType::Blob => "blob",
        };
        f.write_str(name)
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int64(i64),
    Float64(f64),
    Utf8(String),
    Bool(bool),
    /// Invariant: `nanos < 1_000_000_000`. Use [`Value::time`] to build a
    /// normalized instant from arbitrary components.
    Time { secs: i64, nanos: u32 },
    Blob(Vec<u8>),
}

impl Value {
    /// Build a normalized `Time` value, carrying overflowing nanoseconds
    /// into the seconds component.
    pub fn time(secs: i64, nanos: u64) -> Value {
        let secs = secs + (nanos / 1_000_000_000) as i64;
        let nanos = (nanos % 1_000_000_000) as u32;
        Value::Time { secs, nanos }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Utf8(_) => DataType::Utf8,
            Value::Bool(_) => DataType::Bool,
            Value::Time { .. } => DataType::Time,
            Value::Blob(_) => DataType::Blob,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
