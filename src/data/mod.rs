//! Data model: scalar values and typed columns

mod column;
mod value;

pub use column::Column;
pub use value::{DataType, Value};
