//! Table container and the ordering operations built on it

mod groups;
mod ordering;
mod table;

pub use groups::{group_by_array, ArrayGroups, TableGroups};
pub use table::Table;
