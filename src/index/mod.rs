//! Maintained sort indexes

mod sorted;

pub use sorted::SortedIndex;
