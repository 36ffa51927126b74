//! Key extraction and the shared multi-key argsort primitive

mod extract;
mod lexsort;

pub use extract::extract_sort_keys;
pub use lexsort::{lexsort_indices, SortKind, PARALLEL_SORT_THRESHOLD};

pub(crate) use lexsort::key_comparator;

/// A bijection on row positions: `perm[i]` is the source row that lands
/// at output position `i`.
pub type Permutation = Vec<u32>;
