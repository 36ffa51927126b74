//! Stable lexicographic multi-key argsort over comparable arrays

use std::cmp::Ordering;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use rayon::prelude::*;

use super::Permutation;
use crate::{OrdError, Result};

/// Row count above which [`SortKind::Auto`] switches to the rayon path
pub const PARALLEL_SORT_THRESHOLD: usize = 50_000;

/// Algorithm hint for [`lexsort_indices`].
///
/// Purely a performance knob: every kind yields the identical permutation,
/// including tie-breaking. The parallel path restores stability with a
/// final row-index comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKind {
    /// Serial stable sort below [`PARALLEL_SORT_THRESHOLD`] rows, parallel above
    #[default]
    Auto,
    /// Always the serial stable sort
    Stable,
    /// Always the rayon parallel sort
    Parallel,
}

pub(crate) type KeyComparator<'a> = Box<dyn Fn(usize, usize) -> Ordering + Send + Sync + 'a>;

/// Total order on floats: every NaN sorts after every number, and NaNs
/// tie with each other. Intransitive comparisons would break the sort's
/// total-order requirement and make the serial and parallel paths
/// diverge.
fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// Build a row comparator for one key array. Floats order NaN last.
pub(crate) fn key_comparator(array: &dyn Array) -> Result<KeyComparator<'_>> {
    if let Some(arr) = array.as_any().downcast_ref::<Int64Array>() {
        return Ok(Box::new(move |a, b| arr.value(a).cmp(&arr.value(b))));
    }
    if let Some(arr) = array.as_any().downcast_ref::<Float64Array>() {
        return Ok(Box::new(move |a, b| compare_f64(arr.value(a), arr.value(b))));
    }
    if let Some(arr) = array.as_any().downcast_ref::<StringArray>() {
        return Ok(Box::new(move |a, b| arr.value(a).cmp(arr.value(b))));
    }
    if let Some(arr) = array.as_any().downcast_ref::<BooleanArray>() {
        return Ok(Box::new(move |a, b| arr.value(a).cmp(&arr.value(b))));
    }
    Err(OrdError::NotSortable(array.data_type().to_string()))
}

/// Stable lexicographic argsort of `num_rows` rows by `arrays`.
///
/// The *last* array is the primary sort key and the first the least
/// significant; callers holding keys in most-significant-first order
/// reverse the list before calling. An empty `arrays` list means no
/// ordering was requested and yields the identity permutation. Rows whose
/// key-tuples compare equal keep their original relative order.
///
/// Fails with [`OrdError::LengthMismatch`] if any array's length disagrees
/// with `num_rows`, and with [`OrdError::NotSortable`] for array types
/// without a defined row ordering.
pub fn lexsort_indices(arrays: &[ArrayRef], num_rows: usize, kind: SortKind) -> Result<Permutation> {
    for array in arrays {
        if array.len() != num_rows {
            return Err(OrdError::LengthMismatch {
                expected: num_rows,
                actual: array.len(),
            });
        }
    }

    let mut indices: Permutation = (0..num_rows as u32).collect();
    if arrays.is_empty() {
        return Ok(indices);
    }

    // Primary key last: walk the comparators back to front.
    let comparators = arrays
        .iter()
        .rev()
        .map(|array| key_comparator(array.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let tuple_cmp = |a: u32, b: u32| -> Ordering {
        for cmp in &comparators {
            match cmp(a as usize, b as usize) {
                Ordering::Equal => continue,
                order => return order,
            }
        }
        Ordering::Equal
    };

    let parallel = match kind {
        SortKind::Stable => false,
        SortKind::Parallel => true,
        SortKind::Auto => num_rows > PARALLEL_SORT_THRESHOLD,
    };
    log::trace!(
        "lexsort: {} keys, {} rows, parallel={}",
        arrays.len(),
        num_rows,
        parallel
    );

    if parallel {
        // Unstable sort plus index tiebreak is equivalent to a stable sort.
        indices.par_sort_unstable_by(|&a, &b| tuple_cmp(a, b).then_with(|| a.cmp(&b)));
    } else {
        indices.sort_by(|&a, &b| tuple_cmp(a, b));
    }
    Ok(indices)
}
