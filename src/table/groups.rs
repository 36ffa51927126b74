//! Group partitioning: maximal runs of equal key-tuples under a sort

use std::cmp::Ordering;

use arrow::array::{Array, ArrayRef, UInt32Array};
use arrow::compute::take;

use super::Table;
use crate::sort::{extract_sort_keys, key_comparator, lexsort_indices, Permutation, SortKind};
use crate::Result;

/// Result of grouping a table by key columns.
///
/// `boundaries` partitions the permutation into maximal runs of rows with
/// equal key-tuples: group `i` covers `permutation[boundaries[i]..boundaries[i + 1]]`.
/// `keys` holds one representative row per group (key columns only).
#[derive(Debug)]
pub struct TableGroups {
    permutation: Permutation,
    boundaries: Vec<usize>,
    keys: Table,
}

impl TableGroups {
    /// The sort permutation the grouping is built on; identical to
    /// [`Table::argsort`] for the same keys.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Group boundary offsets: monotone, starting at 0, ending at the row
    /// count. An empty table yields `[0, 0]`.
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// One representative key row per group, in group order
    pub fn keys(&self) -> &Table {
        &self.keys
    }

    pub fn num_groups(&self) -> usize {
        if self.permutation.is_empty() {
            0
        } else {
            self.boundaries.len() - 1
        }
    }

    /// Row indices (into the parent table) of the `group`-th group
    pub fn group_indices(&self, group: usize) -> &[u32] {
        &self.permutation[self.boundaries[group]..self.boundaries[group + 1]]
    }
}

/// Result of grouping a bare array by its own values
#[derive(Debug)]
pub struct ArrayGroups {
    pub permutation: Permutation,
    pub boundaries: Vec<usize>,
    /// One representative value per group, in group order
    pub keys: ArrayRef,
}

impl Table {
    /// Group rows by the given key columns.
    ///
    /// The permutation is computed exactly as [`Table::argsort`] computes
    /// it; if a sort index is declared on the same key-set its cached
    /// permutation is served instead of recomputing. The permuted key
    /// arrays are then walked once, splitting a new group wherever the
    /// key-tuple changes. At least one key is required
    /// ([`OrdError::EmptyKeys`]): with no keys there is no key-tuple to
    /// partition on and the representative-keys table would be shapeless.
    pub fn group_by(&self, keys: &[&str]) -> Result<TableGroups> {
        if keys.is_empty() {
            return Err(crate::OrdError::EmptyKeys);
        }
        let arrays = extract_sort_keys(self, keys)?;

        let perm = match self.indexes.iter().find(|index| index.matches(keys)) {
            Some(index) => index.sorted_data(self)?,
            None => {
                let mut primary_last = arrays.clone();
                primary_last.reverse();
                lexsort_indices(&primary_last, self.row_count(), SortKind::Auto)?
            }
        };

        let boundaries = detect_boundaries(&arrays, &perm)?;
        log::debug!(
            "grouped {} rows by {:?} into {} groups",
            self.row_count(),
            keys,
            boundaries.len() - 1
        );

        let starts = group_starts(&boundaries, &perm);
        let mut keys_table = Table::new();
        for &name in keys {
            // extraction already proved the column exists
            let column = self.column(name).ok_or_else(|| {
                crate::OrdError::UnknownColumn(name.to_string())
            })?;
            keys_table.with_column(name, column.take(&starts))?;
        }

        Ok(TableGroups {
            permutation: perm,
            boundaries,
            keys: keys_table,
        })
    }
}

/// Group a bare array by its own values: the single-key case with no
/// table involved. Representative keys come back as an array of the same
/// type, one entry per group.
pub fn group_by_array(array: &ArrayRef) -> Result<ArrayGroups> {
    let keys = std::slice::from_ref(array);
    let perm = lexsort_indices(keys, array.len(), SortKind::Auto)?;
    let boundaries = detect_boundaries(keys, &perm)?;

    let starts = UInt32Array::from(group_starts(&boundaries, &perm));
    let group_keys = take(array.as_ref(), &starts, None)?;

    Ok(ArrayGroups {
        permutation: perm,
        boundaries,
        keys: group_keys,
    })
}

/// Boundary offsets of maximal equal-key runs within the permuted rows.
/// Key significance is irrelevant here: rows are in the same group only if
/// every key array agrees.
fn detect_boundaries(arrays: &[ArrayRef], perm: &Permutation) -> Result<Vec<usize>> {
    let n = perm.len();
    if n == 0 {
        return Ok(vec![0, 0]);
    }
    let comparators = arrays
        .iter()
        .map(|array| key_comparator(array.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let mut boundaries = Vec::with_capacity(8);
    boundaries.push(0);
    for i in 1..n {
        let (prev, this) = (perm[i - 1] as usize, perm[i] as usize);
        if comparators
            .iter()
            .any(|cmp| cmp(prev, this) != Ordering::Equal)
        {
            boundaries.push(i);
        }
    }
    boundaries.push(n);
    Ok(boundaries)
}

/// Parent-table row index of each group's first (representative) row
fn group_starts(boundaries: &[usize], perm: &Permutation) -> Vec<u32> {
    if perm.is_empty() {
        return Vec::new();
    }
    boundaries[..boundaries.len() - 1]
        .iter()
        .map(|&offset| perm[offset])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Value};
    use arrow::array::{Int64Array, StringArray};
    use std::sync::Arc;

    #[test]
    fn test_group_by_repeated_values() {
        let mut table = Table::new();
        table
            .with_column("tag", Column::from(vec!["a", "a", "b"]))
            .unwrap();

        let groups = table.group_by(&["tag"]).unwrap();
        assert_eq!(groups.boundaries(), &[0, 2, 3]);
        assert_eq!(groups.num_groups(), 2);
        assert_eq!(groups.keys().row_count(), 2);
        assert_eq!(
            groups.keys().value("tag", 0).unwrap(),
            Value::Utf8("a".into())
        );
        assert_eq!(
            groups.keys().value("tag", 1).unwrap(),
            Value::Utf8("b".into())
        );
        assert_eq!(groups.group_indices(0), &[0, 1]);
        assert_eq!(groups.group_indices(1), &[2]);
    }

    #[test]
    fn test_group_by_unsorted_input() {
        let mut table = Table::new();
        table
            .with_column("k", Column::from(vec![2i64, 1, 2, 1, 3]))
            .unwrap();

        let groups = table.group_by(&["k"]).unwrap();
        assert_eq!(groups.permutation(), &vec![1, 3, 0, 2, 4]);
        assert_eq!(groups.boundaries(), &[0, 2, 4, 5]);
        let keys: Vec<_> = (0..3)
            .map(|i| groups.keys().value("k", i).unwrap())
            .collect();
        assert_eq!(
            keys,
            vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]
        );
    }

    #[test]
    fn test_group_by_multiple_keys() {
        let mut table = Table::new();
        table
            .with_column("a", Column::from(vec![1i64, 1, 2, 1]))
            .unwrap();
        table
            .with_column("b", Column::from(vec!["x", "y", "x", "x"]))
            .unwrap();

        let groups = table.group_by(&["a", "b"]).unwrap();
        // (1, x) x2, (1, y), (2, x)
        assert_eq!(groups.boundaries(), &[0, 2, 3, 4]);
        assert_eq!(groups.keys().column_count(), 2);
        assert_eq!(groups.keys().value("a", 2).unwrap(), Value::Int64(2));
    }

    #[test]
    fn test_group_by_all_equal_single_group() {
        let mut table = Table::new();
        table
            .with_column("k", Column::from(vec![5i64, 5, 5]))
            .unwrap();
        let groups = table.group_by(&["k"]).unwrap();
        assert_eq!(groups.boundaries(), &[0, 3]);
        assert_eq!(groups.num_groups(), 1);
    }

    #[test]
    fn test_group_by_rejects_empty_key_list() {
        let mut table = Table::new();
        table.with_column("k", Column::from(vec![1i64])).unwrap();
        let err = table.group_by(&[]).unwrap_err();
        assert!(matches!(err, crate::OrdError::EmptyKeys));
    }

    #[test]
    fn test_group_by_empty_table() {
        let mut table = Table::new();
        table
            .with_column("k", Column::from(Vec::<i64>::new()))
            .unwrap();
        let groups = table.group_by(&["k"]).unwrap();
        assert_eq!(groups.boundaries(), &[0, 0]);
        assert_eq!(groups.num_groups(), 0);
        assert_eq!(groups.keys().row_count(), 0);
    }

    #[test]
    fn test_group_by_array() {
        let array: ArrayRef = Arc::new(StringArray::from(vec!["b", "a", "b"]));
        let groups = group_by_array(&array).unwrap();
        assert_eq!(groups.permutation, vec![1, 0, 2]);
        assert_eq!(groups.boundaries, vec![0, 1, 3]);

        let keys = groups
            .keys
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.value(0), "a");
        assert_eq!(keys.value(1), "b");
    }

    #[test]
    fn test_group_by_array_empty() {
        let array: ArrayRef = Arc::new(Int64Array::from(Vec::<i64>::new()));
        let groups = group_by_array(&array).unwrap();
        assert_eq!(groups.boundaries, vec![0, 0]);
        assert_eq!(groups.keys.len(), 0);
    }

    #[test]
    fn test_grouping_consistency_with_argsort() {
        let mut table = Table::new();
        table
            .with_column("k", Column::from(vec![3i64, 1, 3, 1, 2]))
            .unwrap();
        let groups = table.group_by(&["k"]).unwrap();
        assert_eq!(groups.permutation(), &table.argsort(&["k"]).unwrap());

        // concatenating the groups reproduces the permutation
        let mut rebuilt = Vec::new();
        for g in 0..groups.num_groups() {
            rebuilt.extend_from_slice(groups.group_indices(g));
        }
        assert_eq!(&rebuilt, groups.permutation());
    }
}
