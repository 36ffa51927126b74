//! Sort index: a cached permutation for a fixed key-set

use parking_lot::RwLock;

use crate::sort::Permutation;
use crate::table::Table;
use crate::{OrdError, Result};

/// A declared sort index over a fixed set of key columns.
///
/// The cached permutation is stamped with the contributing columns'
/// version counters and the row count at computation time; any mismatch
/// on a later query forces a full recomputation through the shared
/// extract + lexsort pipeline. A stale permutation is never served.
#[derive(Debug)]
pub struct SortedIndex {
    keys: Vec<String>,
    cache: RwLock<Option<CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    permutation: Permutation,
    column_versions: Vec<u64>,
    row_count: usize,
}

impl SortedIndex {
    pub(crate) fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cache: RwLock::new(None),
        }
    }

    /// Key columns this index orders by, most significant first
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub(crate) fn matches(&self, keys: &[&str]) -> bool {
        self.keys.len() == keys.len() && self.keys.iter().zip(keys).all(|(a, &b)| a == b)
    }

    /// Serve the permutation, recomputing first if any key column was
    /// mutated or the row count changed since it was cached.
    pub(crate) fn sorted_data(&self, table: &Table) -> Result<Permutation> {
        let column_versions = table.column_versions(&self.keys)?;
        let row_count = table.row_count();

        if let Some(entry) = self.cache.read().as_ref() {
            if entry.column_versions == column_versions && entry.row_count == row_count {
                log::debug!("sort index hit for keys {:?}", self.keys);
                return Ok(entry.permutation.clone());
            }
        }

        log::debug!("recomputing sort index for keys {:?}", self.keys);
        let key_refs: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        let permutation = table.argsort(&key_refs)?;
        *self.cache.write() = Some(CacheEntry {
            permutation: permutation.clone(),
            column_versions,
            row_count,
        });
        Ok(permutation)
    }
}

impl Table {
    /// Declare a sort index on `keys` (most significant first). The
    /// key-set is validated eagerly; redeclaring an existing key-set is a
    /// no-op that keeps any cached permutation.
    pub fn add_index(&mut self, keys: &[&str]) -> Result<()> {
        // surfaces unknown, duplicate and unsortable keys now rather than
        // at first query
        crate::sort::extract_sort_keys(self, keys)?;
        if self.indexes.iter().any(|index| index.matches(keys)) {
            return Ok(());
        }
        self.indexes
            .push(SortedIndex::new(keys.iter().map(|&k| k.to_string()).collect()));
        Ok(())
    }

    /// Drop the index on `keys`; returns whether one existed
    pub fn drop_index(&mut self, keys: &[&str]) -> bool {
        let before = self.indexes.len();
        self.indexes.retain(|index| !index.matches(keys));
        self.indexes.len() != before
    }

    /// The sorted permutation for a declared key-set, cached across calls
    /// and recomputed only after mutation of a contributing column or a
    /// row-count change.
    pub fn sorted_data(&self, keys: &[&str]) -> Result<Permutation> {
        let index = self
            .indexes
            .iter()
            .find(|index| index.matches(keys))
            .ok_or_else(|| OrdError::UnknownIndex(keys.join(", ")))?;
        index.sorted_data(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Value};

    fn indexed_table() -> Table {
        let mut table = Table::new();
        table
            .with_column("k", Column::from(vec![3i64, 1, 2]))
            .unwrap();
        table
            .with_column("other", Column::from(vec![0i64, 0, 0]))
            .unwrap();
        table.add_index(&["k"]).unwrap();
        table
    }

    #[test]
    fn test_sorted_data_matches_argsort() {
        let table = indexed_table();
        assert_eq!(
            table.sorted_data(&["k"]).unwrap(),
            table.argsort(&["k"]).unwrap()
        );
    }

    #[test]
    fn test_undeclared_index() {
        let table = indexed_table();
        let err = table.sorted_data(&["other"]).unwrap_err();
        assert!(matches!(err, OrdError::UnknownIndex(_)));
    }

    #[test]
    fn test_invalid_key_set_rejected_at_declaration() {
        let mut table = indexed_table();
        assert!(matches!(
            table.add_index(&["missing"]).unwrap_err(),
            OrdError::UnknownColumn(_)
        ));
        assert!(matches!(
            table.add_index(&["k", "k"]).unwrap_err(),
            OrdError::DuplicateKey(_)
        ));
    }

    #[test]
    fn test_key_mutation_invalidates() {
        let mut table = indexed_table();
        assert_eq!(table.sorted_data(&["k"]).unwrap(), vec![1, 2, 0]);

        // move row 0's key below everything else
        table.set_value("k", 0, Value::Int64(0)).unwrap();
        assert_eq!(table.sorted_data(&["k"]).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_non_key_mutation_keeps_cache_valid() {
        let mut table = indexed_table();
        let before = table.sorted_data(&["k"]).unwrap();
        table.set_value("other", 1, Value::Int64(9)).unwrap();
        assert_eq!(table.sorted_data(&["k"]).unwrap(), before);
    }

    #[test]
    fn test_row_count_change_invalidates() {
        let mut table = indexed_table();
        table.sorted_data(&["k"]).unwrap();
        table
            .push_row(vec![Value::Int64(0), Value::Int64(0)])
            .unwrap();
        assert_eq!(table.sorted_data(&["k"]).unwrap(), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_drop_index() {
        let mut table = indexed_table();
        assert!(table.drop_index(&["k"]));
        assert!(!table.drop_index(&["k"]));
        assert!(matches!(
            table.sorted_data(&["k"]).unwrap_err(),
            OrdError::UnknownIndex(_)
        ));
    }

    #[test]
    fn test_group_by_serves_and_warms_declared_index() {
        let table = indexed_table();
        let groups = table.group_by(&["k"]).unwrap();
        assert_eq!(groups.permutation(), &vec![1, 2, 0]);

        // grouping went through the index, so the cache is now populated
        let index = table.indexes.iter().find(|ix| ix.matches(&["k"])).unwrap();
        let cache = index.cache.read();
        let entry = cache.as_ref().unwrap();
        assert_eq!(entry.permutation, vec![1, 2, 0]);
        assert_eq!(entry.row_count, 3);
    }

    #[test]
    fn test_redeclaration_is_idempotent() {
        let mut table = indexed_table();
        table.add_index(&["k"]).unwrap();
        assert_eq!(table.indexes.len(), 1);
    }
}
