//! Public sort API: argsort and in-place sort

use super::Table;
use crate::sort::{extract_sort_keys, lexsort_indices, Permutation, SortKind};
use crate::Result;

impl Table {
    /// Permutation ordering rows by `keys`, ascending.
    ///
    /// Keys go most significant first: rows are ordered by the first key,
    /// ties broken by the second, and so on; fully-equal rows keep their
    /// original relative order. An empty key slice yields the identity
    /// permutation.
    pub fn argsort(&self, keys: &[&str]) -> Result<Permutation> {
        self.argsort_with(keys, SortKind::Auto, false)
    }

    /// [`Table::argsort`] with an explicit algorithm hint and direction.
    ///
    /// `kind` never changes the result, only how it is computed. With
    /// `reverse` the ascending permutation is read back to front; note
    /// this reverses the original relative order of rows whose key-tuples
    /// are fully equal, a deliberate consequence of plain reversal.
    pub fn argsort_with(&self, keys: &[&str], kind: SortKind, reverse: bool) -> Result<Permutation> {
        let mut arrays = extract_sort_keys(self, keys)?;
        // The sort primitive takes its primary key last.
        arrays.reverse();
        let mut perm = lexsort_indices(&arrays, self.row_count(), kind)?;
        if reverse {
            perm.reverse();
        }
        Ok(perm)
    }

    /// Sort the table's rows in place by `keys`, ascending.
    ///
    /// Every column is reordered by the same permutation. Sorting by no
    /// keys is a no-op.
    pub fn sort(&mut self, keys: &[&str]) -> Result<()> {
        self.sort_with(keys, false)
    }

    /// [`Table::sort`] with a direction flag. Reverse-sorting by no keys
    /// reverses the current row order.
    pub fn sort_with(&mut self, keys: &[&str], reverse: bool) -> Result<()> {
        let perm = self.argsort_with(keys, SortKind::Auto, reverse)?;
        if keys.is_empty() && !reverse {
            return Ok(());
        }
        log::debug!("sorting {} rows by {:?}", self.row_count(), keys);
        self.apply_permutation(&perm);
        Ok(())
    }
}
