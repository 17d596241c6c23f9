//! Per-axis size ledger.
//!
//! Stores one size per row (or column) and keeps a Fenwick tree over them, so
//! prefix sums and offset-to-index lookups stay O(log n) on a 100k-row axis
//! even while rows are being resized.

use crate::error::{Axis, GridError, Result};

/// Binary indexed tree over `u64` sums, 1-indexed internally.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fenwick {
    tree: Vec<u64>,
}

impl Fenwick {
    fn build(sizes: &[u32]) -> Self {
        let n = sizes.len();
        let mut tree = vec![0u64; n + 1];
        for i in 1..=n {
            let own = sizes.get(i - 1).copied().map(u64::from).unwrap_or(0);
            let acc = tree.get(i).copied().unwrap_or(0) + own;
            if let Some(slot) = tree.get_mut(i) {
                *slot = acc;
            }
            let parent = i + lowbit(i);
            if let Some(slot) = tree.get_mut(parent) {
                *slot += acc;
            }
        }
        Self { tree }
    }

    fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    /// Sum of the first `count` entries.
    fn prefix(&self, count: usize) -> u64 {
        let mut i = count.min(self.len());
        let mut sum = 0;
        while i > 0 {
            sum += self.tree.get(i).copied().unwrap_or(0);
            i -= lowbit(i);
        }
        sum
    }

    fn increase(&mut self, index: usize, delta: u64) {
        let mut i = index + 1;
        while i <= self.len() {
            if let Some(slot) = self.tree.get_mut(i) {
                *slot += delta;
            }
            i += lowbit(i);
        }
    }

    fn decrease(&mut self, index: usize, delta: u64) {
        let mut i = index + 1;
        while i <= self.len() {
            if let Some(slot) = self.tree.get_mut(i) {
                *slot = slot.saturating_sub(delta);
            }
            i += lowbit(i);
        }
    }

    /// Largest `k` with `prefix(k) <= offset`. Entries must be positive.
    fn leading_count(&self, offset: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
        let mut pos = 0usize;
        let mut remaining = offset;
        while step > 0 {
            let next = pos + step;
            if next <= n {
                let node = self.tree.get(next).copied().unwrap_or(u64::MAX);
                if node <= remaining {
                    pos = next;
                    remaining -= node;
                }
            }
            step >>= 1;
        }
        pos
    }
}

fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

/// Variable-size ledger for one axis of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeTable {
    axis: Axis,
    sizes: Vec<u32>,
    sums: Fenwick,
    default_size: u32,
    min_size: u32,
}

impl SizeTable {
    /// Create a table of `len` entries filled with `default_size`.
    pub fn new(axis: Axis, len: u32, default_size: u32, min_size: u32) -> Self {
        let min_size = min_size.max(1);
        let default_size = default_size.max(min_size);
        let sizes = vec![default_size; len as usize];
        let sums = Fenwick::build(&sizes);
        Self {
            axis,
            sizes,
            sums,
            default_size,
            min_size,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn len(&self) -> u32 {
        u32::try_from(self.sizes.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    pub fn min_size(&self) -> u32 {
        self.min_size
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    fn out_of_range(&self, index: u32) -> GridError {
        GridError::IndexOutOfRange {
            axis: self.axis,
            index,
            len: self.len(),
        }
    }

    /// Size of `index`.
    pub fn get(&self, index: u32) -> Result<u32> {
        self.sizes
            .get(index as usize)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Resize `index`, clamping to the minimum size. Returns the applied size.
    pub fn set(&mut self, index: u32, size: u32) -> Result<u32> {
        let size = size.max(self.min_size);
        let err = self.out_of_range(index);
        let slot = self.sizes.get_mut(index as usize).ok_or(err)?;
        let old = *slot;
        *slot = size;
        if size > old {
            self.sums.increase(index as usize, u64::from(size - old));
        } else if old > size {
            self.sums.decrease(index as usize, u64::from(old - size));
        }
        Ok(size)
    }

    /// Sum of `count` consecutive sizes starting at `start`.
    pub fn prefix_sum(&self, start: u32, count: u32) -> Result<u64> {
        let end = u64::from(start) + u64::from(count);
        if end > u64::from(self.len()) {
            let last = u32::try_from(end.saturating_sub(1)).unwrap_or(u32::MAX);
            return Err(self.out_of_range(last));
        }
        let start = start as usize;
        let end = start + count as usize;
        Ok(self.sums.prefix(end) - self.sums.prefix(start))
    }

    /// Pixel offset where `index` begins. Indices past the end map to the total.
    pub fn offset_of(&self, index: u32) -> u64 {
        self.sums.prefix(index as usize)
    }

    /// Pixel offset where `index` ends.
    pub fn end_of(&self, index: u32) -> u64 {
        self.sums.prefix(index as usize + 1)
    }

    /// Total extent of the axis in pixels.
    pub fn total(&self) -> u64 {
        self.sums.prefix(self.sizes.len())
    }

    /// Number of leading entries that end at or before `offset`.
    pub fn leading_count(&self, offset: u64) -> u32 {
        u32::try_from(self.sums.leading_count(offset)).unwrap_or(u32::MAX)
    }

    /// Index whose span contains `offset`, or `None` past the end.
    pub fn index_at(&self, offset: u64) -> Option<u32> {
        if offset >= self.total() {
            return None;
        }
        Some(self.leading_count(offset))
    }

    /// Insert a new entry at `index`, shifting later entries up by one.
    pub fn insert_at(&mut self, index: u32, size: u32) -> Result<()> {
        if index > self.len() {
            return Err(self.out_of_range(index));
        }
        self.sizes.insert(index as usize, size.max(self.min_size));
        self.sums = Fenwick::build(&self.sizes);
        Ok(())
    }

    /// Remove the entry at `index`, returning its size.
    pub fn remove_at(&mut self, index: u32) -> Result<u32> {
        if index >= self.len() {
            return Err(self.out_of_range(index));
        }
        let removed = self.sizes.remove(index as usize);
        self.sums = Fenwick::build(&self.sizes);
        Ok(removed)
    }

    /// `(index, start_offset, size)` for each entry from `start` onward.
    pub fn iter_from(&self, start: u32) -> impl Iterator<Item = (u32, u64, u32)> + '_ {
        let mut offset = self.offset_of(start);
        self.sizes
            .iter()
            .enumerate()
            .skip(start as usize)
            .map(move |(i, &size)| {
                let at = offset;
                offset += u64::from(size);
                (u32::try_from(i).unwrap_or(u32::MAX), at, size)
            })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;

    fn table(sizes: &[u32]) -> SizeTable {
        let mut t = SizeTable::new(Axis::Row, sizes.len() as u32, 30, 1);
        for (i, &s) in sizes.iter().enumerate() {
            t.set(i as u32, s).unwrap();
        }
        t
    }

    #[test]
    fn test_prefix_sum_matches_literal_sum() {
        let sizes = [30, 45, 21, 80, 33, 60, 25, 90, 41];
        let t = table(&sizes);
        for k in 0..=sizes.len() {
            let expected: u64 = sizes[..k].iter().map(|&s| u64::from(s)).sum();
            assert_eq!(t.prefix_sum(0, k as u32).unwrap(), expected, "k={k}");
        }
        assert_eq!(t.prefix_sum(2, 3).unwrap(), 21 + 80 + 33);
    }

    #[test]
    fn test_prefix_sum_out_of_range() {
        let t = SizeTable::new(Axis::Column, 5, 70, 20);
        assert!(t.prefix_sum(3, 2).is_ok());
        assert!(matches!(
            t.prefix_sum(3, 3),
            Err(GridError::IndexOutOfRange {
                axis: Axis::Column,
                index: 5,
                len: 5
            })
        ));
    }

    #[test]
    fn test_get_out_of_range() {
        let t = SizeTable::new(Axis::Row, 3, 30, 20);
        assert_eq!(t.get(2).unwrap(), 30);
        assert!(t.get(3).is_err());
    }

    #[test]
    fn test_set_clamps_to_min() {
        let mut t = SizeTable::new(Axis::Row, 3, 30, 20);
        assert_eq!(t.set(1, 5).unwrap(), 20);
        assert_eq!(t.get(1).unwrap(), 20);
        assert_eq!(t.total(), 80);
    }

    #[test]
    fn test_resize_updates_offsets() {
        let mut t = SizeTable::new(Axis::Column, 10, 100, 20);
        t.set(5, 160).unwrap();
        assert_eq!(t.offset_of(5), 500);
        assert_eq!(t.offset_of(6), 660);
        assert_eq!(t.total(), 1060);
        t.set(5, 100).unwrap();
        assert_eq!(t.offset_of(6), 600);
    }

    #[test]
    fn test_index_at() {
        let t = table(&[10, 20, 30]);
        assert_eq!(t.index_at(0), Some(0));
        assert_eq!(t.index_at(9), Some(0));
        assert_eq!(t.index_at(10), Some(1));
        assert_eq!(t.index_at(29), Some(1));
        assert_eq!(t.index_at(30), Some(2));
        assert_eq!(t.index_at(59), Some(2));
        assert_eq!(t.index_at(60), None);
    }

    #[test]
    fn test_insert_and_remove_splice() {
        let mut t = table(&[10, 20, 30]);
        t.insert_at(1, 50).unwrap();
        assert_eq!(t.sizes(), &[10, 50, 20, 30]);
        assert_eq!(t.offset_of(2), 60);
        assert_eq!(t.remove_at(1).unwrap(), 50);
        assert_eq!(t.sizes(), &[10, 20, 30]);
        t.insert_at(3, 40).unwrap();
        assert_eq!(t.total(), 100);
        assert!(t.insert_at(5, 40).is_err());
        assert!(t.remove_at(4).is_err());
    }

    #[test]
    fn test_iter_from_offsets() {
        let t = table(&[10, 20, 30, 40]);
        let items: Vec<_> = t.iter_from(1).collect();
        assert_eq!(items, vec![(1, 10, 20), (2, 30, 30), (3, 60, 40)]);
    }

    #[test]
    fn test_large_axis_prefix() {
        let mut t = SizeTable::new(Axis::Row, 100_000, 30, 20);
        assert_eq!(t.total(), 3_000_000);
        t.set(99_999, 60).unwrap();
        assert_eq!(t.offset_of(99_999), 2_999_970);
        assert_eq!(t.total(), 3_000_030);
        assert_eq!(t.index_at(2_999_999), Some(99_999));
    }
}
