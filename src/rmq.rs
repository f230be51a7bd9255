//! Submodule providing a sparse-table range-minimum/range-maximum query
//! structure, used in place of the succinct RMQ structure the reference
//! implementation relies on (see `SPEC_FULL.md` §12 for the rationale).
use core::cmp::Ordering;

/// A static range-min or range-max query structure over a fixed slice of
/// signed values.
///
/// Built once in O(n log n) time and answers `query` in O(1). Values are
/// `i64` rather than `usize` so that the DAG's `outParent`/`outChild`
/// arrays can use out-of-range sentinels (`n` for "no parent seen",
/// `-1` for "no child seen") without a separate `Option` layer.
#[derive(Debug, Clone)]
pub struct SparseTable {
    values: Vec<i64>,
    table: Vec<Vec<usize>>,
    maximize: bool,
}

fn better(maximize: bool, a: i64, b: i64) -> bool {
    if maximize {
        a > b
    } else {
        a < b
    }
}

impl SparseTable {
    /// Builds a sparse table over `values`.
    ///
    /// When `maximize` is `true`, `query` returns the position of the
    /// maximum value in the range; otherwise the minimum.
    #[must_use]
    pub fn build(values: Vec<i64>, maximize: bool) -> Self {
        let n = values.len();
        if n == 0 {
            return Self { values, table: Vec::new(), maximize };
        }
        let levels = floor_log2(n) + 1;
        let mut table = vec![vec![0usize; n]; levels];
        for (i, slot) in table[0].iter_mut().enumerate() {
            *slot = i;
        }
        for level in 1..levels {
            let span = 1usize << level;
            let half = span >> 1;
            if span > n {
                break;
            }
            for i in 0..=(n - span) {
                let left = table[level - 1][i];
                let right = table[level - 1][i + half];
                table[level][i] = if better(maximize, values[left], values[right]) {
                    left
                } else {
                    right
                };
            }
        }
        Self { values, table, maximize }
    }

    /// Returns the index of the extremal value in `[l, r]` (inclusive,
    /// order-independent: `l` and `r` are swapped if `l > r`).
    ///
    /// Returns `None` if the table is empty or either bound is out of
    /// range.
    #[must_use]
    pub fn query_index(&self, l: usize, r: usize) -> Option<usize> {
        if self.values.is_empty() {
            return None;
        }
        let (lo, hi) = match l.cmp(&r) {
            Ordering::Greater => (r, l),
            _ => (l, r),
        };
        if hi >= self.values.len() {
            return None;
        }
        let len = hi - lo + 1;
        let level = floor_log2(len);
        let half = 1usize << level;
        let left = self.table[level][lo];
        let right = self.table[level][hi + 1 - half];
        Some(if better(self.maximize, self.values[left], self.values[right]) {
            left
        } else {
            right
        })
    }

    /// Returns the extremal value itself in `[l, r]`.
    #[must_use]
    pub fn query_value(&self, l: usize, r: usize) -> Option<i64> {
        self.query_index(l, r).map(|i| self.values[i])
    }
}

#[allow(clippy::cast_possible_truncation)]
fn floor_log2(n: usize) -> usize {
    debug_assert!(n > 0);
    (usize::BITS - 1 - n.leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::SparseTable;

    #[test]
    fn empty_table_answers_none() {
        let t = SparseTable::build(Vec::new(), true);
        assert_eq!(t.query_index(0, 0), None);
    }

    #[test]
    fn single_element_table() {
        let t = SparseTable::build(vec![42], false);
        assert_eq!(t.query_value(0, 0), Some(42));
    }

    #[test]
    fn range_minimum_matches_brute_force() {
        let values = vec![5, 2, 9, 1, 7, 3, 8, 4, 6, 0];
        let t = SparseTable::build(values.clone(), false);
        for l in 0..values.len() {
            for r in l..values.len() {
                let expected = values[l..=r].iter().copied().min().unwrap();
                assert_eq!(t.query_value(l, r), Some(expected));
            }
        }
    }

    #[test]
    fn range_maximum_matches_brute_force() {
        let values = vec![5, 2, 9, 1, 7, 3, 8, 4, 6, 0];
        let t = SparseTable::build(values.clone(), true);
        for l in 0..values.len() {
            for r in l..values.len() {
                let expected = values[l..=r].iter().copied().max().unwrap();
                assert_eq!(t.query_value(l, r), Some(expected));
            }
        }
    }

    #[test]
    fn inverted_bounds_are_tolerated() {
        let t = SparseTable::build(vec![3, 1, 4, 1, 5], false);
        assert_eq!(t.query_value(4, 1), t.query_value(1, 4));
    }

    #[test]
    fn out_of_range_bound_returns_none() {
        let t = SparseTable::build(vec![1, 2, 3], true);
        assert_eq!(t.query_index(0, 10), None);
    }
}
