// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Combinatorial number system: a bijection between ranks in `[0, C(n,k))`
//! and strictly ascending `k`-tuples of values in `[0, n)`.
//!
//! Tuples are ordered lexicographically, so for `n = 5, k = 3` the ranks run
//! `{0,1,2}, {0,1,3}, {0,1,4}, {0,2,3}, ...` up to `{2,3,4}` at rank 9.
//!
//! # Memory Model
//!
//! A [`SubsetIndex`] keeps its current tuple inline. After [`SubsetIndex::precompute`]
//! every tuple lives in one contiguous rank-ordered table and the current tuple
//! is a slice into it, which turns `seek` into an O(1) offset computation.

use std::fmt;

use tracing::warn;

use super::binomial::BinomialCache;
use crate::error::{Result, SearchError};

/// Write the tuple of rank `rank` into `out` (which must hold `k` values).
///
/// For each position the smallest value is chosen whose block of successors,
/// `C(n - v - 1, k - i - 1)` tuples long, still contains the remaining rank.
pub fn unrank_into(rank: u64, n: usize, out: &mut [u32], cache: &BinomialCache) {
    let k = out.len();
    debug_assert!(rank < cache.get(n, k), "rank {} out of range", rank);

    let mut remaining = rank;
    let mut v = 0usize;
    for i in 0..k {
        while v + 1 < n {
            let block = cache.get(n - v - 1, k - i - 1);
            if remaining >= block {
                remaining -= block;
                v += 1;
            } else {
                break;
            }
        }
        out[i] = v as u32;
        v += 1;
    }
}

/// The ascending `k`-tuple of rank `rank`.
pub fn unrank(rank: u64, n: usize, k: usize) -> Vec<u32> {
    unrank_with(rank, n, k, &BinomialCache::disabled())
}

/// [`unrank`] using a caller-owned binomial table.
pub fn unrank_with(rank: u64, n: usize, k: usize, cache: &BinomialCache) -> Vec<u32> {
    let mut tuple = vec![0; k];
    unrank_into(rank, n, &mut tuple, cache);
    tuple
}

/// Rank of a `k`-tuple of distinct values in `[0, n)`.
///
/// The tuple is sorted in place first, so callers may pass the values in
/// any order.
pub fn rank(tuple: &mut [u32], n: usize) -> u64 {
    rank_with(tuple, n, &BinomialCache::disabled())
}

/// [`rank`] using a caller-owned binomial table.
pub fn rank_with(tuple: &mut [u32], n: usize, cache: &BinomialCache) -> u64 {
    tuple.sort_unstable();
    debug_assert!(
        tuple.last().map_or(true, |&v| (v as usize) < n),
        "tuple {:?} has a value outside [0, {})",
        tuple,
        n
    );
    let k = tuple.len();

    let mut rank = 0u64;
    let mut value = 0usize;
    let mut h = 0usize;
    while h < k {
        if (value as u32) < tuple[h] {
            rank += cache.get(n - value - 1, k - h - 1);
        } else {
            h += 1;
        }
        value += 1;
    }
    rank
}

/// [`rank_with`] for tuples from outside the crate: a value `>= n` is an
/// error instead of a broken precondition.
pub fn checked_rank(tuple: &mut [u32], n: usize, cache: &BinomialCache) -> Result<u64> {
    if let Some(&value) = tuple.iter().find(|&&v| v as usize >= n) {
        warn!(value, n, "tuple value out of range");
        return Err(SearchError::ValueOutOfRange { value, n });
    }
    Ok(rank_with(tuple, n, cache))
}

/// Cursor over all `k`-subsets of `[0, n)` in rank order.
#[derive(Debug, Clone)]
pub struct SubsetIndex {
    n: usize,
    k: usize,
    size: u64,
    /// Current rank; equals `size` once `next` has walked past the last tuple.
    rank: u64,
    /// Current tuple when no table is attached.
    tuple: Vec<u32>,
    /// All tuples, `k` values each, in rank order.
    table: Option<Vec<u32>>,
}

impl SubsetIndex {
    /// Create an index positioned at rank 0.
    pub fn new(n: usize, k: usize) -> Self {
        let cache = BinomialCache::disabled();
        Self {
            n,
            k,
            size: cache.get(n, k),
            rank: 0,
            tuple: (0..k as u32).collect(),
            table: None,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Total number of tuples, `C(n, k)`.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn rank(&self) -> u64 {
        self.rank
    }

    pub fn is_precomputed(&self) -> bool {
        self.table.is_some()
    }

    /// The current tuple.
    ///
    /// Past the end (after `next` returned false) this is still the last tuple.
    pub fn tuple(&self) -> &[u32] {
        match &self.table {
            Some(table) if self.size > 0 => {
                let rank = self.rank.min(self.size - 1) as usize;
                &table[rank * self.k..(rank + 1) * self.k]
            }
            _ => &self.tuple,
        }
    }

    /// Tuple of an arbitrary rank from the precomputed table, without moving.
    pub fn tuple_at(&self, rank: u64) -> Option<&[u32]> {
        let table = self.table.as_ref()?;
        if rank >= self.size {
            return None;
        }
        let start = rank as usize * self.k;
        Some(&table[start..start + self.k])
    }

    fn reset_tuple(&mut self) {
        for (i, value) in self.tuple.iter_mut().enumerate() {
            *value = i as u32;
        }
    }

    /// Step to the lexicographic successor.
    ///
    /// Returns false (and moves past the end) when the current tuple is the
    /// last one.
    pub fn next(&mut self) -> bool {
        if self.rank >= self.size {
            return false;
        }
        self.rank += 1;
        if self.rank == self.size {
            return false;
        }
        if self.table.is_some() {
            return true;
        }

        // Rightmost position that can still grow, then a consecutive suffix.
        let k = self.k;
        let mut j = k;
        while j > 0 {
            j -= 1;
            if (self.tuple[j] as usize) < self.n - (k - j) {
                self.tuple[j] += 1;
                for m in j + 1..k {
                    self.tuple[m] = self.tuple[m - 1] + 1;
                }
                return true;
            }
        }
        false
    }

    /// Step to the lexicographic predecessor.
    ///
    /// Returns false at rank 0. From past the end it returns to the last tuple.
    pub fn prev(&mut self) -> bool {
        if self.rank == 0 || self.size == 0 {
            return false;
        }
        if self.rank >= self.size {
            self.rank = self.size - 1;
            return true;
        }
        self.rank -= 1;
        if self.table.is_some() {
            return true;
        }

        // Rightmost position that can shrink, then the largest possible suffix.
        let k = self.k;
        let mut j = k;
        while j > 0 {
            j -= 1;
            let floor = if j == 0 { 0 } else { self.tuple[j - 1] + 1 };
            if self.tuple[j] > floor {
                self.tuple[j] -= 1;
                for m in j + 1..k {
                    self.tuple[m] = (self.n - (k - m)) as u32;
                }
                return true;
            }
        }
        false
    }

    /// Jump directly to `rank`.
    pub fn seek(&mut self, rank: u64) -> Result<()> {
        self.seek_with(rank, &BinomialCache::disabled())
    }

    /// [`SubsetIndex::seek`] using a caller-owned binomial table.
    ///
    /// An out-of-range rank is reported and leaves the index unchanged.
    pub fn seek_with(&mut self, rank: u64, cache: &BinomialCache) -> Result<()> {
        if rank >= self.size {
            warn!(rank, size = self.size, "seek out of range ignored");
            return Err(SearchError::RankOutOfRange {
                rank,
                size: self.size,
            });
        }
        self.rank = rank;
        if self.table.is_none() {
            unrank_into(rank, self.n, &mut self.tuple, cache);
        }
        Ok(())
    }

    /// Materialize every tuple in rank order and reset to rank 0.
    ///
    /// Returns false when the table cannot be allocated; the index then keeps
    /// working without it.
    pub fn precompute(&mut self) -> bool {
        if self.table.is_some() {
            return true;
        }
        let Some(len) = (self.size as usize).checked_mul(self.k) else {
            warn!(n = self.n, k = self.k, "tuple table too large; seeking stays O(k)");
            return false;
        };
        let mut table = Vec::new();
        if table.try_reserve_exact(len).is_err() {
            warn!(n = self.n, k = self.k, len, "tuple table allocation failed; seeking stays O(k)");
            return false;
        }

        self.rank = 0;
        self.reset_tuple();
        if self.size > 0 {
            loop {
                table.extend_from_slice(&self.tuple);
                if !self.next() {
                    break;
                }
            }
        }

        self.rank = 0;
        self.reset_tuple();
        self.table = Some(table);
        true
    }

    /// Iterate every tuple from rank 0, independently of the cursor.
    pub fn iter(&self) -> Tuples {
        Tuples {
            index: SubsetIndex::new(self.n, self.k),
            done: self.size == 0,
        }
    }
}

impl fmt::Display for SubsetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.rank)?;
        for value in self.tuple() {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

/// Iterator over all tuples of a [`SubsetIndex`] in rank order.
#[derive(Debug, Clone)]
pub struct Tuples {
    index: SubsetIndex,
    done: bool,
}

impl Iterator for Tuples {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let tuple = self.index.tuple().to_vec();
        self.done = !self.index.next();
        Some(tuple)
    }
}
