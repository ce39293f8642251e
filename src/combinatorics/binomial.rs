// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Binomial coefficients with an optional memoization table.
//!
//! The table is an explicit context object owned by the caller and passed by
//! reference into the index operations. Nothing is global: two searches may
//! use two caches, or none at all.

use tracing::{debug, warn};

/// Number of ways to choose `k` items from `n` items.
///
/// Returns 0 when `n < k` and 1 when `n == k`. Otherwise the product is
/// accumulated one factor at a time over the smaller of `k` and `n - k`;
/// every intermediate value is itself a binomial coefficient, so each
/// division is exact and the running value only grows.
///
/// Values above `u64::MAX` saturate to `u64::MAX`, the same as the
/// entries of a [`BinomialCache`].
pub fn binomial(n: usize, k: usize) -> u64 {
    if n < k {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    let mut top = n as u128;
    for i in 0..k as u128 {
        let Some(product) = result.checked_mul(top) else {
            return u64::MAX;
        };
        result = product / (i + 1);
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
        top -= 1;
    }
    u64::try_from(result).unwrap_or(u64::MAX)
}

/// Dense `(max_n + 1) × (max_k + 1)` table of binomial coefficients.
///
/// Queries outside the table, or a table whose allocation failed, fall back
/// to [`binomial`]. Correctness never depends on the table being present.
#[derive(Debug, Clone, Default)]
pub struct BinomialCache {
    max_n: usize,
    max_k: usize,
    /// Row-major, `table[n * (max_k + 1) + k]`. Empty when caching is disabled.
    table: Vec<u64>,
}

impl BinomialCache {
    /// Build the table with Pascal's identity. Entries saturate at `u64::MAX`.
    pub fn new(max_n: usize, max_k: usize) -> Self {
        let width = max_k + 1;
        let len = (max_n + 1).saturating_mul(width);
        let mut table: Vec<u64> = Vec::new();
        if table.try_reserve_exact(len).is_err() {
            warn!(max_n, max_k, "binomial table allocation failed; computing directly");
            return Self::disabled();
        }
        table.resize(len, 0);

        for n in 0..=max_n {
            table[n * width] = 1;
            for k in 1..=max_k.min(n) {
                let above = (n - 1) * width;
                table[n * width + k] = table[above + k - 1].saturating_add(table[above + k]);
            }
        }
        debug!(max_n, max_k, entries = len, "binomial table ready");

        Self {
            max_n,
            max_k,
            table,
        }
    }

    /// A cache that never caches.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a table is attached.
    pub fn is_enabled(&self) -> bool {
        !self.table.is_empty()
    }

    /// `C(n, k)`, from the table when it covers the query.
    #[inline]
    pub fn get(&self, n: usize, k: usize) -> u64 {
        if self.is_enabled() && n <= self.max_n && k <= self.max_k {
            self.table[n * (self.max_k + 1) + k]
        } else {
            binomial(n, k)
        }
    }
}
