// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Known values and bounds for `T(n)`, the largest triangle thrackle on `n` points.

use std::fmt;

/// Exact `T(n)` where it is known (`3 <= n <= 10`).
pub fn thrackle_size(n: usize) -> Option<u32> {
    match n {
        3 | 4 => Some(1),
        5 => Some(2),
        6 => Some(4),
        7 => Some(7),
        8 => Some(8),
        9 => Some(10),
        10 => Some(12),
        _ => None,
    }
}

/// Constructive lower bound on `T(n)`, defined for `n >= 7`.
pub fn thrackle_size_lower_bound(n: usize) -> Option<u32> {
    if n < 7 {
        return None;
    }
    let n = n as u64;
    let bound = if n % 3 == 0 {
        n * n / 9 + 1
    } else {
        match n % 6 {
            1 => (2 * n * n - n + 35) / 18,
            4 => (2 * n * n - n + 26) / 18,
            5 => (n * n - n + 7) / 9,
            2 => (n * n - n + 16) / 9,
            _ => return None,
        }
    };
    u32::try_from(bound).ok()
}

/// Counting upper bound on `T(n)`.
pub fn thrackle_size_upper_bound(n: usize) -> u32 {
    let n = n as u64;
    let bound = if n % 2 == 0 {
        (n * n - 2 * n) / 6
    } else {
        (n * n - n) / 6
    };
    u32::try_from(bound).unwrap_or(u32::MAX)
}

/// What is known about `T(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeEstimate {
    Exact(u32),
    Range(u32, u32),
}

impl SizeEstimate {
    pub fn for_points(n: usize) -> Option<Self> {
        if let Some(size) = thrackle_size(n) {
            return Some(SizeEstimate::Exact(size));
        }
        let lower = thrackle_size_lower_bound(n)?;
        Some(SizeEstimate::Range(lower, thrackle_size_upper_bound(n)))
    }

    /// Largest sequence length worth searching for.
    pub fn upper(&self) -> u32 {
        match *self {
            SizeEstimate::Exact(size) => size,
            SizeEstimate::Range(_, upper) => upper,
        }
    }
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeEstimate::Exact(size) => write!(f, "{}", size),
            SizeEstimate::Range(lower, upper) => write!(f, "{}-{}", lower, upper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sizes() {
        assert_eq!(thrackle_size(3), Some(1));
        assert_eq!(thrackle_size(7), Some(7));
        assert_eq!(thrackle_size(11), None);
    }

    #[test]
    fn test_bounds_bracket_known_sizes() {
        for n in 7..=10 {
            let exact = thrackle_size(n).unwrap();
            assert!(thrackle_size_lower_bound(n).unwrap() <= exact, "n={}", n);
            assert!(thrackle_size_upper_bound(n) >= exact, "n={}", n);
        }
    }

    #[test]
    fn test_bound_values() {
        assert_eq!(thrackle_size_lower_bound(9), Some(10));
        assert_eq!(thrackle_size_upper_bound(9), 12);
        assert_eq!(thrackle_size_lower_bound(8), Some(8));
        assert_eq!(thrackle_size_upper_bound(8), 8);
        assert_eq!(thrackle_size_lower_bound(6), None);
    }

    #[test]
    fn test_estimate_display() {
        assert_eq!(SizeEstimate::for_points(6).unwrap().to_string(), "4");
        let far = SizeEstimate::for_points(12).unwrap();
        assert_eq!(far, SizeEstimate::Range(17, 20));
        assert_eq!(far.to_string(), "17-20");
        assert_eq!(far.upper(), 20);
    }
}
