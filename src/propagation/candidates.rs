// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Dancing-links candidate set.
//!
//! Candidates `0..domain_size` live in a circular doubly linked list threaded
//! through two index arrays, with one extra sentinel slot at `domain_size`.
//! Unlinking a candidate leaves its own `next`/`prev` untouched, so relinking
//! candidates in the reverse order of their removal restores the list exactly.

/// Ascending set of live candidate ids with O(1) unlink and relink.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    next: Vec<u32>,
    prev: Vec<u32>,
    len: usize,
}

impl CandidateSet {
    /// Every id in `0..domain_size` live.
    pub fn new(domain_size: usize) -> Self {
        let mut set = Self {
            next: vec![0; domain_size + 1],
            prev: vec![0; domain_size + 1],
            len: 0,
        };
        set.reset();
        set
    }

    /// Relink the full domain in ascending order.
    pub fn reset(&mut self) {
        let slots = self.next.len() as u32;
        for i in 0..slots {
            self.next[i as usize] = (i + 1) % slots;
            self.prev[i as usize] = (i + slots - 1) % slots;
        }
        self.len = self.domain_size();
    }

    #[inline]
    fn sentinel(&self) -> u32 {
        self.domain_size() as u32
    }

    pub fn domain_size(&self) -> usize {
        self.next.len() - 1
    }

    /// Number of live candidates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest live id.
    #[inline]
    pub fn head(&self) -> Option<u32> {
        let first = self.next[self.sentinel() as usize];
        (first != self.sentinel()).then_some(first)
    }

    /// Live id following `id`, which may itself have been unlinked since.
    #[inline]
    pub fn after(&self, id: u32) -> Option<u32> {
        let next = self.next[id as usize];
        (next != self.sentinel()).then_some(next)
    }

    /// Remove a live id.
    pub fn unlink(&mut self, id: u32) {
        let (n, p) = (self.next[id as usize], self.prev[id as usize]);
        self.next[p as usize] = n;
        self.prev[n as usize] = p;
        self.len -= 1;
    }

    /// Put back the most recently unlinked id that is still out.
    pub fn relink(&mut self, id: u32) {
        let (n, p) = (self.next[id as usize], self.prev[id as usize]);
        self.next[p as usize] = id;
        self.prev[n as usize] = id;
        self.len += 1;
    }

    /// Live ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors(self.head(), move |&id| self.after(id))
    }
}
