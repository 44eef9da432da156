// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity ring buffer with oldest-overwrite semantics.
//!
//! [`RingBuffer`] backs the swap and frame history rings. Capacity is a
//! compile-time constant; once full, each push overwrites the oldest entry.
//! Entries are never individually removed, only overwritten or cleared in
//! bulk.

/// A fixed-capacity circular buffer.
///
/// `push` writes at an explicit cursor and wraps around, overwriting the
/// oldest entry once `N` entries have been written. Indexing and iteration
/// run oldest to newest.
#[derive(Clone, Debug)]
pub struct RingBuffer<T, const N: usize> {
    entries: [T; N],
    /// Next write position.
    cursor: usize,
    /// Number of live entries, capped at `N`.
    len: usize,
}

impl<T: Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default, const N: usize> RingBuffer<T, N> {
    /// Creates an empty ring.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: core::array::from_fn(|_| T::default()),
            cursor: 0,
            len: 0,
        }
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    /// Appends an entry, overwriting the oldest one if the ring is full.
    pub fn push(&mut self, value: T) {
        self.entries[self.cursor] = value;
        self.cursor = (self.cursor + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// Returns the number of live entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the ring holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the compile-time capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the entry at `index`, counting from the oldest live entry.
    ///
    /// Returns `None` for indices at or beyond [`len`](Self::len); history
    /// that has been overwritten is not retrievable.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        Some(&self.entries[(self.oldest() + index) % N])
    }

    /// Returns the most recently pushed entry.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        Some(&self.entries[(self.cursor + N - 1) % N])
    }

    /// Iterates over live entries, oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        (0..self.len).map(move |i| &self.entries[(self.oldest() + i) % N])
    }

    /// Forgets all entries without touching their storage.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.len = 0;
    }

    const fn oldest(&self) -> usize {
        if self.len < N { 0 } else { self.cursor }
    }
}
