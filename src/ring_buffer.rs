//! Const-generic, stack-allocated ring buffer with overwrite-oldest pushes.
//!
//! `RingBuffer<T, N>` holds up to `N` elements without heap allocation and
//! backs each sensor's rolling sample window.  Unlike a queue that rejects
//! writes when full, a push into a full buffer silently discards the oldest
//! unread element.
//!
//! # Invariants
//!
//! - `head` and `tail` are always `< N`.
//! - `is_empty() == (!full && head == tail)`, `is_full() == full`.
//! - After `N` pushes with no pop the buffer is full; every further push
//!   advances `tail` before `head`, so the element at the old `tail` is lost.
//!
//! Not interrupt-safe: a buffer is owned by one sensor on the main path.

/// Fixed-capacity circular buffer.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    buf: [T; N],
    /// Next slot to write.
    head: usize,
    /// Next slot to read (oldest element).
    tail: usize,
    full: bool,
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        const { assert!(N > 0, "ring buffer capacity must be non-zero") };
        Self {
            buf: [T::default(); N],
            head: 0,
            tail: 0,
            full: false,
        }
    }

    /// Append `item`, overwriting the oldest element when full.  O(1).
    pub fn push(&mut self, item: T) {
        self.buf[self.head] = item;
        if self.full {
            self.tail = (self.tail + 1) % N;
        }
        self.head = (self.head + 1) % N;
        self.full = self.head == self.tail;
    }

    /// Remove and return the oldest element, or `None` when empty.  O(1).
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.buf[self.tail];
        self.full = false;
        self.tail = (self.tail + 1) % N;
        Some(item)
    }

    /// Oldest-to-newest view of the buffered elements, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |i| self.buf[(self.tail + i) % N])
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Number of elements currently held.
    pub fn len(&self) -> usize {
        if self.full {
            N
        } else {
            (self.head + N - self.tail) % N
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
