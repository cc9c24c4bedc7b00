//! A fixed-capacity buffer that keeps the most recent items.
//!
//! [`RingBuffer::push`] appends at the tail; once the buffer is full the
//! oldest item (logical index `0`) is evicted and handed back to the caller.
//! The length never exceeds the capacity chosen at construction.

use std::collections::VecDeque;

/// Bounded first-in-first-out buffer with overwrite-oldest semantics.
///
/// # Examples
///
/// ```rust
/// use careercraft_common::collections::RingBuffer;
///
/// let mut buffer = RingBuffer::new(3);
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
/// assert_eq!(buffer.push(4), Some(1)); // oldest item evicted
///
/// assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(buffer.latest(2).copied().collect::<Vec<_>>(), vec![4, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a new buffer with the provided capacity.
    ///
    /// A capacity of zero is clamped to `1`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends an item, returning the evicted oldest item when full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.buf.pop_front() } else { None };
        self.buf.push_back(item);
        evicted
    }

    /// Removes and returns the oldest item.
    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    /// Item at `idx`, counting from the oldest.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.buf.get(idx)
    }

    /// Most recently pushed item.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.buf.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all elements, leaving the capacity unchanged.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Removes and returns every item, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        self.buf.drain(..).collect()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    /// Iterates over at most `n` items, newest first.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &T> {
        self.buf.iter().rev().take(n)
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copies the contents out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.buf.iter().cloned().collect()
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::RingBuffer;

    #[test]
    fn push_evicts_oldest_when_full() {
        let mut buffer = RingBuffer::new(3);
        assert_eq!(buffer.push(1), None);
        assert_eq!(buffer.push(2), None);
        assert_eq!(buffer.push(3), None);
        assert_eq!(buffer.push(4), Some(1));

        assert_eq!(buffer.to_vec(), vec![2, 3, 4]);
        assert_eq!(buffer.pop(), Some(2));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn never_grows_past_capacity() {
        let mut buffer = RingBuffer::new(100);
        for value in 0..1_000 {
            buffer.push(value);
            assert!(buffer.len() <= 100);
        }

        assert_eq!(buffer.len(), 100);
        assert_eq!(buffer.get(0), Some(&900));
        assert_eq!(buffer.last(), Some(&999));
    }

    #[test]
    fn latest_is_newest_first_and_bounded() {
        let mut buffer = RingBuffer::new(4);
        for value in 0..6 {
            buffer.push(value);
        }

        assert_eq!(buffer.latest(2).copied().collect::<Vec<_>>(), vec![5, 4]);
        assert_eq!(buffer.latest(10).count(), 4);
    }

    #[test]
    fn drain_empties_but_keeps_capacity() {
        let mut buffer = RingBuffer::new(2);
        buffer.push("a");
        buffer.push("b");

        assert_eq!(buffer.drain(), vec!["a", "b"]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut buffer = RingBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);

        buffer.push(42);
        buffer.push(43);

        assert_eq!(buffer.to_vec(), vec![43]);
    }
}
