//
// Copyright (c) 2025 Nathan Fiedler
//

//! First-in, first-out queue backed by a single array used as a ring buffer.
//!
//! Enqueue is O(1) except when the array is full, at which point the capacity
//! is doubled and every element is moved, making that one enqueue O(n). Since
//! doubling happens O(log n) times over the life of the queue, enqueue is
//! amortized O(1). Use [`Queue::with_capacity()`] to pick a capacity that will
//! not need to grow, or [`Queue::resize()`] to grow ahead of time.

use crate::buffer::RawBuffer;
use crate::error::{Error, Result};
use std::fmt;
use tracing::{debug, warn};

/// Capacity of a queue constructed by [`Queue::new()`].
pub const DEFAULT_CAPACITY: usize = 32;

/// Ring buffer queue that grows by doubling when full.
///
/// Capacity never shrinks; removing elements only frees slots for reuse.
pub struct Queue<T> {
    /// slots of the ring, `capacity` in number
    buffer: RawBuffer<T>,
    /// slot of the most recently enqueued element
    head: usize,
    /// slot just before the next element to dequeue
    tail: usize,
    /// number of live elements
    length: usize,
}

impl<T> Queue<T> {
    /// Return an empty queue with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY).expect("unexpected overflow")
    }

    /// Return an empty queue with the given capacity.
    ///
    /// Returns `InvalidCapacity` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(Error::InvalidCapacity(capacity));
        }
        let buffer = RawBuffer::new(capacity)?;
        // capacity - 1 is the slot before slot 0
        Ok(Self {
            buffer,
            head: capacity - 1,
            tail: capacity - 1,
            length: 0,
        })
    }

    /// Add an element to the back of the queue, doubling the capacity first
    /// if the queue is full.
    ///
    /// Returns `CapacityExceeded` if the queue is full and cannot grow, in
    /// which case the queue is unchanged and the element is dropped.
    ///
    /// # Time complexity
    ///
    /// Amortized constant time.
    pub fn enqueue(&mut self, elem: T) -> Result<()> {
        if self.length == self.capacity() {
            let grown = self
                .capacity()
                .checked_mul(2)
                .ok_or(Error::CapacityExceeded)
                .and_then(|new_capacity| self.resize(new_capacity));
            if let Err(err) = grown {
                warn!(capacity = self.capacity(), "queue cannot grow any further");
                return Err(err);
            }
        }
        self.head = self.next_slot(self.head);
        unsafe { self.buffer.write(self.head, elem) }
        self.length += 1;
        Ok(())
    }

    /// Enqueue each of the elements in order, stopping at the first failure.
    ///
    /// Elements enqueued before the failure remain in the queue.
    pub fn enqueue_slice(&mut self, elements: &[T]) -> Result<()>
    where
        T: Clone,
    {
        for elem in elements {
            self.enqueue(elem.clone())?;
        }
        Ok(())
    }

    /// Remove and return the element at the front of the queue.
    ///
    /// Returns `QueueEmpty` if there are no elements.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn dequeue(&mut self) -> Result<T> {
        if self.length == 0 {
            return Err(Error::QueueEmpty);
        }
        self.tail = self.next_slot(self.tail);
        self.length -= 1;
        Ok(unsafe { self.buffer.read(self.tail) })
    }

    /// Reference to the element at the front of the queue, the one the next
    /// call to `dequeue()` would return.
    ///
    /// Returns `QueueEmpty` if there are no elements.
    pub fn peek(&self) -> Result<&T> {
        self.get(0).ok_or(Error::QueueEmpty)
    }

    /// Reference to the element `index` positions from the front.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.length {
            let slot = self.physical(index);
            unsafe { Some(self.buffer.get(slot)) }
        } else {
            None
        }
    }

    /// Grow the backing array to `new_capacity` slots.
    ///
    /// `enqueue()` doubles the capacity automatically; call this directly to
    /// pick when the move happens and how large the new array is.
    ///
    /// Returns `ResizeNotLarger` if `new_capacity` is not greater than the
    /// current capacity, or `CapacityExceeded` if the new array cannot be
    /// allocated. In both cases the queue is unchanged.
    ///
    /// # Time complexity
    ///
    /// O(n) where n is the number of elements in the queue.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let current = self.capacity();
        if new_capacity <= current {
            return Err(Error::ResizeNotLarger {
                requested: new_capacity,
                current,
            });
        }
        let mut buffer = RawBuffer::new(new_capacity)?;
        let length = self.length;
        // The live elements may wrap around the end of the old array, so
        // dequeue them in order into the start of the new array.
        let mut slot = 0;
        while let Ok(elem) = self.dequeue() {
            unsafe { buffer.write(slot, elem) }
            slot += 1;
        }
        // every slot of the old array is vacant now, dropping it only frees
        self.buffer = buffer;
        self.length = length;
        self.tail = new_capacity - 1;
        self.head = if length == 0 {
            new_capacity - 1
        } else {
            length - 1
        };
        debug!(
            old_capacity = current,
            new_capacity, length, "queue backing array resized"
        );
        Ok(())
    }

    /// Remove and drop all elements. The capacity is unchanged.
    ///
    /// # Time complexity
    ///
    /// O(n) if elements are droppable, otherwise constant time.
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        let front = self.physical(0);
        let first = self.length.min(capacity - front);
        let second = self.length - first;
        self.length = 0;
        self.head = capacity - 1;
        self.tail = capacity - 1;
        unsafe {
            self.buffer.drop_range(front, first);
            // elements that wrapped around to the start of the array
            self.buffer.drop_range(0, second);
        }
    }

    /// Returns an iterator over the elements from front to back.
    pub fn iter(&self) -> QueueIter<'_, T> {
        QueueIter {
            queue: self,
            index: 0,
        }
    }

    /// Return the number of elements in the queue.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns the number of elements the queue can hold before it must
    /// grow.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns true if the queue holds no elements.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Slot that follows `slot`, wrapping to the start of the array.
    fn next_slot(&self, slot: usize) -> usize {
        if slot + 1 == self.capacity() {
            0
        } else {
            slot + 1
        }
    }

    /// Convert an offset from the front of the queue into a slot index.
    fn physical(&self, offset: usize) -> usize {
        let logical_index = self.tail + 1 + offset;
        if logical_index >= self.capacity() {
            logical_index - self.capacity()
        } else {
            logical_index
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queue(capacity: {}, head: {}, tail: {}, length: {})",
            self.capacity(),
            self.head,
            self.tail,
            self.length,
        )
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Immutable queue iterator, front to back.
pub struct QueueIter<'a, T> {
    queue: &'a Queue<T>,
    index: usize,
}

impl<'a, T> Iterator for QueueIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.queue.get(self.index);
        self.index += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = QueueIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = QueueIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        QueueIntoIter { queue: self }
    }
}

/// An iterator that moves elements out of a queue in FIFO order.
pub struct QueueIntoIter<T> {
    queue: Queue<T>,
}

impl<T> Iterator for QueueIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.dequeue().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MAX_CAPACITY;
    use std::collections::VecDeque;

    #[test]
    fn test_queue_create() {
        let sut = Queue::<usize>::new();
        assert!(sut.is_empty());
        assert_eq!(sut.len(), 0);
        assert_eq!(sut.capacity(), DEFAULT_CAPACITY);
        assert_eq!(sut.head, DEFAULT_CAPACITY - 1);
        assert_eq!(sut.tail, DEFAULT_CAPACITY - 1);
    }

    #[test]
    fn test_queue_zero_capacity() {
        let result = Queue::<usize>::with_capacity(0);
        assert!(matches!(result, Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_queue_enqueue_one() {
        let mut sut = Queue::<usize>::new();
        sut.enqueue(5).unwrap();
        assert_eq!(sut.head, 0);
        assert_eq!(sut.tail, DEFAULT_CAPACITY - 1);
        assert_eq!(sut.len(), 1);
        assert_eq!(sut.peek(), Ok(&5));
    }

    #[test]
    fn test_queue_fill_doubles_capacity() {
        let mut sut = Queue::<usize>::new();
        for value in 1..=32 {
            sut.enqueue(value).unwrap();
        }
        assert_eq!(sut.capacity(), 32);
        sut.enqueue(33).unwrap();
        assert_eq!(sut.capacity(), 64);
        assert_eq!(sut.len(), 33);
        for value in 1..=33 {
            assert_eq!(sut.dequeue(), Ok(value));
        }
    }

    #[test]
    fn test_queue_drain_and_reuse() {
        let mut sut = Queue::<usize>::new();
        for value in 1..=32 {
            sut.enqueue(value).unwrap();
        }
        for value in 1..=32 {
            assert_eq!(sut.dequeue(), Ok(value));
        }
        assert_eq!(sut.len(), 0);
        assert!(sut.is_empty());
        assert_eq!(sut.dequeue(), Err(Error::QueueEmpty));
        assert_eq!(sut.len(), 0);
        // head and tail keep wrapping around the ring
        for value in 1..35 {
            sut.enqueue(value).unwrap();
            assert_eq!(sut.dequeue(), Ok(value));
        }
        assert_eq!(sut.capacity(), 32);
    }

    #[test]
    fn test_queue_empty_errors() {
        let mut sut = Queue::<String>::new();
        assert_eq!(sut.peek(), Err(Error::QueueEmpty));
        assert_eq!(sut.dequeue(), Err(Error::QueueEmpty));
        assert_eq!(sut.len(), 0);
        assert_eq!(sut.head, DEFAULT_CAPACITY - 1);
        assert_eq!(sut.tail, DEFAULT_CAPACITY - 1);
    }

    #[test]
    fn test_queue_enqueue_slice() {
        let mut sut = Queue::<usize>::new();
        sut.enqueue_slice(&[1, 2, 3]).unwrap();
        assert_eq!(sut.len(), 3);
        for value in 1..=3 {
            assert_eq!(sut.dequeue(), Ok(value));
        }
    }

    #[test]
    fn test_queue_enqueue_slice_strings() {
        let mut sut = Queue::<String>::with_capacity(2).unwrap();
        let inputs: Vec<String> = (1..=5).map(|v| v.to_string()).collect();
        sut.enqueue_slice(&inputs).unwrap();
        assert_eq!(sut.capacity(), 8);
        let outputs: Vec<String> = sut.into_iter().collect();
        assert_eq!(outputs, inputs);
    }

    #[test]
    fn test_queue_resize_not_larger() {
        let mut sut = Queue::<usize>::with_capacity(8).unwrap();
        sut.enqueue(1).unwrap();
        assert_eq!(
            sut.resize(8),
            Err(Error::ResizeNotLarger {
                requested: 8,
                current: 8
            })
        );
        assert_eq!(
            sut.resize(4),
            Err(Error::ResizeNotLarger {
                requested: 4,
                current: 8
            })
        );
        assert_eq!(sut.capacity(), 8);
        assert_eq!(sut.len(), 1);
        assert_eq!(sut.dequeue(), Ok(1));
    }

    #[test]
    fn test_queue_resize_wrapped() {
        let mut sut = Queue::<usize>::with_capacity(8).unwrap();
        for value in 0..6 {
            sut.enqueue(value).unwrap();
        }
        for value in 0..4 {
            assert_eq!(sut.dequeue(), Ok(value));
        }
        // live elements now wrap around the end of the array
        for value in 6..12 {
            sut.enqueue(value).unwrap();
        }
        assert_eq!(sut.len(), 8);
        assert_eq!(sut.head, 3);
        assert_eq!(sut.tail, 3);
        sut.resize(13).unwrap();
        assert_eq!(sut.capacity(), 13);
        assert_eq!(sut.len(), 8);
        assert_eq!(sut.tail, 12);
        assert_eq!(sut.head, 7);
        let contents: Vec<usize> = sut.iter().copied().collect();
        assert_eq!(contents, (4..12).collect::<Vec<usize>>());
        for value in 12..17 {
            sut.enqueue(value).unwrap();
        }
        assert_eq!(sut.capacity(), 13);
        for value in 4..17 {
            assert_eq!(sut.dequeue(), Ok(value));
        }
        assert!(sut.is_empty());
    }

    #[test]
    fn test_queue_resize_unallocatable() {
        let mut sut = Queue::<u64>::with_capacity(4).unwrap();
        sut.enqueue(1).unwrap();
        assert_eq!(sut.resize(1 << 58), Err(Error::CapacityExceeded));
        assert_eq!(sut.capacity(), 4);
        assert_eq!(sut.len(), 1);
        assert_eq!(sut.dequeue(), Ok(1));
        assert!(sut.is_empty());
    }

    #[test]
    fn test_queue_resize_empty() {
        let mut sut = Queue::<usize>::with_capacity(4).unwrap();
        sut.enqueue(1).unwrap();
        sut.dequeue().unwrap();
        sut.resize(10).unwrap();
        assert_eq!(sut.capacity(), 10);
        assert!(sut.is_empty());
        sut.enqueue(2).unwrap();
        assert_eq!(sut.peek(), Ok(&2));
        assert_eq!(sut.dequeue(), Ok(2));
    }

    #[test]
    fn test_queue_capacity_one() {
        let mut sut = Queue::<usize>::with_capacity(1).unwrap();
        sut.enqueue(1).unwrap();
        assert_eq!(sut.capacity(), 1);
        sut.enqueue(2).unwrap();
        assert_eq!(sut.capacity(), 2);
        sut.enqueue(3).unwrap();
        assert_eq!(sut.capacity(), 4);
        for value in 1..=3 {
            assert_eq!(sut.dequeue(), Ok(value));
        }
    }

    #[test]
    fn test_queue_get_and_iter() {
        let mut sut = Queue::<usize>::with_capacity(4).unwrap();
        for value in 0..3 {
            sut.enqueue(value).unwrap();
        }
        sut.dequeue().unwrap();
        sut.enqueue(3).unwrap();
        sut.enqueue(4).unwrap();
        assert_eq!(sut.get(0), Some(&1));
        assert_eq!(sut.get(3), Some(&4));
        assert_eq!(sut.get(4), None);
        let mut iter = sut.iter();
        assert_eq!(iter.size_hint(), (4, Some(4)));
        assert_eq!(iter.next(), Some(&1));
        let rest: Vec<&usize> = iter.collect();
        assert_eq!(rest, vec![&2, &3, &4]);
        let mut total = 0;
        for value in &sut {
            total += value;
        }
        assert_eq!(total, 10);
    }

    #[test]
    fn test_queue_display() {
        let mut sut = Queue::<usize>::with_capacity(4).unwrap();
        sut.enqueue(1).unwrap();
        assert_eq!(
            sut.to_string(),
            "Queue(capacity: 4, head: 0, tail: 3, length: 1)"
        );
    }

    #[test]
    fn test_queue_clear_and_reuse() {
        let mut sut = Queue::<String>::with_capacity(10).unwrap();
        for _ in 0..7 {
            sut.enqueue(ulid::Ulid::new().to_string()).unwrap();
        }
        sut.clear();
        assert!(sut.is_empty());
        assert_eq!(sut.capacity(), 10);
        for _ in 0..7 {
            sut.enqueue(ulid::Ulid::new().to_string()).unwrap();
        }
        // move the front past the middle so the next batch wraps
        for _ in 0..5 {
            sut.dequeue().unwrap();
        }
        for _ in 0..7 {
            sut.enqueue(ulid::Ulid::new().to_string()).unwrap();
        }
        assert_eq!(sut.len(), 9);
        sut.clear();
        assert!(sut.is_empty());
        let value = ulid::Ulid::new().to_string();
        sut.enqueue(value.clone()).unwrap();
        assert_eq!(sut.dequeue(), Ok(value));
    }

    #[test]
    fn test_queue_drop_wrapped() {
        let mut sut = Queue::<String>::with_capacity(10).unwrap();
        for _ in 0..7 {
            sut.enqueue(ulid::Ulid::new().to_string()).unwrap();
        }
        while !sut.is_empty() {
            sut.dequeue().unwrap();
        }
        for _ in 0..7 {
            sut.enqueue(ulid::Ulid::new().to_string()).unwrap();
        }
        drop(sut);
    }

    #[test]
    fn test_queue_into_iter_partial() {
        let mut sut = Queue::<String>::new();
        for _ in 0..100 {
            sut.enqueue(ulid::Ulid::new().to_string()).unwrap();
        }
        let mut iter = sut.into_iter();
        for _ in 0..10 {
            assert!(iter.next().is_some());
        }
        assert_eq!(iter.size_hint(), (90, Some(90)));
        drop(iter);
    }

    #[test]
    fn test_queue_zero_sized() {
        let mut sut = Queue::<()>::with_capacity(2).unwrap();
        for _ in 0..5 {
            sut.enqueue(()).unwrap();
        }
        assert_eq!(sut.len(), 5);
        assert_eq!(sut.capacity(), 8);
        while sut.dequeue().is_ok() {}
        assert!(sut.is_empty());
    }

    #[test]
    fn test_queue_capacity_exceeded() {
        let largest = (MAX_CAPACITY >> 1) + 1;
        let mut sut = Queue::<()>::with_capacity(largest).unwrap();
        // pretend the queue is full, zero-sized slots need no values
        sut.length = largest;
        assert_eq!(sut.enqueue(()), Err(Error::CapacityExceeded));
        assert_eq!(sut.len(), largest);
        assert_eq!(sut.capacity(), largest);
        assert_eq!(sut.head, largest - 1);
        sut.length = 0;
    }

    #[test]
    fn test_queue_random_operations() {
        // compare against the standard library deque as an oracle
        let mut sut = Queue::<usize>::with_capacity(3).unwrap();
        let mut expected: VecDeque<usize> = VecDeque::new();
        for value in 0..50_000 {
            if rand::random_bool(0.6) {
                sut.enqueue(value).unwrap();
                expected.push_back(value);
            } else {
                match expected.pop_front() {
                    Some(front) => assert_eq!(sut.dequeue(), Ok(front)),
                    None => assert_eq!(sut.dequeue(), Err(Error::QueueEmpty)),
                }
            }
            assert_eq!(sut.len(), expected.len());
        }
        assert!(sut.iter().eq(expected.iter()));
    }
}
