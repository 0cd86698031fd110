//
// Copyright (c) 2025 Nathan Fiedler
//

//! Binary max heap stored in a single array, along with an in-place heap sort
//! built on the same sink operation.
//!
//! The tree is kept in slots `1..=size` of the array so that the parent of the
//! node in slot `i` is in slot `i / 2` and its children are in slots `2i` and
//! `2i + 1`. Slot zero is never used.

use crate::buffer::{MAX_CAPACITY, RawBuffer};
use crate::error::{Error, Result};
use std::fmt;
use tracing::{debug, warn};

/// Capacity of a heap constructed by [`MaxHeap::new()`].
pub const DEFAULT_CAPACITY: usize = 32;

/// Binary max heap whose capacity is always a power of two.
///
/// Because slot zero is reserved, a heap holds at most `capacity - 1`
/// elements before it doubles.
pub struct MaxHeap<T> {
    /// slots of the tree, `capacity` in number
    buffer: RawBuffer<T>,
    /// number of elements, which is also the slot of the last element
    size: usize,
}

impl<T: Ord> MaxHeap<T> {
    /// Return an empty heap with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY).expect("unexpected overflow")
    }

    /// Return an empty heap with the requested capacity rounded up to the
    /// next power of two.
    ///
    /// Returns `InvalidCapacity` if `requested` is zero, or
    /// `CapacityExceeded` if rounding up leaves the representable range.
    pub fn with_capacity(requested: usize) -> Result<Self> {
        if requested < 1 {
            return Err(Error::InvalidCapacity(requested));
        }
        let capacity = requested
            .checked_next_power_of_two()
            .filter(|power| *power <= MAX_CAPACITY)
            .ok_or(Error::CapacityExceeded)?;
        Ok(Self {
            buffer: RawBuffer::new(capacity)?,
            size: 0,
        })
    }

    /// Insert an element into the heap, doubling the capacity first if the
    /// array has no free slot.
    ///
    /// Returns `CapacityExceeded` if the heap cannot grow, in which case the
    /// heap is unchanged and the element is dropped.
    ///
    /// # Time complexity
    ///
    /// O(log n), plus O(n) on the inserts that double the capacity.
    pub fn insert(&mut self, elem: T) -> Result<()> {
        if self.size + 1 >= self.capacity() {
            let grown = self
                .capacity()
                .checked_mul(2)
                .ok_or(Error::CapacityExceeded)
                .and_then(|new_capacity| self.resize(new_capacity));
            if let Err(err) = grown {
                warn!(capacity = self.capacity(), "heap cannot grow any further");
                return Err(err);
            }
        }
        self.size += 1;
        unsafe { self.buffer.write(self.size, elem) }
        sift_up(self.tree_mut());
        Ok(())
    }

    /// Reference to the largest element, leaving it in the heap.
    ///
    /// Returns `HeapEmpty` if there are no elements.
    pub fn peek(&self) -> Result<&T> {
        if self.size == 0 {
            Err(Error::HeapEmpty)
        } else {
            Ok(unsafe { self.buffer.get(1) })
        }
    }

    /// Remove and return the largest element.
    ///
    /// Returns `HeapEmpty` if there are no elements.
    ///
    /// # Time complexity
    ///
    /// O(log n)
    pub fn delete(&mut self) -> Result<T> {
        if self.size == 0 {
            return Err(Error::HeapEmpty);
        }
        let last = self.size;
        self.size -= 1;
        let max = unsafe { self.buffer.read(1) };
        if last > 1 {
            // the last leaf becomes the root and sinks to its level
            let leaf = unsafe { self.buffer.read(last) };
            unsafe { self.buffer.write(1, leaf) }
            sink(self.tree_mut(), 1);
        }
        Ok(max)
    }

    /// Move the tree into a larger array. The slot of every element stays
    /// the same, so heap order is unaffected.
    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let current = self.capacity();
        if new_capacity <= current {
            return Err(Error::ResizeNotLarger {
                requested: new_capacity,
                current,
            });
        }
        let mut buffer = RawBuffer::new(new_capacity)?;
        for index in 1..=self.size {
            unsafe { buffer.write(index, self.buffer.read(index)) }
        }
        self.buffer = buffer;
        debug!(
            old_capacity = current,
            new_capacity,
            size = self.size,
            "heap backing array resized"
        );
        Ok(())
    }
}

impl<T> MaxHeap<T> {
    /// Returns the elements in array order, the root first.
    pub fn as_slice(&self) -> &[T] {
        unsafe { self.buffer.slice(1, self.size) }
    }

    /// Remove and drop all elements. The capacity is unchanged.
    pub fn clear(&mut self) {
        let size = self.size;
        self.size = 0;
        unsafe { self.buffer.drop_range(1, size) }
    }

    /// Return the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Same as `len()`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns true if the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn tree_mut(&mut self) -> &mut [T] {
        unsafe { self.buffer.slice_mut(1, self.size) }
    }
}

impl<T: Ord> Default for MaxHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for MaxHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MaxHeap(capacity: {}, size: {})",
            self.capacity(),
            self.size,
        )
    }
}

impl<T> Drop for MaxHeap<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Sort the slice in place into non-decreasing order using heap sort.
///
/// The first element is a placeholder that is neither read nor moved; only
/// `data[1..]` is sorted. Slices with fewer than two elements after the
/// placeholder are left alone. The sort is not stable.
///
/// # Time complexity
///
/// O(n log n) with no additional space.
pub fn sort<T: Ord>(data: &mut [T]) {
    if data.len() <= 2 {
        return;
    }
    let tree = &mut data[1..];
    let mut size = tree.len();
    for parent in (1..=size / 2).rev() {
        sink(tree, parent);
    }
    // Move the max to the end of the unsorted region, shrink the region by
    // one, then restore heap order in what remains.
    while size > 1 {
        tree.swap(0, size - 1);
        size -= 1;
        sink(&mut tree[..size], 1);
    }
}

// The helpers below take the tree as a slice holding positions 1..=len at
// offsets 0..len, so position p lives at tree[p - 1].

/// Move the last element toward the root while it is larger than its parent.
fn sift_up<T: Ord>(tree: &mut [T]) {
    let mut child = tree.len();
    while child > 1 {
        let parent = child / 2;
        if tree[child - 1] <= tree[parent - 1] {
            break;
        }
        tree.swap(child - 1, parent - 1);
        child = parent;
    }
}

/// Move the element at `parent` toward the leaves while a child is larger.
fn sink<T: Ord>(tree: &mut [T], mut parent: usize) {
    let size = tree.len();
    while parent * 2 <= size {
        // pick the larger child, checking the right child only if it exists
        let mut child = parent * 2;
        if child < size && tree[child] > tree[child - 1] {
            child += 1;
        }
        if tree[parent - 1] >= tree[child - 1] {
            break;
        }
        tree.swap(child - 1, parent - 1);
        parent = child;
    }
}
