//
// Copyright (c) 2025 Nathan Fiedler
//

//! Fixed-capacity block of uninitialized slots.
//!
//! The buffer does not know which of its slots hold values. The containers
//! built on it track that themselves and must move or drop every live value
//! before the buffer goes away; dropping the buffer only frees the memory.

use crate::error::{Error, Result};
use std::alloc::{Layout, alloc, dealloc};
use std::ptr::NonNull;

/// Largest number of slots that any buffer may have.
pub(crate) const MAX_CAPACITY: usize = isize::MAX as usize;

pub(crate) struct RawBuffer<T> {
    /// allocated block of `capacity` slots, dangling when nothing is allocated
    buffer: NonNull<T>,
    /// number of slots in the block
    capacity: usize,
}

// The buffer owns its slots exclusively, the same as a Vec would.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Allocate a buffer with the given number of slots.
    ///
    /// Returns `CapacityExceeded` if the slots could not be described by a
    /// valid allocation layout, or if the allocator could not provide them.
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        if capacity > MAX_CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        let layout = Layout::array::<T>(capacity).map_err(|_| Error::CapacityExceeded)?;
        let buffer = if layout.size() == 0 {
            // zero-sized types and empty buffers never touch the allocator
            NonNull::dangling()
        } else {
            let ptr = unsafe { alloc(layout).cast::<T>() };
            NonNull::new(ptr).ok_or(Error::CapacityExceeded)?
        };
        Ok(Self { buffer, capacity })
    }

    /// Returns the number of slots in the buffer.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move a value into the slot at `index` without dropping what was there.
    ///
    /// # Safety
    ///
    /// `index` must be less than the capacity. Any live value in the slot is
    /// leaked.
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        debug_assert!(index < self.capacity);
        unsafe { std::ptr::write(self.buffer.as_ptr().add(index), value) }
    }

    /// Move the value out of the slot at `index`.
    ///
    /// # Safety
    ///
    /// The slot must hold a live value, and the caller must treat the slot as
    /// vacant afterward.
    pub(crate) unsafe fn read(&self, index: usize) -> T {
        debug_assert!(index < self.capacity);
        unsafe { std::ptr::read(self.buffer.as_ptr().add(index)) }
    }

    /// Reference to the value in the slot at `index`.
    ///
    /// # Safety
    ///
    /// The slot must hold a live value.
    pub(crate) unsafe fn get(&self, index: usize) -> &T {
        debug_assert!(index < self.capacity);
        unsafe { &*self.buffer.as_ptr().add(index) }
    }

    /// Shared slice over `len` slots starting at `start`.
    ///
    /// # Safety
    ///
    /// Every slot in the range must hold a live value.
    pub(crate) unsafe fn slice(&self, start: usize, len: usize) -> &[T] {
        debug_assert!(start + len <= self.capacity);
        unsafe { std::slice::from_raw_parts(self.buffer.as_ptr().add(start), len) }
    }

    /// Mutable slice over `len` slots starting at `start`.
    ///
    /// # Safety
    ///
    /// Every slot in the range must hold a live value.
    pub(crate) unsafe fn slice_mut(&mut self, start: usize, len: usize) -> &mut [T] {
        debug_assert!(start + len <= self.capacity);
        unsafe { std::slice::from_raw_parts_mut(self.buffer.as_ptr().add(start), len) }
    }

    /// Drop the values in `len` slots starting at `start`, leaving the slots
    /// vacant.
    ///
    /// # Safety
    ///
    /// Every slot in the range must hold a live value, and none of them may
    /// be read again until rewritten.
    pub(crate) unsafe fn drop_range(&mut self, start: usize, len: usize) {
        use std::ptr::{drop_in_place, slice_from_raw_parts_mut};

        debug_assert!(start + len <= self.capacity);
        if len > 0 && std::mem::needs_drop::<T>() {
            unsafe {
                drop_in_place(slice_from_raw_parts_mut(
                    self.buffer.as_ptr().add(start),
                    len,
                ));
            }
        }
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        // the layout was validated when the buffer was allocated
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            if layout.size() != 0 {
                unsafe { dealloc(self.buffer.as_ptr().cast::<u8>(), layout) }
            }
        }
    }
}
