//
// Copyright (c) 2025 Nathan Fiedler
//

//! Array-backed containers: a first-in, first-out queue implemented as a
//! circular buffer, and a binary max heap with an accompanying in-place heap
//! sort.
//!
//! Both containers keep their elements in a single contiguous array rather
//! than in linked nodes, trading an occasional O(n) copy when the array must
//! grow for better locality on every other operation. Neither container
//! depends on the other.
//!
//! # Memory Usage
//!
//! Each container allocates its full capacity up front and doubles it when an
//! insert finds the array full. Capacity never shrinks, even when the
//! container is emptied; removing elements only makes their slots available
//! again.
//!
//! # Performance
//!
//! | Operation | Queue | Max heap |
//! |-----------|-------|----------|
//! | insert    | amortized O(1) | O(log n), amortized |
//! | remove    | O(1)  | O(log n) |
//! | peek      | O(1)  | O(1)     |
//! | resize    | O(n)  | O(n)     |
//!
//! [`heap::sort()`] runs in O(n log n) time with no additional space.
//!
//! # Errors
//!
//! Every fallible operation returns a [`Result`] whose error is one of the
//! kinds in [`Error`]. A failed operation leaves the container exactly as it
//! was.
//!
//! # Safety
//!
//! The backing arrays are allocated and freed directly so that elements need
//! not implement `Default` or `Clone`, which means there are `unsafe` blocks
//! wherever slots are read or written. Neither container is synchronized;
//! share one across threads only behind a lock.

mod buffer;
mod error;
pub mod heap;
pub mod queue;

pub use error::{Error, Result};
pub use heap::{MaxHeap, sort};
pub use queue::Queue;
