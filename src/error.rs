//
// Copyright (c) 2025 Nathan Fiedler
//

//! Error kinds shared by the queue and the max heap.

use thiserror::Error;

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the containers in this crate.
///
/// None of these leave a container in a modified state; every failing path
/// is detected before any slot or counter is touched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The capacity given at construction was zero.
    #[error("requested capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// Growing the backing array would exceed the representable capacity.
    #[error("capacity exceeded")]
    CapacityExceeded,

    /// Peek or delete on a heap with no elements.
    #[error("heap is empty")]
    HeapEmpty,

    /// Peek or dequeue on a queue with no elements.
    #[error("queue is empty")]
    QueueEmpty,

    /// An explicit resize asked for a capacity that is not an increase.
    #[error("new capacity {requested} is not larger than current capacity {current}")]
    ResizeNotLarger { requested: usize, current: usize },
}
