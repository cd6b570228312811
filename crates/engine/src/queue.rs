// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-capacity FIFO ring buffer.
//!
//! The queue itself is not synchronized. The scheduler keeps it behind a
//! single mutex so enqueue and dequeue never interleave.

use thiserror::Error;

/// Errors from queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("queue is full")]
    Full,
    #[error("queue is empty")]
    Empty,
}

/// Circular FIFO with a capacity fixed at construction.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl<T> BoundedQueue<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Append at the tail. Returns the number of queued items afterwards.
    pub fn enqueue(&mut self, item: T) -> Result<usize, QueueError> {
        if self.count == self.capacity() {
            return Err(QueueError::Full);
        }
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
        Ok(self.count)
    }

    /// Remove and return the head (the oldest queued item).
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.count == 0 {
            return Err(QueueError::Empty);
        }
        let item = self.slots[self.head].take().ok_or(QueueError::Empty)?;
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        Ok(item)
    }

    /// The item the next `dequeue` would return.
    pub fn peek(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
