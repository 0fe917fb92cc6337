// src/engine/queue.rs

use crate::errors::Result;

/// Bounded FIFO ring of task indices that are eligible for worker pickup.
///
/// The ring has one more slot than the number of tasks it must hold, so
/// `head == tail` always means empty and `tail + 1 == head` always means
/// full. A task index is never present twice: it is either queued, owned by
/// a worker, or idle, which is why `task count` slots are enough.
///
/// Not synchronised on its own; the scheduler keeps it behind its mutex.
#[derive(Debug)]
pub struct ReadyQueue {
    slots: Vec<usize>,
    head: usize,
    tail: usize,
}

impl ReadyQueue {
    /// Create a queue able to hold `tasks` indices at once.
    pub fn with_capacity(tasks: usize) -> Result<Self> {
        let len = tasks + 1;
        let mut slots = Vec::new();
        slots.try_reserve_exact(len)?;
        slots.resize(len, 0);
        Ok(Self {
            slots,
            head: 0,
            tail: 0,
        })
    }

    /// Maximum number of indices the queue can hold.
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        (self.tail + self.slots.len() - self.head) % self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        (self.tail + 1) % self.slots.len() == self.head
    }

    /// Append an index; hands it back if the queue is full.
    pub fn push(&mut self, index: usize) -> std::result::Result<(), usize> {
        if self.is_full() {
            return Err(index);
        }
        self.slots[self.tail] = index;
        self.tail = (self.tail + 1) % self.slots.len();
        Ok(())
    }

    pub fn pop(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let index = self.slots[self.head];
        self.head = (self.head + 1) % self.slots.len();
        Some(index)
    }

    /// Drop every queued index.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}
