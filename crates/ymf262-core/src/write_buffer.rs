//! Timed register write queue.
//!
//! Buffered writes are spaced at least [`WRITE_BUFFER_DELAY`] samples apart
//! and applied in FIFO order once the sample counter reaches their scheduled
//! time. The queue is bounded; pushing into a full queue evicts the oldest
//! entry, which the caller must apply immediately.

use std::collections::VecDeque;

use crate::tables::{WRITE_BUFFER_CAPACITY, WRITE_BUFFER_DELAY};

/// A queued register write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferedWrite {
    /// Register address (9 bits).
    pub address: u16,
    /// Value to write.
    pub value: u8,
    /// Sample time at which the write takes effect.
    pub time: u64,
}

/// Register write FIFO.
#[derive(Clone, Debug)]
pub struct WriteBuffer {
    queue: VecDeque<BufferedWrite>,
    capacity: usize,
    sample_count: u64,
    last_time: u64,
}

impl WriteBuffer {
    /// Create an empty buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(WRITE_BUFFER_CAPACITY)
    }

    /// Create an empty buffer holding at most `capacity` writes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            sample_count: 0,
            last_time: 0,
        }
    }

    /// Number of pending writes.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no writes are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Current sample counter.
    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Pending writes in application order.
    pub fn pending(&self) -> impl Iterator<Item = &BufferedWrite> {
        self.queue.iter()
    }

    /// Schedule a write.
    ///
    /// Returns the evicted oldest entry when the queue was full. The sample
    /// counter jumps to that entry's time.
    pub fn push(&mut self, address: u16, value: u8) -> Option<BufferedWrite> {
        let evicted = if self.queue.len() >= self.capacity {
            let oldest = self.queue.pop_front();
            if let Some(write) = oldest {
                self.sample_count = write.time;
            }
            oldest
        } else {
            None
        };

        let time = (self.last_time + WRITE_BUFFER_DELAY).max(self.sample_count);
        self.last_time = time;
        self.queue.push_back(BufferedWrite {
            address: address & 0x1ff,
            value,
            time,
        });
        evicted
    }

    /// Remove the oldest write if it is due.
    pub fn pop_due(&mut self) -> Option<BufferedWrite> {
        match self.queue.front() {
            Some(write) if write.time <= self.sample_count => self.queue.pop_front(),
            _ => None,
        }
    }

    /// Advance the sample counter by one.
    #[inline]
    pub fn advance(&mut self) {
        self.sample_count += 1;
    }

    /// Drop pending writes and rewind the counters.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.sample_count = 0;
        self.last_time = 0;
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}
