//! Time-ordered event queue owned by a model.

use std::collections::BinaryHeap;

use hdlsim_core::{LogicalTime, ModelFault};
use thiserror::Error;

use super::events::{EventRegion, ScheduledEvent};

/// Maximum number of events that can be scheduled at once.
pub const MAX_EVENT_QUEUE_SIZE: usize = 100_000;

/// Errors that can occur while scheduling events.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Event queue exceeded maximum capacity
    #[error("Event queue overflow: {count} events scheduled")]
    QueueOverflow {
        /// Number of events already queued
        count: usize,
    },

    /// Event requested before the time already reached
    #[error("Cannot schedule event at t={requested} before t={now}")]
    InPast {
        /// Requested timestamp in ticks
        requested: u64,
        /// Time already reached in ticks
        now: u64,
    },
}

impl From<SchedulerError> for ModelFault {
    fn from(error: SchedulerError) -> Self {
        ModelFault::Fatal {
            message: error.to_string(),
        }
    }
}

/// Min-queue of scheduled events keyed by `(time, region, insertion order)`.
#[derive(Debug)]
pub struct EventQueue<T> {
    heap: BinaryHeap<ScheduledEvent<T>>,
    next_id: u64,
    now: LogicalTime,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    /// Creates an empty queue at time zero.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_id: 0,
            now: LogicalTime::ZERO,
        }
    }

    /// Schedules `payload` at `time` in the given region.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::QueueOverflow` - Queue is at capacity
    /// - `SchedulerError::InPast` - `time` is earlier than the last popped time
    pub fn schedule(
        &mut self,
        time: LogicalTime,
        region: EventRegion,
        payload: T,
    ) -> Result<u64, SchedulerError> {
        if self.heap.len() >= MAX_EVENT_QUEUE_SIZE {
            return Err(SchedulerError::QueueOverflow {
                count: self.heap.len(),
            });
        }
        if time < self.now {
            return Err(SchedulerError::InPast {
                requested: time.ticks(),
                now: self.now.ticks(),
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.heap
            .push(ScheduledEvent::new(id, time, region, payload));
        Ok(id)
    }

    /// Pops the earliest event if it is due at or before `now`.
    pub fn pop_due(&mut self, now: LogicalTime) -> Option<ScheduledEvent<T>> {
        if now > self.now {
            self.now = now;
        }
        if self.heap.peek().is_some_and(|event| event.time <= now) {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Timestamp of the earliest queued event.
    pub fn next_time(&self) -> Option<LogicalTime> {
        self.heap.peek().map(|event| event.time)
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
