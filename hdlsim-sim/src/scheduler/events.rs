//! Scheduled events and their ordering.

use std::cmp::Ordering;

use hdlsim_core::LogicalTime;

/// Scheduling region within a single time slot.
///
/// Events at the same timestamp fire in region order, earliest region first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventRegion {
    /// Blocking assignments and process wakeups
    Active = 0,
    /// Nonblocking assignment updates
    NonBlocking = 1,
    /// Monitors and strobes, after the slot has settled
    Postponed = 2,
}

/// Event waiting in a model's queue.
#[derive(Debug, Clone)]
pub struct ScheduledEvent<T> {
    /// Insertion order, breaks ties deterministically
    pub id: u64,
    /// Time slot the event belongs to
    pub time: LogicalTime,
    /// Region within the time slot
    pub region: EventRegion,
    /// Model-specific payload
    pub payload: T,
}

impl<T> ScheduledEvent<T> {
    /// Creates new scheduled event.
    pub fn new(id: u64, time: LogicalTime, region: EventRegion, payload: T) -> Self {
        Self {
            id,
            time,
            region,
            payload,
        }
    }

    fn sort_key(&self) -> (LogicalTime, EventRegion, u64) {
        (self.time, self.region, self.id)
    }
}

impl<T> Eq for ScheduledEvent<T> {}

impl<T> PartialEq for ScheduledEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Ord for ScheduledEvent<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the earliest (time, region, id) first
        other.sort_key().cmp(&self.sort_key())
    }
}

impl<T> PartialOrd for ScheduledEvent<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
