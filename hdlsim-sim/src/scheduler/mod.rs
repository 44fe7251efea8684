//! Deterministic event scheduling used by the reference models.

mod events;
mod queue;
mod rng;

pub use events::{EventRegion, ScheduledEvent};
pub use queue::{EventQueue, MAX_EVENT_QUEUE_SIZE, SchedulerError};
pub use rng::DeterministicRng;
