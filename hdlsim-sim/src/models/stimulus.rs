//! Random stimulus generator.

use hdlsim_core::{ConfigError, Context, LogicalTime, Model, ModelFault, SimulationConfig};

use crate::scheduler::{DeterministicRng, EventQueue, EventRegion, SchedulerError};

/// Plusarg overriding the number of stimulus events (`+events=N`).
pub const EVENTS_PLUSARG: &str = "events=";

/// Default number of stimulus events.
pub const DEFAULT_EVENTS: u64 = 32;

/// Largest gap between consecutive stimulus events, in ticks.
pub const MAX_GAP: u64 = 20;

/// Chance that an event lands in the previous event's slot as a nonblocking write.
pub const BURST_PROBABILITY: f64 = 0.25;

/// Drives seeded random bytes onto a bus and never calls `$finish`.
///
/// The run ends when the last stimulus event has been applied.
#[derive(Debug)]
pub struct RandomStimulus {
    queue: EventQueue<u8>,
    applied: u64,
    checksum: u64,
    bus: u8,
}

impl RandomStimulus {
    /// Pre-schedules `events` random bytes at random gaps drawn from `seed`.
    ///
    /// Some events are bursts: they share the previous event's time slot and
    /// drive the bus from the nonblocking region, so they win that slot.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::QueueOverflow` - If `events` exceeds queue capacity
    pub fn new(seed: u64, events: u64) -> Result<Self, SchedulerError> {
        let mut rng = DeterministicRng::from_seed(seed);
        let mut queue = EventQueue::new();
        let mut time = LogicalTime::ZERO;

        for index in 0..events {
            let region = if index > 0 && rng.random_bool(BURST_PROBABILITY) {
                EventRegion::NonBlocking
            } else {
                time = time.saturating_add(rng.random_range(1, MAX_GAP + 1));
                EventRegion::Active
            };
            let value = rng.next_u64().to_le_bytes()[0];
            queue.schedule(time, region, value)?;
        }

        Ok(Self {
            queue,
            applied: 0,
            checksum: 0,
            bus: 0,
        })
    }

    /// Creates stimulus from run configuration, honoring `+events=N` and the seed.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPlusArg` - If `+events=` is not a number or too large
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let events = config
            .plusargs
            .parse_value::<u64>(EVENTS_PLUSARG)?
            .unwrap_or(DEFAULT_EVENTS);

        Self::new(config.seed, events).map_err(|e| ConfigError::InvalidPlusArg {
            arg: format!("+{EVENTS_PLUSARG}{events}"),
            reason: e.to_string(),
        })
    }

    /// Stimulus events applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Order-sensitive checksum of every value driven so far.
    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    /// Value currently on the bus.
    pub fn bus(&self) -> u8 {
        self.bus
    }
}

impl<C: Context + ?Sized> Model<C> for RandomStimulus {
    fn eval(&mut self, ctx: &mut C) -> Result<(), ModelFault> {
        let now = ctx.current_time();
        while let Some(event) = self.queue.pop_due(now) {
            self.bus = event.payload;
            self.applied += 1;
            self.checksum = self
                .checksum
                .rotate_left(5)
                .wrapping_add(u64::from(event.payload) ^ now.ticks());
            if ctx.config().trace_enabled {
                tracing::trace!(t = now.ticks(), bus = self.bus, "stimulus applied");
            }
        }
        Ok(())
    }

    fn events_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    fn next_time_slot(&self) -> LogicalTime {
        self.queue.next_time().unwrap_or_default()
    }

    fn finalize(&mut self, _ctx: &mut C) -> Result<(), ModelFault> {
        tracing::info!(
            applied = self.applied,
            bus = self.bus,
            checksum = %format!("{:#018x}", self.checksum),
            "Stimulus complete"
        );
        Ok(())
    }
}
