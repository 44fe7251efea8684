//! Clocked counter testbench.
//!
//! A clock generator toggles every half period. Each rising edge schedules a
//! nonblocking increment of the counter in the same time slot, and with
//! tracing on, a postponed sample that sees the settled count. Once the
//! counter reaches its target the testbench calls `$finish`.

use hdlsim_core::{Context, HdlsimError, LogicalTime, Model, ModelFault, SimulationConfig};

use crate::scheduler::{EventQueue, EventRegion, SchedulerError};

/// Plusarg overriding the number of cycles (`+cycles=N`).
pub const CYCLES_PLUSARG: &str = "cycles=";

/// Default number of rising edges before `$finish`.
pub const DEFAULT_CYCLES: u64 = 16;

/// Default clock half period in ticks.
pub const DEFAULT_HALF_PERIOD: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CounterEvent {
    ClockEdge,
    Increment,
    Sample,
}

/// Counter driven by a free-running clock; finishes after `cycles` rising edges.
#[derive(Debug)]
pub struct ClockedCounter {
    queue: EventQueue<CounterEvent>,
    half_period: u64,
    cycles: u64,
    clk: bool,
    count: u64,
    trace: bool,
    last_sample: Option<(LogicalTime, u64)>,
    finalized: bool,
}

impl ClockedCounter {
    /// Creates a counter that finishes after `cycles` rising edges.
    ///
    /// # Errors
    ///
    /// - `SchedulerError` - If the first clock edge cannot be scheduled
    pub fn new(cycles: u64, half_period: u64) -> Result<Self, SchedulerError> {
        let half_period = half_period.max(1);
        let mut queue = EventQueue::new();
        queue.schedule(
            LogicalTime::new(half_period),
            EventRegion::Active,
            CounterEvent::ClockEdge,
        )?;

        Ok(Self {
            queue,
            half_period,
            cycles,
            clk: false,
            count: 0,
            trace: false,
            last_sample: None,
            finalized: false,
        })
    }

    /// Creates a counter from run configuration, honoring `+cycles=N`.
    ///
    /// # Errors
    ///
    /// - `HdlsimError::Config` - If `+cycles=` is not a number
    /// - `HdlsimError::Model` - If the first clock edge cannot be scheduled
    pub fn from_config(config: &SimulationConfig) -> hdlsim_core::Result<Self> {
        let cycles = config
            .plusargs
            .parse_value::<u64>(CYCLES_PLUSARG)?
            .unwrap_or(DEFAULT_CYCLES);

        let mut counter = Self::new(cycles, DEFAULT_HALF_PERIOD)
            .map_err(|e| HdlsimError::Model(e.into()))?;
        counter.trace = config.trace_enabled;
        Ok(counter)
    }

    /// Rising edges counted so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of rising edges after which the counter finishes.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Time and count of the most recent postponed sample, when tracing.
    pub fn last_sample(&self) -> Option<(LogicalTime, u64)> {
        self.last_sample
    }

    /// Returns true once final blocks have run.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn handle(&mut self, event: CounterEvent, now: LogicalTime) -> Result<(), SchedulerError> {
        match event {
            CounterEvent::ClockEdge => {
                self.clk = !self.clk;
                self.queue.schedule(
                    now.saturating_add(self.half_period),
                    EventRegion::Active,
                    CounterEvent::ClockEdge,
                )?;
                if self.clk {
                    self.queue
                        .schedule(now, EventRegion::NonBlocking, CounterEvent::Increment)?;
                    if self.trace {
                        self.queue
                            .schedule(now, EventRegion::Postponed, CounterEvent::Sample)?;
                    }
                }
            }
            CounterEvent::Increment => self.count += 1,
            CounterEvent::Sample => {
                tracing::trace!(t = now.ticks(), count = self.count, "clock edge");
                self.last_sample = Some((now, self.count));
            }
        }
        Ok(())
    }
}

impl<C: Context + ?Sized> Model<C> for ClockedCounter {
    fn eval(&mut self, ctx: &mut C) -> Result<(), ModelFault> {
        let now = ctx.current_time();
        while let Some(event) = self.queue.pop_due(now) {
            self.handle(event.payload, now)?;
        }

        if self.count >= self.cycles {
            tracing::debug!(count = self.count, t = now.ticks(), "Counter reached target");
            ctx.finish();
        }
        Ok(())
    }

    fn events_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    fn next_time_slot(&self) -> LogicalTime {
        self.queue.next_time().unwrap_or_default()
    }

    fn finalize(&mut self, ctx: &mut C) -> Result<(), ModelFault> {
        if self.count < self.cycles {
            return Err(ModelFault::Assertion {
                message: format!(
                    "counter stopped at {} of {} cycles",
                    self.count, self.cycles
                ),
                time: ctx.current_time(),
            });
        }
        tracing::info!(count = self.count, "Counter final value");
        self.finalized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hdlsim_core::{ConfigError, EventLoop, ExitPath, SimulationContext};

    use super::*;

    #[test]
    fn test_counter_finishes_after_cycles() {
        let ctx = SimulationContext::new(SimulationConfig::deterministic_testing());
        let counter = ClockedCounter::new(3, 5).unwrap();

        let outcome = EventLoop::new(ctx, counter).run().unwrap();

        assert_eq!(outcome.report.exit, ExitPath::Finished);
        assert_eq!(outcome.model().count(), 3);
        assert!(outcome.model().is_finalized());
        // Rising edges at 5, 15, 25
        assert_eq!(outcome.report.final_time, LogicalTime::new(25));
    }

    #[test]
    fn test_zero_cycles_finishes_immediately() {
        let ctx = SimulationContext::default();
        let outcome = EventLoop::new(ctx, ClockedCounter::new(0, 5).unwrap())
            .run()
            .unwrap();

        assert_eq!(outcome.report.evals, 1);
        assert_eq!(outcome.report.final_time, LogicalTime::ZERO);
    }

    #[test]
    fn test_cycles_from_plusarg() {
        let config = SimulationConfig::from_command_args(["+cycles=4"]).unwrap();
        let counter = ClockedCounter::from_config(&config).unwrap();
        assert_eq!(counter.cycles(), 4);

        let default = ClockedCounter::from_config(&SimulationConfig::default()).unwrap();
        assert_eq!(default.cycles(), DEFAULT_CYCLES);
    }

    #[test]
    fn test_bad_cycles_plusarg() {
        let config = SimulationConfig::from_command_args(["+cycles=many"]).unwrap();
        let error = ClockedCounter::from_config(&config).unwrap_err();
        assert!(error.is_user_error());
        assert!(matches!(
            error,
            HdlsimError::Config(ConfigError::InvalidPlusArg { .. })
        ));
    }

    #[test]
    fn test_scheduler_failure_is_not_a_user_error() {
        let error = HdlsimError::Model(SchedulerError::QueueOverflow { count: 1 }.into());
        assert!(!error.is_user_error());
        assert!(error.to_string().contains("Event queue overflow"));
    }

    #[test]
    fn test_postponed_sample_sees_nonblocking_update() {
        let mut config = SimulationConfig::from_command_args(["+cycles=2"]).unwrap();
        config.trace_enabled = true;
        let counter = ClockedCounter::from_config(&config).unwrap();

        let outcome = EventLoop::new(SimulationContext::new(config), counter)
            .run()
            .unwrap();

        // Second rising edge at 15; the sample runs after the increment
        assert_eq!(
            outcome.model().last_sample(),
            Some((LogicalTime::new(15), 2))
        );
    }

    #[test]
    fn test_no_samples_without_trace() {
        let ctx = SimulationContext::default();
        let outcome = EventLoop::new(ctx, ClockedCounter::new(2, 5).unwrap())
            .run()
            .unwrap();

        assert_eq!(outcome.model().last_sample(), None);
    }

    #[test]
    fn test_finalize_asserts_on_short_run() {
        let mut counter = ClockedCounter::new(2, 5).unwrap();
        let mut ctx = SimulationContext::default();

        let result = Model::<SimulationContext>::finalize(&mut counter, &mut ctx);
        assert!(matches!(result, Err(ModelFault::Assertion { .. })));
    }
}
