//! Scripted model that replays a fixed event list and records how it was driven.

use hdlsim_core::{Context, LogicalTime, Model, ModelFault};

use crate::scheduler::{EventQueue, EventRegion, SchedulerError};

/// Record of every call the driver loop made into a [`ScriptedModel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelProbe {
    /// Number of `eval` calls
    pub evals: u64,
    /// Number of `finalize` calls
    pub finalizations: u64,
    /// Context time observed at each `eval`
    pub observed_times: Vec<LogicalTime>,
    /// Events consumed so far
    pub events_consumed: u64,
}

/// Model that consumes a predetermined list of event timestamps.
///
/// It can raise the finish flag or fault on a chosen evaluation, which makes
/// it the test double for driving the loop through each of its exit paths.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    queue: EventQueue<()>,
    finish_on_eval: Option<u64>,
    fault_on_eval: Option<u64>,
    probe: ModelProbe,
}

impl ScriptedModel {
    /// Creates a model with no events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model with events at the given timestamps.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::QueueOverflow` - Too many timestamps
    pub fn with_events<I>(times: I) -> Result<Self, SchedulerError>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut model = Self::new();
        for time in times {
            model
                .queue
                .schedule(LogicalTime::new(time), EventRegion::Active, ())?;
        }
        Ok(model)
    }

    /// Raises the finish flag during the `n`th evaluation (1-based).
    pub fn finish_on_eval(mut self, n: u64) -> Self {
        self.finish_on_eval = Some(n);
        self
    }

    /// Returns a fault from the `n`th evaluation (1-based).
    pub fn fault_on_eval(mut self, n: u64) -> Self {
        self.fault_on_eval = Some(n);
        self
    }

    /// Calls recorded so far.
    pub fn probe(&self) -> &ModelProbe {
        &self.probe
    }
}

impl<C: Context + ?Sized> Model<C> for ScriptedModel {
    fn eval(&mut self, ctx: &mut C) -> Result<(), ModelFault> {
        self.probe.evals += 1;
        let now = ctx.current_time();
        self.probe.observed_times.push(now);

        while self.queue.pop_due(now).is_some() {
            self.probe.events_consumed += 1;
        }

        if self.fault_on_eval == Some(self.probe.evals) {
            return Err(ModelFault::Assertion {
                message: format!("scripted fault on eval {}", self.probe.evals),
                time: now,
            });
        }

        if self.finish_on_eval == Some(self.probe.evals) {
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

    fn finalize(&mut self, _ctx: &mut C) -> Result<(), ModelFault> {
        self.probe.finalizations += 1;
        tracing::debug!(
            evals = self.probe.evals,
            events = self.probe.events_consumed,
            "Scripted model finalized"
        );
        Ok(())
    }
}
