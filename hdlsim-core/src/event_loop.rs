//! Event-driven driver loop.
//!
//! Each iteration evaluates the model, stops if the model raised the finish
//! flag or has nothing left to do, and otherwise jumps logical time to the
//! model's next event. Finalization runs exactly once on both exit paths.

use crate::context::{Context, SimulationContext};
use crate::model::{Model, ModelFault};
use crate::report::{ExitPath, RunStats, SimulationReport};

/// Position of the loop in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Evaluating and advancing time
    Running,
    /// Stopped because the model had no events left
    Exhausted,
    /// Stopped because the model raised the finish flag
    Finished,
    /// Final blocks have run; terminal
    Finalized,
}

/// Result of a completed run, handing the context and model back to the caller.
#[derive(Debug)]
pub struct RunOutcome<C, M> {
    /// Statistics summary of the run
    pub report: SimulationReport,
    state: LoopState,
    context: C,
    model: M,
}

impl<C, M> RunOutcome<C, M> {
    /// Lifecycle state the loop ended in.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Context as it was at the end of the run.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Model as it was after finalization.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Splits the outcome into its parts.
    pub fn into_parts(self) -> (SimulationReport, C, M) {
        (self.report, self.context, self.model)
    }
}

/// Drives a model against a context until it finishes or runs out of events.
pub struct EventLoop<M, C = SimulationContext> {
    context: C,
    model: M,
    state: LoopState,
    stats: RunStats,
}

impl<M, C> EventLoop<M, C>
where
    C: Context,
    M: Model<C>,
{
    /// Creates a loop in the `Running` state.
    pub fn new(context: C, model: M) -> Self {
        Self {
            context,
            model,
            state: LoopState::Running,
            stats: RunStats::default(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Counters collected so far.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Shared access to the context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Shared access to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Runs the simulation to completion and finalizes the model.
    ///
    /// # Errors
    ///
    /// - `ModelFault` - Returned unchanged from `eval` or `finalize`; the model
    ///   is not called again afterwards
    pub fn run(mut self) -> Result<RunOutcome<C, M>, ModelFault> {
        let exit = self.drive()?;
        self.finalize(exit)?;

        let report = self.context.stats_summary(exit, self.stats);
        tracing::info!(
            exit = ?report.exit,
            final_time = report.final_time.ticks(),
            evals = report.evals,
            "Simulation complete"
        );

        Ok(RunOutcome {
            report,
            state: self.state,
            context: self.context,
            model: self.model,
        })
    }

    fn drive(&mut self) -> Result<ExitPath, ModelFault> {
        while !self.context.is_finished() {
            self.model.eval(&mut self.context)?;
            self.stats.evals += 1;

            // A finishing step never advances time
            if self.context.is_finished() {
                break;
            }

            if !self.model.events_pending() {
                break;
            }

            let next = self.model.next_time_slot();
            tracing::trace!(
                from = self.context.current_time().ticks(),
                to = next.ticks(),
                "Advancing time"
            );
            self.context.advance_time_to(next);
            self.stats.time_advances += 1;
        }

        if self.context.is_finished() {
            self.transition(LoopState::Finished);
            return Ok(ExitPath::Finished);
        }

        self.transition(LoopState::Exhausted);

        if self.context.config().debug {
            tracing::debug!(
                "Exiting without $finish; no events left at t={}",
                self.context.current_time().ticks()
            );
        }
        Ok(ExitPath::Exhausted)
    }

    fn finalize(&mut self, exit: ExitPath) -> Result<(), ModelFault> {
        tracing::debug!(?exit, "Running final blocks");
        self.model.finalize(&mut self.context)?;
        self.transition(LoopState::Finalized);
        Ok(())
    }

    fn transition(&mut self, next: LoopState) {
        tracing::trace!(from = ?self.state, to = ?next, "Loop state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::SimulationConfig;
    use crate::time::LogicalTime;

    /// Model replaying a fixed list of event times.
    #[derive(Debug, Default)]
    struct ReplayModel {
        pending: Vec<u64>,
        finish_on_eval: Option<u64>,
        fault_on_eval: Option<u64>,
        evals: u64,
        finals: u64,
        seen_times: Vec<u64>,
    }

    impl ReplayModel {
        fn with_events(times: &[u64]) -> Self {
            Self {
                pending: times.iter().rev().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl Model for ReplayModel {
        fn eval(&mut self, ctx: &mut SimulationContext) -> Result<(), ModelFault> {
            self.evals += 1;
            let now = ctx.current_time().ticks();
            self.seen_times.push(now);
            while self.pending.last().is_some_and(|t| *t <= now) {
                self.pending.pop();
            }
            if self.fault_on_eval == Some(self.evals) {
                return Err(ModelFault::Fatal {
                    message: "boom".to_string(),
                });
            }
            if self.finish_on_eval == Some(self.evals) {
                ctx.finish();
            }
            Ok(())
        }

        fn events_pending(&self) -> bool {
            !self.pending.is_empty()
        }

        fn next_time_slot(&self) -> LogicalTime {
            LogicalTime::new(self.pending.last().copied().unwrap_or_default())
        }

        fn finalize(&mut self, _ctx: &mut SimulationContext) -> Result<(), ModelFault> {
            self.finals += 1;
            Ok(())
        }
    }

    fn context() -> SimulationContext {
        SimulationContext::new(SimulationConfig::deterministic_testing())
    }

    #[test]
    fn test_new_loop_is_running() {
        let event_loop = EventLoop::new(context(), ReplayModel::default());
        assert_eq!(event_loop.state(), LoopState::Running);
        assert_eq!(event_loop.stats(), RunStats::default());
    }

    #[test]
    fn test_three_events_then_exhausted() {
        let outcome = EventLoop::new(context(), ReplayModel::with_events(&[1, 2, 3]))
            .run()
            .unwrap();

        let model = outcome.model();
        assert_eq!(model.seen_times, vec![0, 1, 2, 3]);
        assert_eq!(model.finals, 1);
        assert_eq!(outcome.state(), LoopState::Finalized);
        assert_eq!(outcome.report.exit, ExitPath::Exhausted);
        assert_eq!(outcome.report.final_time, LogicalTime::new(3));
        assert_eq!(outcome.report.time_advances, 3);
    }

    #[test]
    fn test_finish_on_second_eval() {
        let mut model = ReplayModel::with_events(&[10, 20, 30]);
        model.finish_on_eval = Some(2);

        let outcome = EventLoop::new(context(), model).run().unwrap();

        assert_eq!(outcome.model().evals, 2);
        assert_eq!(outcome.model().finals, 1);
        assert_eq!(outcome.report.exit, ExitPath::Finished);
        // No advance after the finishing step
        assert_eq!(outcome.context().current_time(), LogicalTime::new(10));
        assert_eq!(outcome.report.time_advances, 1);
    }

    #[test]
    fn test_no_events_single_eval() {
        let outcome = EventLoop::new(context(), ReplayModel::default())
            .run()
            .unwrap();

        assert_eq!(outcome.model().evals, 1);
        assert_eq!(outcome.model().finals, 1);
        assert_eq!(outcome.report.exit, ExitPath::Exhausted);
        assert_eq!(outcome.context().current_time(), LogicalTime::ZERO);
        assert_eq!(outcome.report.time_advances, 0);
    }

    #[test]
    fn test_already_finished_context_skips_eval() {
        let mut ctx = context();
        ctx.finish();

        let outcome = EventLoop::new(ctx, ReplayModel::with_events(&[1]))
            .run()
            .unwrap();

        assert_eq!(outcome.model().evals, 0);
        assert_eq!(outcome.model().finals, 1);
        assert_eq!(outcome.report.exit, ExitPath::Finished);
    }

    #[test]
    fn test_fault_propagates_without_finalize() {
        let mut model = ReplayModel::with_events(&[1, 2, 3]);
        model.fault_on_eval = Some(2);

        let result = EventLoop::new(context(), model).run();

        assert!(matches!(result, Err(ModelFault::Fatal { .. })));
    }

    #[test]
    fn test_boxed_model_runs() {
        let model: Box<ReplayModel> = Box::new(ReplayModel::with_events(&[5]));
        let outcome = EventLoop::new(context(), model).run().unwrap();

        assert_eq!(outcome.model().finals, 1);
        assert_eq!(outcome.report.final_time, LogicalTime::new(5));
    }

    /// Log sink shared between the test and a scoped subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_with_captured_logs(config: SimulationConfig, model: ReplayModel) -> (ExitPath, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let exit = tracing::subscriber::with_default(subscriber, || {
            EventLoop::new(SimulationContext::new(config), model)
                .run()
                .unwrap()
                .report
                .exit
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (exit, output)
    }

    const NO_FINISH_DIAGNOSTIC: &str = "Exiting without $finish";

    #[test]
    fn test_exhausted_diagnostic_emitted_in_debug_mode() {
        let config = SimulationConfig {
            debug: true,
            ..Default::default()
        };

        let (exit, logs) = run_with_captured_logs(config, ReplayModel::with_events(&[1, 2]));

        assert_eq!(exit, ExitPath::Exhausted);
        assert!(logs.contains(NO_FINISH_DIAGNOSTIC), "logs: {logs}");
        assert!(logs.contains("t=2"));
    }

    #[test]
    fn test_exhausted_diagnostic_silent_without_debug() {
        let config = SimulationConfig {
            debug: false,
            ..Default::default()
        };

        let (exit, logs) = run_with_captured_logs(config, ReplayModel::with_events(&[1, 2]));

        assert_eq!(exit, ExitPath::Exhausted);
        assert!(!logs.contains(NO_FINISH_DIAGNOSTIC), "logs: {logs}");
        // The subscriber did capture the run itself
        assert!(logs.contains("Running final blocks"));
    }

    #[test]
    fn test_no_diagnostic_when_model_finishes() {
        let config = SimulationConfig {
            debug: true,
            ..Default::default()
        };
        let mut model = ReplayModel::with_events(&[1, 2]);
        model.finish_on_eval = Some(2);

        let (exit, logs) = run_with_captured_logs(config, model);

        assert_eq!(exit, ExitPath::Finished);
        assert!(!logs.contains(NO_FINISH_DIAGNOSTIC), "logs: {logs}");
    }
}
