//! Driver loop against a substitute context and the reference models.

use chrono::Utc;
use hdlsim_core::{
    Context, EventLoop, ExitPath, LogicalTime, RunStats, SimulationConfig, SimulationContext,
    SimulationReport,
};
use hdlsim_sim::{ClockedCounter, RandomStimulus, ScriptedModel};

/// Context that records every time advance it is asked to perform.
struct RecordingContext {
    config: SimulationConfig,
    time: LogicalTime,
    finished: bool,
    advances: Vec<LogicalTime>,
}

impl RecordingContext {
    fn new() -> Self {
        Self {
            config: SimulationConfig::deterministic_testing(),
            time: LogicalTime::ZERO,
            finished: false,
            advances: Vec::new(),
        }
    }
}

impl Context for RecordingContext {
    fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn current_time(&self) -> LogicalTime {
        self.time
    }

    fn advance_time_to(&mut self, time: LogicalTime) {
        self.advances.push(time);
        self.time = time;
    }

    fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn stats_summary(&self, exit: ExitPath, stats: RunStats) -> SimulationReport {
        SimulationReport::new(
            exit,
            self.time,
            &self.config,
            stats,
            std::time::Duration::ZERO,
            Utc::now(),
        )
    }
}

#[test]
fn test_substitute_context_sees_every_advance() {
    let model = ScriptedModel::with_events([1, 2, 3]).unwrap();

    let outcome = EventLoop::new(RecordingContext::new(), model).run().unwrap();

    assert_eq!(
        outcome.context().advances,
        vec![LogicalTime::new(1), LogicalTime::new(2), LogicalTime::new(3)]
    );
    assert_eq!(outcome.report.exit, ExitPath::Exhausted);
    assert_eq!(outcome.model().probe().finalizations, 1);
}

#[test]
fn test_counter_on_substitute_context() {
    let outcome = EventLoop::new(RecordingContext::new(), ClockedCounter::new(2, 3).unwrap())
        .run()
        .unwrap();

    // Edges every 3 ticks, rising edges at 3 and 9
    assert_eq!(
        outcome.context().advances,
        vec![LogicalTime::new(3), LogicalTime::new(6), LogicalTime::new(9)]
    );
    assert_eq!(outcome.report.exit, ExitPath::Finished);
}

#[test]
fn test_stimulus_report_counts() {
    let ctx = SimulationContext::new(SimulationConfig::deterministic_testing());
    let outcome = EventLoop::new(ctx, RandomStimulus::new(42, 10).unwrap())
        .run()
        .unwrap();

    let report = &outcome.report;
    assert_eq!(report.exit, ExitPath::Exhausted);
    assert_eq!(outcome.model().applied(), 10);
    // One eval at t=0 plus one per advance
    assert_eq!(report.evals, report.time_advances + 1);
    assert!(report.time_advances <= 10);
    assert!(report.to_string().contains("exhausted at"));
}
