//! Tests for driving reference models through the event loop.

use hdlsim_core::{
    Context, EventLoop, ExitPath, LogicalTime, LoopState, ModelFault, SimulationConfig,
    SimulationContext,
};
use proptest::prelude::*;

use crate::{ClockedCounter, Scenario, ScriptedModel};

fn context() -> SimulationContext {
    SimulationContext::new(SimulationConfig::deterministic_testing())
}

#[test]
fn test_three_queued_events_exhaust() {
    let model = ScriptedModel::with_events([1, 2, 3]).unwrap();

    let outcome = EventLoop::new(context(), model).run().unwrap();
    let probe = outcome.model().probe();

    assert_eq!(
        probe.observed_times,
        vec![
            LogicalTime::new(0),
            LogicalTime::new(1),
            LogicalTime::new(2),
            LogicalTime::new(3)
        ]
    );
    assert_eq!(probe.events_consumed, 3);
    assert_eq!(probe.finalizations, 1);
    assert_eq!(outcome.report.exit, ExitPath::Exhausted);
    assert_eq!(outcome.state(), LoopState::Finalized);
}

#[test]
fn test_finish_on_second_eval() {
    let model = ScriptedModel::with_events([1, 2, 3])
        .unwrap()
        .finish_on_eval(2);

    let outcome = EventLoop::new(context(), model).run().unwrap();
    let probe = outcome.model().probe();

    assert_eq!(probe.evals, 2);
    assert_eq!(probe.finalizations, 1);
    assert_eq!(outcome.report.exit, ExitPath::Finished);
    assert!(outcome.context().is_finished());
    // Time stays where the finishing eval ran
    assert_eq!(outcome.context().current_time(), LogicalTime::new(1));
}

#[test]
fn test_no_events_from_start() {
    let outcome = EventLoop::new(context(), ScriptedModel::new())
        .run()
        .unwrap();
    let probe = outcome.model().probe();

    assert_eq!(probe.evals, 1);
    assert_eq!(probe.finalizations, 1);
    assert_eq!(outcome.report.exit, ExitPath::Exhausted);
    assert_eq!(outcome.report.time_advances, 0);
    assert_eq!(outcome.context().current_time(), LogicalTime::ZERO);
}

#[test]
fn test_finish_with_events_left_still_finalizes_once() {
    let model = ScriptedModel::with_events(1..=100)
        .unwrap()
        .finish_on_eval(10);

    let outcome = EventLoop::new(context(), model).run().unwrap();

    assert_eq!(outcome.model().probe().evals, 10);
    assert_eq!(outcome.model().probe().finalizations, 1);
    assert_eq!(outcome.report.exit, ExitPath::Finished);
}

#[test]
fn test_fault_stops_the_run() {
    let model = ScriptedModel::with_events([1, 2, 3])
        .unwrap()
        .fault_on_eval(3);

    let result = EventLoop::new(context(), model).run();

    match result {
        Err(ModelFault::Assertion { time, .. }) => assert_eq!(time, LogicalTime::new(2)),
        other => panic!("expected assertion fault, got {other:?}"),
    }
}

#[test]
fn test_counter_fault_on_short_run_surfaces() {
    // A finish flag raised by the context before the run starts means the
    // counter never reaches its target, so its final block asserts.
    let mut ctx = context();
    ctx.finish();

    let result = EventLoop::new(ctx, ClockedCounter::new(2, 5).unwrap()).run();
    assert!(matches!(result, Err(ModelFault::Assertion { .. })));
}

#[test]
fn test_every_scenario_runs_to_completion() {
    let config = SimulationConfig::from_command_args(["+cycles=3", "+events=5"]).unwrap();

    for scenario in Scenario::ALL {
        let model = scenario.build(&config).unwrap();
        let ctx = SimulationContext::new(config.clone());
        let outcome = EventLoop::new(ctx, model).run().unwrap();

        let expected = match scenario {
            Scenario::Counter => ExitPath::Finished,
            Scenario::Stimulus | Scenario::Idle => ExitPath::Exhausted,
        };
        assert_eq!(outcome.report.exit, expected, "scenario {scenario}");
    }
}

proptest! {
    #[test]
    fn prop_time_never_decreases(
        times in prop::collection::vec(0u64..10_000, 0..64),
        finish_at in prop::option::of(1u64..80),
    ) {
        let mut model = ScriptedModel::with_events(times.clone()).unwrap();
        if let Some(n) = finish_at {
            model = model.finish_on_eval(n);
        }

        let outcome = EventLoop::new(context(), model).run().unwrap();
        let probe = outcome.model().probe();

        prop_assert!(probe.observed_times.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(probe.finalizations, 1);
        prop_assert!(outcome.report.final_time.ticks() <= times.iter().copied().max().unwrap_or(0));
    }
}
