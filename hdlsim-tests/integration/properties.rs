//! Property tests over the loop's termination contract.

use hdlsim_core::{EventLoop, ExitPath, SimulationConfig, SimulationContext};
use hdlsim_sim::{ClockedCounter, RandomStimulus, ScriptedModel};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_counter_finishes_on_last_rising_edge(cycles in 1u64..200, half_period in 1u64..50) {
        let ctx = SimulationContext::new(SimulationConfig::default());
        let outcome = EventLoop::new(ctx, ClockedCounter::new(cycles, half_period).unwrap())
            .run()
            .unwrap();

        prop_assert_eq!(outcome.report.exit, ExitPath::Finished);
        prop_assert_eq!(outcome.model().count(), cycles);
        prop_assert_eq!(outcome.report.final_time.ticks(), (2 * cycles - 1) * half_period);
    }

    #[test]
    fn prop_stimulus_always_exhausts(seed in any::<u64>(), events in 0u64..100) {
        let ctx = SimulationContext::new(SimulationConfig::default());
        let outcome = EventLoop::new(ctx, RandomStimulus::new(seed, events).unwrap())
            .run()
            .unwrap();

        prop_assert_eq!(outcome.report.exit, ExitPath::Exhausted);
        prop_assert_eq!(outcome.model().applied(), events);
    }

    #[test]
    fn prop_finalize_exactly_once(
        times in prop::collection::vec(0u64..1_000, 0..32),
        finish_at in prop::option::of(1u64..40),
    ) {
        let mut model = ScriptedModel::with_events(times).unwrap();
        if let Some(n) = finish_at {
            model = model.finish_on_eval(n);
        }

        let ctx = SimulationContext::new(SimulationConfig::default());
        let outcome = EventLoop::new(ctx, model).run().unwrap();
        let probe = outcome.model().probe();

        prop_assert_eq!(probe.finalizations, 1);
        if outcome.report.exit == ExitPath::Finished {
            prop_assert_eq!(Some(probe.evals), finish_at);
        }
    }
}
