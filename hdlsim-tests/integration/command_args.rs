//! From plusargs to report.

use hdlsim_core::{
    ConfigError, EventLoop, ExitPath, HdlsimError, LogicalTime, SimulationConfig,
    SimulationContext, TimePrecision,
};
use hdlsim_sim::Scenario;

fn run(scenario: &str, args: &[&str]) -> hdlsim_core::Result<hdlsim_core::SimulationReport> {
    let mut config = SimulationConfig::from_command_args(args)?;
    config.time_precision = TimePrecision::Ns;

    let scenario: Scenario = scenario.parse()?;
    let model = scenario.build(&config)?;
    let context = SimulationContext::new(config);
    let outcome = EventLoop::new(context, model).run()?;
    Ok(outcome.report)
}

#[test]
fn test_counter_cycles_from_plusarg() {
    let report = run("counter", &["+cycles=2"]).unwrap();

    assert_eq!(report.exit, ExitPath::Finished);
    // Half period 5: rising edges at 5 and 15
    assert_eq!(report.final_time, LogicalTime::new(15));
    assert!(report.to_string().contains("$finish at 15ns"));
}

#[test]
fn test_seed_reaches_report_and_model() {
    let a = run("stimulus", &["+verilator+seed+99", "+events=12"]).unwrap();
    let b = run("stimulus", &["+events=12", "+verilator+seed+99"]).unwrap();

    assert_eq!(a.seed, 99);
    assert_eq!(a.final_time, b.final_time);
    assert_eq!(a.exit, ExitPath::Exhausted);
}

#[test]
fn test_idle_scenario_single_eval() {
    let report = run("idle", &[]).unwrap();

    assert_eq!(report.evals, 1);
    assert_eq!(report.time_advances, 0);
    assert_eq!(report.final_time, LogicalTime::ZERO);
}

#[test]
fn test_unknown_scenario_is_user_error() {
    let error = run("warp-drive", &[]).unwrap_err();
    assert!(error.is_user_error());
    assert!(matches!(
        error,
        HdlsimError::Config(ConfigError::UnknownScenario { .. })
    ));
}

#[test]
fn test_unknown_runtime_option_is_user_error() {
    let error = run("idle", &["+verilator+turbo"]).unwrap_err();
    assert!(matches!(
        error,
        HdlsimError::Config(ConfigError::UnknownRuntimeOption { .. })
    ));
}

#[test]
fn test_json_report_round_trips_key_fields() {
    let report = run("counter", &["+cycles=1", "+verilator+seed+3"]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["exit"], "finished");
    assert_eq!(json["final_time"], 5);
    assert_eq!(json["seed"], 3);
    assert_eq!(json["time_precision"], "ns");
}
