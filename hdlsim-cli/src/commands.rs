//! CLI command implementations

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use hdlsim_core::tracing_setup::{CliLogLevel, init_tracing};
use hdlsim_core::{
    ConfigError, EventLoop, Result, SimulationConfig, SimulationContext, SimulationReport,
    TimePrecision,
};
use hdlsim_sim::Scenario;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scenario until $finish or until no events remain
    Run(RunArgs),
    /// List built-in scenarios
    ListScenarios,
}

/// Options for `hdlsim run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario to simulate
    #[arg(short, long, default_value = "counter")]
    pub scenario: Scenario,
    /// Enable waveform capture
    #[arg(long)]
    pub trace: bool,
    /// Enable runtime debug diagnostics
    #[arg(long)]
    pub debug: bool,
    /// Seed for randomized models (overrides +verilator+seed+N)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Unit of one time tick in the report
    #[arg(long, default_value = "ps")]
    pub precision: TimePrecision,
    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn)]
    pub log_level: CliLogLevel,
    /// Directory for the full debug log
    #[arg(long)]
    pub logs_dir: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
    /// Runtime and user plusargs, e.g. +verilator+seed+7 +cycles=32
    pub plusargs: Vec<String>,
}

impl RunArgs {
    /// Builds the run configuration: plusargs first, then flag overrides.
    ///
    /// # Errors
    /// - `ConfigError` - A plusarg is malformed or an unknown runtime option
    pub fn config(&self) -> std::result::Result<SimulationConfig, ConfigError> {
        let mut config = SimulationConfig::from_command_args(&self.plusargs)?;
        config.trace_enabled |= self.trace;
        config.debug |= self.debug;
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.time_precision = self.precision;
        Ok(config)
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => {
            let config = args.config().context("Invalid command-line plusargs")?;

            init_tracing(
                args.log_level.with_debug(config.debug).as_tracing_level(),
                args.logs_dir.as_deref(),
            )
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

            let mut stdout = std::io::stdout().lock();
            run_scenario(args.scenario, config, args.json, &mut stdout)
                .with_context(|| format!("Simulation of {} failed", args.scenario))?;
            Ok(())
        }
        Commands::ListScenarios => {
            list_scenarios(&mut std::io::stdout().lock())?;
            Ok(())
        }
    }
}

/// Run a scenario and write its statistics summary to `out`
///
/// # Errors
/// - `HdlsimError::Config` - Scenario plusargs are malformed
/// - `HdlsimError::Model` - The model faulted during evaluation or finalization
/// - `HdlsimError::Report` - The report could not be serialized
/// - `HdlsimError::Io` - Writing the report failed
pub fn run_scenario(
    scenario: Scenario,
    config: SimulationConfig,
    json: bool,
    out: &mut impl Write,
) -> Result<SimulationReport> {
    tracing::info!(%scenario, trace = config.trace_enabled, seed = config.seed, "Starting simulation");

    let model = scenario.build(&config)?;
    let context = SimulationContext::new(config);
    let (report, _context, _model) = EventLoop::new(context, model).run()?.into_parts();

    if json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        writeln!(out, "{report}")?;
    }

    Ok(report)
}

/// List built-in scenarios
///
/// # Errors
/// - `std::io::Error` - Writing the listing failed
pub fn list_scenarios(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Available scenarios:")?;
    for scenario in Scenario::ALL {
        writeln!(out, "  {:<10} {}", scenario.name(), scenario.description())?;
    }
    Ok(())
}
