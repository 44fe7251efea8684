//! Simulation context: logical time, the finish flag and run configuration.

use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::config::{ConfigError, SimulationConfig};
use crate::report::{ExitPath, RunStats, SimulationReport};
use crate::time::LogicalTime;

/// Time and completion state shared between the driver loop and the model.
pub trait Context {
    /// Returns true once the model has signaled completion.
    fn is_finished(&self) -> bool;

    /// Signals completion (`$finish`). The flag is never cleared.
    fn finish(&mut self);

    /// Current logical time.
    fn current_time(&self) -> LogicalTime;

    /// Moves the current time to `time`.
    ///
    /// Callers must never move time backwards.
    fn advance_time_to(&mut self, time: LogicalTime);

    /// Configuration this context was created with.
    fn config(&self) -> &SimulationConfig;

    /// Summarizes the run so far.
    fn stats_summary(&self, exit: ExitPath, stats: RunStats) -> SimulationReport;
}

/// Default [`Context`] implementation holding plain run state.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    config: SimulationConfig,
    time: LogicalTime,
    finished: bool,
    wall_start: Instant,
    started_at: DateTime<Utc>,
}

impl SimulationContext {
    /// Creates a context at time zero with the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        tracing::debug!(
            trace_enabled = config.trace_enabled,
            debug = config.debug,
            seed = config.seed,
            "Simulation context created"
        );
        Self {
            config,
            time: LogicalTime::ZERO,
            finished: false,
            wall_start: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Creates a context from command-line arguments.
    ///
    /// # Errors
    ///
    /// - `ConfigError` - If a runtime plusarg is malformed or unknown
    pub fn from_command_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::new(SimulationConfig::from_command_args(args)?))
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Context for SimulationContext {
    fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&mut self) {
        if !self.finished {
            tracing::debug!("$finish requested at t={}", self.time.ticks());
        }
        self.finished = true;
    }

    fn current_time(&self) -> LogicalTime {
        self.time
    }

    fn advance_time_to(&mut self, time: LogicalTime) {
        debug_assert!(
            time >= self.time,
            "Cannot advance time backwards: {} -> {}",
            self.time.ticks(),
            time.ticks()
        );
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
            self.wall_start.elapsed(),
            self.started_at,
        )
    }
}
