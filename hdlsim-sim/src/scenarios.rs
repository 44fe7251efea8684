//! Built-in scenario catalog.

use std::fmt;
use std::str::FromStr;

use hdlsim_core::{ConfigError, Model, SimulationConfig};

use crate::models::{ClockedCounter, RandomStimulus, ScriptedModel};

/// Boxed model as run by the CLI.
pub type BoxedModel = Box<dyn Model>;

/// Named scenarios selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Clocked counter that calls `$finish`
    Counter,
    /// Seeded random stimulus that runs out of events
    Stimulus,
    /// Model with no events at all
    Idle,
}

impl Scenario {
    /// Every registered scenario in display order.
    pub const ALL: [Scenario; 3] = [Scenario::Counter, Scenario::Stimulus, Scenario::Idle];

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Scenario::Counter => "counter",
            Scenario::Stimulus => "stimulus",
            Scenario::Idle => "idle",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Scenario::Counter => "clocked counter, $finish after +cycles=N rising edges",
            Scenario::Stimulus => "seeded random bus stimulus, +events=N, ends when exhausted",
            Scenario::Idle => "no events; a single evaluation then exit",
        }
    }

    /// Builds the scenario's model from run configuration.
    ///
    /// # Errors
    ///
    /// - `HdlsimError::Config` - If a scenario plusarg is malformed
    /// - `HdlsimError::Model` - If the model cannot schedule its initial events
    pub fn build(self, config: &SimulationConfig) -> hdlsim_core::Result<BoxedModel> {
        let model: BoxedModel = match self {
            Scenario::Counter => Box::new(ClockedCounter::from_config(config)?),
            Scenario::Stimulus => Box::new(RandomStimulus::from_config(config)?),
            Scenario::Idle => Box::new(ScriptedModel::new()),
        };
        tracing::debug!(scenario = self.name(), "Model constructed");
        Ok(model)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: s.to_string(),
            })
    }
}
