//! Simulation configuration and runtime plusargs.
//!
//! Configuration is built once, before the model is constructed, and handed to
//! [`SimulationContext`](crate::SimulationContext) by value. Nothing here is
//! process-global, so independent runs can coexist in one test binary.

use thiserror::Error;

use crate::time::TimePrecision;

/// Prefix reserved for options consumed by the simulator runtime itself.
const RUNTIME_PREFIX: &str = "+verilator+";

/// Errors raised while building a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A recognized runtime option carried an unparsable value
    #[error("Invalid value for plusarg {arg}: {reason}")]
    InvalidPlusArg {
        /// Offending argument as given
        arg: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A `+verilator+` option the runtime does not know
    #[error("Unknown runtime option: {arg}")]
    UnknownRuntimeOption {
        /// Offending argument as given
        arg: String,
    },

    /// Time precision unit not recognized
    #[error("Unknown time precision: {unit}")]
    UnknownPrecision {
        /// Unit as given
        unit: String,
    },

    /// No scenario registered under this name
    #[error("Unknown scenario: {name}")]
    UnknownScenario {
        /// Name as given
        name: String,
    },
}

/// User plusargs (`+name`, `+name=value`) in command-line order.
///
/// Stored without the leading `+`. Queries follow the usual HDL semantics:
/// prefix matching, last match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlusArgs {
    args: Vec<String>,
}

impl PlusArgs {
    /// Creates an empty plusarg set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plusarg; a leading `+` is stripped if present.
    pub fn push(&mut self, arg: impl Into<String>) {
        let mut arg = arg.into();
        if arg.starts_with('+') {
            arg.remove(0);
        }
        self.args.push(arg);
    }

    /// Returns true if any plusarg starts with `prefix` (`$test$plusargs`).
    pub fn test(&self, prefix: &str) -> bool {
        self.args.iter().any(|arg| arg.starts_with(prefix))
    }

    /// Returns the text following `prefix` in the last matching plusarg (`$value$plusargs`).
    pub fn value(&self, prefix: &str) -> Option<&str> {
        self.args
            .iter()
            .rev()
            .find_map(|arg| arg.strip_prefix(prefix))
    }

    /// Parses the value following `prefix` as `T`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPlusArg` - If the value exists but does not parse
    pub fn parse_value<T>(&self, prefix: &str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.value(prefix) {
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidPlusArg {
                    arg: format!("+{prefix}{raw}"),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Number of stored plusargs.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns true when no plusargs were given.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Iterates over stored plusargs without their leading `+`.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str)
    }
}

/// Configuration for a single simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Whether waveform capture is active for this run
    pub trace_enabled: bool,
    /// Emit runtime diagnostics such as exhaustion without `$finish`
    pub debug: bool,
    /// Seed for models that draw random numbers
    pub seed: u64,
    /// Unit of one logical time tick in reports
    pub time_precision: TimePrecision,
    /// User plusargs forwarded to the model
    pub plusargs: PlusArgs,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trace_enabled: false,
            debug: false,
            seed: 0,
            time_precision: TimePrecision::Ps,
            plusargs: PlusArgs::new(),
        }
    }
}

impl SimulationConfig {
    /// Creates a configuration for deterministic testing.
    pub fn deterministic_testing() -> Self {
        Self {
            trace_enabled: false,
            debug: true, // Surface exhaustion diagnostics in tests
            seed: 42,    // Fixed seed for reproducible tests
            time_precision: TimePrecision::Ns,
            plusargs: PlusArgs::new(),
        }
    }

    /// Creates a configuration with waveform capture switched on.
    pub fn tracing() -> Self {
        Self {
            trace_enabled: true,
            ..Default::default()
        }
    }

    /// Builds a configuration from command-line arguments.
    ///
    /// Runtime options use the `+verilator+` prefix:
    /// `+verilator+debug`, `+verilator+debugi+<level>`, `+verilator+seed+<n>`.
    /// Any other `+` argument is kept as a user plusarg. Arguments without a
    /// leading `+` belong to other tools and are skipped.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPlusArg` - If a runtime option value does not parse
    /// - `ConfigError::UnknownRuntimeOption` - If a `+verilator+` option is not recognized
    pub fn from_command_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        config.apply_command_args(args)?;
        Ok(config)
    }

    /// Applies command-line arguments on top of this configuration.
    ///
    /// # Errors
    ///
    /// See [`SimulationConfig::from_command_args`].
    pub fn apply_command_args<I, S>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if let Some(option) = arg.strip_prefix(RUNTIME_PREFIX) {
                self.apply_runtime_option(arg, option)?;
            } else if arg.starts_with('+') {
                self.plusargs.push(arg);
            } else {
                tracing::trace!("Ignoring non-plusarg argument: {arg}");
            }
        }
        Ok(())
    }

    fn apply_runtime_option(&mut self, arg: &str, option: &str) -> Result<(), ConfigError> {
        if option == "debug" {
            self.debug = true;
        } else if let Some(level) = option.strip_prefix("debugi+") {
            let level: u32 = parse_option_value(arg, level)?;
            self.debug = level > 0;
        } else if let Some(seed) = option.strip_prefix("seed+") {
            self.seed = parse_option_value(arg, seed)?;
        } else {
            return Err(ConfigError::UnknownRuntimeOption {
                arg: arg.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_option_value<T>(arg: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidPlusArg {
        arg: arg.to_string(),
        reason: e.to_string(),
    })
}
