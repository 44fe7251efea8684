//! Logical simulation time and the precision it is reported in.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::ConfigError;

/// Simulation time in time-precision units.
///
/// Unrelated to wall-clock time. The driver loop only ever moves it forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LogicalTime(u64);

impl LogicalTime {
    /// Time zero, where every run starts.
    pub const ZERO: Self = Self(0);

    /// Creates a logical time from a raw tick count.
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick count.
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns this time shifted forward by `delta` ticks, saturating at the maximum.
    pub const fn saturating_add(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Pairs this time with a precision for display.
    pub fn display(self, precision: TimePrecision) -> DisplayTime {
        DisplayTime {
            time: self,
            precision,
        }
    }
}

impl fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LogicalTime {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

/// Unit represented by a single [`LogicalTime`] tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePrecision {
    /// Seconds
    S,
    /// Milliseconds
    Ms,
    /// Microseconds
    Us,
    /// Nanoseconds
    Ns,
    /// Picoseconds
    #[default]
    Ps,
    /// Femtoseconds
    Fs,
}

impl TimePrecision {
    /// Unit suffix as printed in reports.
    pub fn suffix(self) -> &'static str {
        match self {
            TimePrecision::S => "s",
            TimePrecision::Ms => "ms",
            TimePrecision::Us => "us",
            TimePrecision::Ns => "ns",
            TimePrecision::Ps => "ps",
            TimePrecision::Fs => "fs",
        }
    }
}

impl fmt::Display for TimePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for TimePrecision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" => Ok(TimePrecision::S),
            "ms" => Ok(TimePrecision::Ms),
            "us" => Ok(TimePrecision::Us),
            "ns" => Ok(TimePrecision::Ns),
            "ps" => Ok(TimePrecision::Ps),
            "fs" => Ok(TimePrecision::Fs),
            _ => Err(ConfigError::UnknownPrecision {
                unit: s.to_string(),
            }),
        }
    }
}

/// A [`LogicalTime`] rendered with its unit, e.g. `42ns`.
#[derive(Debug, Clone, Copy)]
pub struct DisplayTime {
    time: LogicalTime,
    precision: TimePrecision,
}

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time.ticks(), self.precision)
    }
}
