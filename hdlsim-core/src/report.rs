//! End-of-run statistics report.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::time::{LogicalTime, TimePrecision};

/// How the driver loop left its main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPath {
    /// The model raised the finish flag
    Finished,
    /// No events were left and the finish flag was never raised
    Exhausted,
}

/// Counters collected by the driver loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Number of model evaluations
    pub evals: u64,
    /// Number of event-driven time advances
    pub time_advances: u64,
}

/// Summary of a completed simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Exit path taken by the loop
    pub exit: ExitPath,
    /// Logical time when the loop ended
    pub final_time: LogicalTime,
    /// Unit of `final_time`
    pub time_precision: TimePrecision,
    /// Model evaluations performed
    pub evals: u64,
    /// Event-driven time advances performed
    pub time_advances: u64,
    /// Wall-clock seconds since the context was created
    pub walltime_secs: f64,
    /// Logical time units simulated per wall-clock second
    pub speed: f64,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Seed the run was configured with
    pub seed: u64,
    /// Whether waveform capture was active
    pub trace_enabled: bool,
}

impl SimulationReport {
    /// Builds a report from the final context state and loop counters.
    pub fn new(
        exit: ExitPath,
        final_time: LogicalTime,
        config: &SimulationConfig,
        stats: RunStats,
        walltime: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        let walltime_secs = walltime.as_secs_f64();
        let speed = if walltime_secs > 0.0 {
            final_time.ticks() as f64 / walltime_secs
        } else {
            0.0
        };

        Self {
            exit,
            final_time,
            time_precision: config.time_precision,
            evals: stats.evals,
            time_advances: stats.time_advances,
            walltime_secs,
            speed,
            started_at,
            seed: config.seed,
            trace_enabled: config.trace_enabled,
        }
    }

    /// Returns true if the model raised the finish flag.
    pub fn finished(&self) -> bool {
        self.exit == ExitPath::Finished
    }

    /// Renders the report as a JSON document.
    ///
    /// # Errors
    ///
    /// - `serde_json::Error` - If serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ending = match self.exit {
            ExitPath::Finished => "$finish at",
            ExitPath::Exhausted => "exhausted at",
        };

        writeln!(
            f,
            "- S i m u l a t i o n   R e p o r t: hdlsim {}",
            crate::VERSION
        )?;
        writeln!(
            f,
            "- hdlsim: {ending} {}; walltime {:.3} s; speed {:.3} {}/s",
            self.final_time.display(self.time_precision),
            self.walltime_secs,
            self.speed,
            self.time_precision
        )?;
        write!(
            f,
            "- hdlsim: {} evals; {} time advances; seed {}",
            self.evals, self.time_advances, self.seed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(exit: ExitPath, walltime: Duration) -> SimulationReport {
        let config = SimulationConfig {
            time_precision: TimePrecision::Ns,
            ..Default::default()
        };
        SimulationReport::new(
            exit,
            LogicalTime::new(3),
            &config,
            RunStats {
                evals: 4,
                time_advances: 3,
            },
            walltime,
            Utc::now(),
        )
    }

    #[test]
    fn test_summary_mentions_finish() {
        let report = sample_report(ExitPath::Finished, Duration::from_secs(1));
        let summary = report.to_string();

        assert!(summary.starts_with("- S i m u l a t i o n   R e p o r t: hdlsim"));
        assert!(summary.contains("$finish at 3ns"));
        assert!(summary.contains("speed 3.000 ns/s"));
        assert!(summary.contains("4 evals; 3 time advances; seed 0"));
        assert!(report.finished());
    }

    #[test]
    fn test_summary_mentions_exhaustion() {
        let report = sample_report(ExitPath::Exhausted, Duration::from_millis(500));

        assert!(report.to_string().contains("exhausted at 3ns"));
        assert!((report.speed - 6.0).abs() < f64::EPSILON);
        assert!(!report.finished());
    }

    #[test]
    fn test_zero_walltime_has_zero_speed() {
        let report = sample_report(ExitPath::Finished, Duration::ZERO);
        assert_eq!(report.speed, 0.0);
    }

    #[test]
    fn test_json_report_fields() {
        let report = sample_report(ExitPath::Exhausted, Duration::from_secs(1));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["exit"], "exhausted");
        assert_eq!(json["final_time"], 3);
        assert_eq!(json["time_precision"], "ns");
        assert_eq!(json["evals"], 4);
    }
}
