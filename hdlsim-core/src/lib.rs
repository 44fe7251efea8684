//! Hdlsim Core - Event-driven simulation driver
//!
//! This crate provides the pieces needed to run a discrete-event circuit
//! model: the simulation context that holds logical time and the finish flag,
//! the [`Model`] interface a circuit implements, and the [`EventLoop`] that
//! evaluates the model, advances time to its next event and finalizes it.
//!
//! ```rust
//! use hdlsim_core::{
//!     EventLoop, ExitPath, LogicalTime, Model, ModelFault, SimulationConfig, SimulationContext,
//! };
//!
//! struct Idle;
//!
//! impl Model for Idle {
//!     fn eval(&mut self, _ctx: &mut SimulationContext) -> Result<(), ModelFault> {
//!         Ok(())
//!     }
//!     fn events_pending(&self) -> bool {
//!         false
//!     }
//!     fn next_time_slot(&self) -> LogicalTime {
//!         LogicalTime::ZERO
//!     }
//!     fn finalize(&mut self, _ctx: &mut SimulationContext) -> Result<(), ModelFault> {
//!         Ok(())
//!     }
//! }
//!
//! let ctx = SimulationContext::new(SimulationConfig::default());
//! let outcome = EventLoop::new(ctx, Idle).run()?;
//! assert_eq!(outcome.report.exit, ExitPath::Exhausted);
//! # Ok::<(), ModelFault>(())
//! ```

pub mod config;
pub mod context;
pub mod event_loop;
pub mod model;
pub mod report;
pub mod time;
pub mod tracing_setup;

pub use config::{ConfigError, PlusArgs, SimulationConfig};
pub use context::{Context, SimulationContext};
pub use event_loop::{EventLoop, LoopState, RunOutcome};
pub use model::{Model, ModelFault};
pub use report::{ExitPath, RunStats, SimulationReport};
pub use time::{LogicalTime, TimePrecision};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that can bubble up from any Hdlsim subsystem.
#[derive(Debug, thiserror::Error)]
pub enum HdlsimError {
    #[error("Model fault: {0}")]
    Model(#[from] ModelFault),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HdlsimError {
    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(self, HdlsimError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, HdlsimError>;
