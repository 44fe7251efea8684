//! Hdlsim Simulation Models - Deterministic scheduling and reference circuits.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
//!
//! This crate provides the pieces a model needs to own its event queue, plus
//! a handful of reference models used by the CLI and by tests:
//!
//! - **Event Queue**: time-ordered, region-aware, deterministic on ties
//! - **Seeded RNG**: ChaCha8 stimulus that replays identically per seed
//! - **Scripted Model**: test double that records every call from the loop
//! - **Clocked Counter**: testbench that ends with `$finish`
//! - **Random Stimulus**: generator that ends by running out of events
//!
//! # Example
//!
//! ```rust
//! use hdlsim_core::{EventLoop, ExitPath, SimulationConfig, SimulationContext};
//! use hdlsim_sim::ClockedCounter;
//!
//! let ctx = SimulationContext::new(SimulationConfig::default());
//! let counter = ClockedCounter::new(4, 5).unwrap();
//! let outcome = EventLoop::new(ctx, counter).run().unwrap();
//!
//! assert_eq!(outcome.report.exit, ExitPath::Finished);
//! assert_eq!(outcome.model().count(), 4);
//! ```

pub mod models;
pub mod scenarios;
pub mod scheduler;

pub use models::{ClockedCounter, ModelProbe, RandomStimulus, ScriptedModel};
pub use scenarios::{BoxedModel, Scenario};
pub use scheduler::{DeterministicRng, EventQueue, EventRegion, ScheduledEvent, SchedulerError};

#[cfg(test)]
mod tests;
