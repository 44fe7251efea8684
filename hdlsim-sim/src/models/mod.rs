//! Reference models for exercising the driver loop.

mod counter;
mod scripted;
mod stimulus;

pub use counter::{ClockedCounter, CYCLES_PLUSARG, DEFAULT_CYCLES, DEFAULT_HALF_PERIOD};
pub use scripted::{ModelProbe, ScriptedModel};
pub use stimulus::{DEFAULT_EVENTS, EVENTS_PLUSARG, MAX_GAP, RandomStimulus};
