//! Interface between the driver loop and the circuit under simulation.

use thiserror::Error;

use crate::context::{Context, SimulationContext};
use crate::time::LogicalTime;

/// Fault raised by a model during evaluation or finalization.
///
/// Faults are fatal for the run. The driver loop returns them unchanged and
/// makes no further calls into the model.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelFault {
    /// An assertion inside the model failed
    #[error("Assertion failed at t={time}: {message}")]
    Assertion {
        /// Assertion message
        message: String,
        /// Logical time at which the assertion fired
        time: LogicalTime,
    },

    /// The model aborted for any other reason (`$fatal` and friends)
    #[error("Fatal model error: {message}")]
    Fatal {
        /// Description of the failure
        message: String,
    },
}

/// An evaluable circuit model.
///
/// The model owns its event queue. The driver loop only asks whether events
/// remain and when the earliest one is due.
pub trait Model<C: Context + ?Sized = SimulationContext> {
    /// Performs one evaluation step at the context's current time.
    ///
    /// May mutate the model's event queue and may call [`Context::finish`].
    ///
    /// # Errors
    ///
    /// - `ModelFault` - If the model hits an assertion or fatal condition
    fn eval(&mut self, ctx: &mut C) -> Result<(), ModelFault>;

    /// Returns true while the model has scheduled events left.
    fn events_pending(&self) -> bool;

    /// Timestamp of the earliest pending event.
    ///
    /// Only meaningful when [`Model::events_pending`] returns true.
    fn next_time_slot(&self) -> LogicalTime;

    /// Runs final blocks and releases model-owned resources. Called exactly once.
    ///
    /// # Errors
    ///
    /// - `ModelFault` - If a final block fails
    fn finalize(&mut self, ctx: &mut C) -> Result<(), ModelFault>;
}

impl<C: Context + ?Sized, M: Model<C> + ?Sized> Model<C> for Box<M> {
    fn eval(&mut self, ctx: &mut C) -> Result<(), ModelFault> {
        (**self).eval(ctx)
    }

    fn events_pending(&self) -> bool {
        (**self).events_pending()
    }

    fn next_time_slot(&self) -> LogicalTime {
        (**self).next_time_slot()
    }

    fn finalize(&mut self, ctx: &mut C) -> Result<(), ModelFault> {
        (**self).finalize(ctx)
    }
}
