//! Progress observers.
//!
//! The optimiser notifies an observer after every step that did not end the
//! run. Observers are passive: they cannot stop or alter the optimisation.
//! Any `FnMut(usize, T)` closure is an observer.

use crate::core::types::{DVector, Scalar};
use crate::optimization::trajectory::OptimisationResult;
use tracing::info;

/// Receives progress notifications from the optimiser.
pub trait ProgressObserver<T: Scalar> {
    /// Called once with the start position and its value.
    fn on_start(&mut self, start: &DVector<T>, value: T) {
        let _ = (start, value);
    }

    /// Called with the index and value of each new, non-final position.
    fn on_step(&mut self, iteration: usize, value: T);

    /// Called once the run has terminated.
    fn on_finish(&mut self, result: &OptimisationResult<T>) {
        let _ = result;
    }
}

/// An observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl<T: Scalar> ProgressObserver<T> for NoOpObserver {
    fn on_step(&mut self, _iteration: usize, _value: T) {}
}

/// Logs progress through `tracing` at info level.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    every: usize,
}

impl TracingObserver {
    /// Logs every `every`-th step. Zero is treated as one.
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<T: Scalar> ProgressObserver<T> for TracingObserver {
    fn on_start(&mut self, start: &DVector<T>, value: T) {
        info!(dimension = start.len(), value = %value, "starting optimisation");
    }

    fn on_step(&mut self, iteration: usize, value: T) {
        if iteration % self.every == 0 {
            info!(iteration, value = %value, "optimisation step");
        }
    }

    fn on_finish(&mut self, result: &OptimisationResult<T>) {
        info!(
            iterations = result.iterations(),
            termination = ?result.termination,
            value = %result.final_value(),
            "optimisation complete"
        );
    }
}

impl<T, F> ProgressObserver<T> for F
where
    T: Scalar,
    F: FnMut(usize, T),
{
    fn on_step(&mut self, iteration: usize, value: T) {
        self(iteration, value)
    }
}
