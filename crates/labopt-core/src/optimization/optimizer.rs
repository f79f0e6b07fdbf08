//! The iterative optimiser loop.
//!
//! An optimisation run starts at a position, repeatedly asks a
//! [`StepStrategy`] for the next position and records every position and its
//! objective value until either
//!
//! - every coordinate moved by less than the tolerance in the last step
//!   ([`TerminationReason::Converged`]), or
//! - the optional iteration cap is reached
//!   ([`TerminationReason::MaxIterations`]).
//!
//! The cap counts steps: with `max_iterations = Some(m)` the trajectory holds
//! at most `m + 1` positions, and `Some(0)` returns just the start. Without a
//! cap the loop runs until convergence, however long that takes; such runs
//! are logged with a warning when they start.
//!
//! Errors raised by the objective or the strategy abort the run and are
//! returned unchanged.
//!
//! # Example
//!
//! ```rust
//! use labopt_core::prelude::*;
//!
//! #[derive(Debug)]
//! struct HalfwayToOrigin;
//!
//! impl StepStrategy<f64> for HalfwayToOrigin {
//!     fn step<O: Objective<f64> + ?Sized>(
//!         &self,
//!         position: &DVector<f64>,
//!         _objective: &O,
//!     ) -> OptimizerResult<DVector<f64>> {
//!         Ok(position * 0.5)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "HalfwayToOrigin"
//!     }
//! }
//!
//! let objective = QuadraticObjective::<f64>::simple(2);
//! let start = DVector::from_vec(vec![1.0, -1.0]);
//!
//! let result = optimise(&start, 1e-3, &objective, &HalfwayToOrigin, Some(100))?;
//! assert!(result.converged());
//! assert_eq!(result.trajectory().len(), result.values().len());
//! # Ok::<(), labopt_core::error::OptimizerError>(())
//! ```

use crate::core::{
    error::OptimizerResult,
    objective::Objective,
    types::{DVector, Scalar},
};
use crate::optimization::{
    line_search::check_positive,
    observer::{ProgressObserver, TracingObserver},
    trajectory::{OptimisationResult, TerminationReason, Trajectory},
};
use num_traits::Float;
use std::fmt::Debug;
use tracing::{debug, warn};

/// Computes the next position of an optimisation run.
///
/// Strategies own whatever configuration they need (line search, cutoffs)
/// and ask the objective only for the capabilities they use.
pub trait StepStrategy<T: Scalar>: Debug {
    /// Returns the position following `position`.
    fn step<O>(&self, position: &DVector<T>, objective: &O) -> OptimizerResult<DVector<T>>
    where
        O: Objective<T> + ?Sized;

    /// Name of the strategy.
    fn name(&self) -> &str;
}

impl<T: Scalar, S: StepStrategy<T> + ?Sized> StepStrategy<T> for &S {
    fn step<O>(&self, position: &DVector<T>, objective: &O) -> OptimizerResult<DVector<T>>
    where
        O: Objective<T> + ?Sized,
    {
        (**self).step(position, objective)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// When an optimisation run stops.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoppingCriterion<T: Scalar> {
    /// Converged once every coordinate moves by less than this.
    pub tolerance: T,

    /// Maximum number of steps, or `None` to run until convergence.
    pub max_iterations: Option<usize>,
}

impl<T: Scalar> Default for StoppingCriterion<T> {
    fn default() -> Self {
        Self {
            tolerance: T::DEFAULT_TOLERANCE,
            max_iterations: Some(1000),
        }
    }
}

impl<T: Scalar> StoppingCriterion<T> {
    /// Creates a criterion with the default tolerance and cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-coordinate tolerance.
    pub fn with_tolerance(mut self, tol: T) -> Self {
        self.tolerance = tol;
        self
    }

    /// Sets the maximum number of steps.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = Some(max_iter);
        self
    }

    /// Removes the iteration cap.
    pub fn unbounded(mut self) -> Self {
        self.max_iterations = None;
        self
    }

    /// Validates the criterion. The tolerance must be positive and finite.
    pub fn validate(&self) -> OptimizerResult<()> {
        check_positive(self.tolerance, "tolerance")
    }

    fn has_converged(&self, previous: &DVector<T>, next: &DVector<T>) -> bool {
        previous
            .iter()
            .zip(next.iter())
            .all(|(&a, &b)| <T as Float>::abs(b - a) < self.tolerance)
    }
}

/// Couples a step strategy with a stopping criterion.
#[derive(Debug, Clone)]
pub struct Optimiser<S, T: Scalar = f64> {
    strategy: S,
    criterion: StoppingCriterion<T>,
}

impl<S, T> Optimiser<S, T>
where
    T: Scalar,
    S: StepStrategy<T>,
{
    /// Creates an optimiser with the default stopping criterion.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            criterion: StoppingCriterion::default(),
        }
    }

    /// Replaces the stopping criterion.
    pub fn with_criterion(mut self, criterion: StoppingCriterion<T>) -> Self {
        self.criterion = criterion;
        self
    }

    /// The step strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The stopping criterion.
    pub fn criterion(&self) -> &StoppingCriterion<T> {
        &self.criterion
    }

    /// Minimises `objective` from `start`, logging progress through
    /// `tracing`.
    pub fn run<O>(&self, objective: &O, start: &DVector<T>) -> OptimizerResult<OptimisationResult<T>>
    where
        O: Objective<T> + ?Sized,
    {
        self.run_with_observer(objective, start, &mut TracingObserver::default())
    }

    /// Minimises `objective` from `start`, reporting each step to
    /// `observer`.
    pub fn run_with_observer<O, P>(
        &self,
        objective: &O,
        start: &DVector<T>,
        observer: &mut P,
    ) -> OptimizerResult<OptimisationResult<T>>
    where
        O: Objective<T> + ?Sized,
        P: ProgressObserver<T> + ?Sized,
    {
        self.criterion.validate()?;

        let criterion = &self.criterion;
        if criterion.max_iterations.is_none() {
            warn!(
                strategy = self.strategy.name(),
                objective = objective.name(),
                "no iteration cap set; running until convergence"
            );
        }

        let start_value = objective.value(start)?;
        let mut trajectory = Trajectory::new(start.clone(), start_value);
        observer.on_start(start, start_value);

        let capped = |i: usize| criterion.max_iterations.is_some_and(|max| i >= max);

        let mut i = 0;
        let termination = loop {
            if capped(i) {
                break TerminationReason::MaxIterations;
            }

            let current = trajectory.last_position();
            let next = self.strategy.step(current, objective)?;
            let value = objective.value(&next)?;
            let converged = criterion.has_converged(current, &next);
            trajectory.push(next, value)?;
            i += 1;

            if converged {
                break TerminationReason::Converged;
            }
            if capped(i) {
                break TerminationReason::MaxIterations;
            }
            observer.on_step(i, value);
        };

        debug!(
            strategy = self.strategy.name(),
            iterations = i,
            reason = ?termination,
            value = %trajectory.last_value(),
            "optimisation terminated"
        );

        let result = OptimisationResult::new(trajectory, termination);
        observer.on_finish(&result);
        Ok(result)
    }
}

/// Minimises `objective` from `start` with `strategy`.
///
/// Stops once every coordinate moves by less than `tolerance` in one step,
/// or after `max_iterations` steps if a cap is given. Progress is logged
/// through `tracing`.
pub fn optimise<T, O, S>(
    start: &DVector<T>,
    tolerance: T,
    objective: &O,
    strategy: &S,
    max_iterations: Option<usize>,
) -> OptimizerResult<OptimisationResult<T>>
where
    T: Scalar,
    O: Objective<T> + ?Sized,
    S: StepStrategy<T> + ?Sized,
{
    let criterion = StoppingCriterion {
        tolerance,
        max_iterations,
    };
    Optimiser::new(strategy)
        .with_criterion(criterion)
        .run(objective, start)
}
