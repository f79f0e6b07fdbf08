//! Core traits and types for iterative numerical optimisation.
//!
//! This crate provides the building blocks of a small unconstrained
//! minimiser: an objective interface with optional derivatives, a
//! finite-difference gradient adapter, a derivative-free line search and the
//! loop that drives a step strategy until the iterates stop moving.
//!
//! # Key Concepts
//!
//! - **Objectives**: scalar functions of a position that may also report
//!   their gradient and Hessian
//! - **Step strategies**: rules that map one position to the next
//! - **Trajectories**: the append-only record of visited positions and their
//!   values
//!
//! # Modules
//!
//! - [`core`]: Scalars, errors, objectives and finite differences
//! - [`functions`]: Ready-made objectives (Rosenbrock, likelihoods)
//! - [`optimization`]: Line search, observers and the optimiser loop
//!
//! Step strategies live in `labopt-optim`.

pub mod core;
pub mod functions;
pub mod optimization;

pub use crate::core::error;
pub use crate::core::types;

// Re-export commonly used items at the crate root
pub use crate::core::error::{ObjectiveError, OptimizerError, OptimizerResult, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use labopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::error::{ObjectiveError, OptimizerError, OptimizerResult, Result};
    pub use crate::core::finite_difference::{forward_difference_gradient, FiniteDifference};
    pub use crate::core::objective::{
        CountingObjective, DerivativeChecker, Objective, QuadraticObjective,
    };
    pub use crate::core::types::{constants, DMatrix, DVector, Position, Scalar};
    pub use crate::functions::{LogisticRegressionNll, NormalNll, Rosenbrock};
    pub use crate::optimization::line_search::{
        line_search, minimize_scalar, FixedStep, LineSearch, LineSearchParams, LineSearchResult,
        ScalarMinimum, SimplexLineSearch,
    };
    pub use crate::optimization::observer::{NoOpObserver, ProgressObserver, TracingObserver};
    pub use crate::optimization::optimizer::{optimise, Optimiser, StepStrategy, StoppingCriterion};
    pub use crate::optimization::trajectory::{OptimisationResult, TerminationReason, Trajectory};
}
