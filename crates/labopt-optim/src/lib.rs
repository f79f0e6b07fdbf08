//! Step strategies for the labopt optimiser loop.
//!
//! This crate provides concrete implementations of the `StepStrategy` trait
//! from `labopt-core`. Both strategies choose a search direction and hand it
//! to a line search that picks the step length.
//!
//! # Available Strategies
//!
//! - **Newton**: least-squares solve of `H d = -g`, needs gradient and Hessian
//! - **Steepest descent**: direction `-g`, needs only the gradient
//!
//! # Examples
//!
//! ```rust
//! use labopt_core::prelude::*;
//! use labopt_optim::{Newton, NewtonConfig};
//!
//! let strategy = Newton::new(NewtonConfig::new());
//! let start = DVector::from_vec(vec![-1.2, 1.0]);
//!
//! let result = optimise(&start, 1e-6, &Rosenbrock, &strategy, Some(100))?;
//! assert!(result.converged());
//! assert!((result.final_position() - Rosenbrock::minimiser::<f64>()).amax() < 1e-4);
//! # Ok::<(), labopt_core::error::OptimizerError>(())
//! ```

pub mod newton;
pub mod steepest_descent;

// Re-export main strategies for convenience
pub use newton::{newton_direction, Newton, NewtonConfig};
pub use steepest_descent::{SteepestDescent, SteepestDescentConfig};

// Re-export commonly used items from core
pub use labopt_core::optimization::{
    line_search::{FixedStep, LineSearch, LineSearchParams, SimplexLineSearch},
    optimizer::StepStrategy,
};
