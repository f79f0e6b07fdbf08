//! Line-search based numerical minimisation.
//!
//! `labopt` bundles the core abstractions of [`labopt_core`] with the step
//! strategies of [`labopt_optim`]:
//!
//! - an [`Objective`](prelude::Objective) trait with a required value and
//!   optional gradient and Hessian
//! - a forward finite-difference adapter for objectives without a gradient
//! - a derivative-free Nelder–Mead line search
//! - Newton and steepest-descent strategies
//! - the optimiser loop, which records every visited position and value
//!
//! # Example
//!
//! ```rust
//! use labopt::prelude::*;
//!
//! let start = DVector::from_vec(vec![1.2, 1.2]);
//! let result = optimise(&start, 1e-6, &Rosenbrock, &Newton::default(), Some(100))?;
//!
//! assert!(result.converged());
//! assert_eq!(result.trajectory_matrix().nrows(), result.value_vector().len());
//! # Ok::<(), OptimizerError>(())
//! ```

pub use labopt_core;
pub use labopt_optim;

pub use nalgebra;

/// Everything needed to define an objective and minimise it.
pub mod prelude {
    pub use labopt_core::prelude::*;
    pub use labopt_optim::{
        newton_direction, Newton, NewtonConfig, SteepestDescent, SteepestDescentConfig,
    };
}
