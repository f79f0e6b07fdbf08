//! Line search along a fixed direction.
//!
//! Given a start position `x`, an update direction `d` and an objective `f`,
//! a line search chooses the offset `α` of the new position `x + α d`. The
//! default strategy, [`SimplexLineSearch`], minimises
//!
//! ```text
//! φ(α) = f(x + α d)
//! ```
//!
//! with a derivative-free one-dimensional Nelder–Mead simplex started at
//! `α = 0`. Only objective values are used, so the search works the same for
//! analytic and finite-difference objectives, and it does not require `d` to
//! be a descent direction: the offset may come out negative.
//!
//! [`FixedStep`] skips the search and always moves by a constant offset.
//!
//! # Example
//!
//! ```rust
//! use labopt_core::prelude::*;
//!
//! let objective = QuadraticObjective::<f64>::simple(2);
//! let start = DVector::from_vec(vec![1.0, 1.0]);
//! let direction = DVector::from_vec(vec![-1.0, -1.0]);
//!
//! let next = line_search(&start, &direction, &objective, &LineSearchParams::default())?;
//! assert!(next.norm() < 1e-3);
//! # Ok::<(), labopt_core::error::OptimizerError>(())
//! ```

use crate::core::{
    error::{OptimizerError, OptimizerResult},
    objective::Objective,
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;
use tracing::debug;

/// Relative size of the second simplex vertex for a non-zero start.
const NONZERO_DELTA: f64 = 0.05;
/// Absolute position of the second simplex vertex for a zero start.
const ZERO_DELTA: f64 = 0.00025;

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Parameters of the one-dimensional simplex search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSearchParams<T: Scalar> {
    /// Converged when the two simplex offsets are within this distance.
    pub offset_tolerance: T,

    /// Converged when the objective values at the two offsets are within
    /// this distance.
    pub value_tolerance: T,

    /// Offset the search starts from.
    pub initial_offset: T,

    /// Maximum number of simplex iterations.
    pub max_iterations: usize,

    /// Maximum number of objective evaluations.
    pub max_evaluations: usize,
}

impl<T: Scalar> Default for LineSearchParams<T> {
    fn default() -> Self {
        Self {
            offset_tolerance: T::DEFAULT_OFFSET_TOLERANCE,
            value_tolerance: <T as Scalar>::from_f64(1e-4),
            initial_offset: T::zero(),
            max_iterations: 200,
            max_evaluations: 200,
        }
    }
}

impl<T: Scalar> LineSearchParams<T> {
    /// Creates parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the offset tolerance.
    pub fn with_offset_tolerance(mut self, tol: T) -> Self {
        self.offset_tolerance = tol;
        self
    }

    /// Sets the value tolerance.
    pub fn with_value_tolerance(mut self, tol: T) -> Self {
        self.value_tolerance = tol;
        self
    }

    /// Sets the offset the search starts from.
    pub fn with_initial_offset(mut self, offset: T) -> Self {
        self.initial_offset = offset;
        self
    }

    /// Sets the iteration and evaluation budgets.
    pub fn with_budget(mut self, max_iterations: usize, max_evaluations: usize) -> Self {
        self.max_iterations = max_iterations;
        self.max_evaluations = max_evaluations;
        self
    }

    /// Validates the parameters.
    ///
    /// Tolerances must be positive and finite, the initial offset finite,
    /// and the evaluation budget must cover the two initial vertices.
    pub fn validate(&self) -> OptimizerResult<()> {
        check_positive(self.offset_tolerance, "offset_tolerance")?;
        check_positive(self.value_tolerance, "value_tolerance")?;

        if !<T as Float>::is_finite(self.initial_offset) {
            return Err(OptimizerError::invalid_configuration(
                "initial offset must be finite",
                "initial_offset",
                self.initial_offset.to_string(),
            ));
        }

        if self.max_evaluations < 2 {
            return Err(OptimizerError::invalid_configuration(
                "at least two evaluations are needed to build the simplex",
                "max_evaluations",
                self.max_evaluations.to_string(),
            ));
        }

        Ok(())
    }
}

pub(crate) fn check_positive<T: Scalar>(value: T, parameter: &str) -> OptimizerResult<()> {
    if <T as Float>::is_finite(value) && value > T::zero() {
        Ok(())
    } else {
        Err(OptimizerError::invalid_configuration(
            "must be positive and finite",
            parameter,
            value.to_string(),
        ))
    }
}

/// Outcome of a one-dimensional minimisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarMinimum<T> {
    /// Best offset found
    pub offset: T,
    /// Function value at `offset`
    pub value: T,
    /// Simplex iterations performed
    pub iterations: usize,
    /// Function evaluations performed
    pub evaluations: usize,
    /// True if the tolerances were met before the budget ran out
    pub converged: bool,
}

/// Minimises a scalar function of one variable with a Nelder–Mead simplex.
///
/// The simplex starts at `[α0, α0 + 0.00025]` when `α0 = 0` and at
/// `[α0, 1.05 α0]` otherwise. Running out of budget is not an error: the
/// best vertex found so far is returned with `converged == false`.
pub fn minimize_scalar<T, F>(mut f: F, params: &LineSearchParams<T>) -> OptimizerResult<ScalarMinimum<T>>
where
    T: Scalar,
    F: FnMut(T) -> OptimizerResult<T>,
{
    params.validate()?;

    let rho = <T as Scalar>::from_f64(REFLECTION);
    let chi = <T as Scalar>::from_f64(EXPANSION);
    let psi = <T as Scalar>::from_f64(CONTRACTION);
    let sigma = <T as Scalar>::from_f64(SHRINK);

    let start = params.initial_offset;
    let second = if start == T::zero() {
        <T as Scalar>::from_f64(ZERO_DELTA)
    } else {
        (T::one() + <T as Scalar>::from_f64(NONZERO_DELTA)) * start
    };

    // simplex[0] is always the best vertex
    let mut simplex = [(start, f(start)?), (second, f(second)?)];
    let mut evaluations = 2;
    order(&mut simplex);

    let mut iterations = 0;
    let mut converged = false;

    while evaluations < params.max_evaluations && iterations < params.max_iterations {
        let [best, worst] = simplex;
        if <T as Float>::abs(worst.0 - best.0) <= params.offset_tolerance
            && <T as Float>::abs(best.1 - worst.1) <= params.value_tolerance
        {
            converged = true;
            break;
        }

        let centroid = best.0;
        let reflected = (T::one() + rho) * centroid - rho * worst.0;
        let f_reflected = f(reflected)?;
        evaluations += 1;

        let mut shrink = false;
        if f_reflected < best.1 {
            let expanded = (T::one() + rho * chi) * centroid - rho * chi * worst.0;
            let f_expanded = f(expanded)?;
            evaluations += 1;

            simplex[1] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
        } else if f_reflected < worst.1 {
            let contracted = (T::one() + psi * rho) * centroid - psi * rho * worst.0;
            let f_contracted = f(contracted)?;
            evaluations += 1;

            if f_contracted <= f_reflected {
                simplex[1] = (contracted, f_contracted);
            } else {
                shrink = true;
            }
        } else {
            let contracted = (T::one() - psi) * centroid + psi * worst.0;
            let f_contracted = f(contracted)?;
            evaluations += 1;

            if f_contracted < worst.1 {
                simplex[1] = (contracted, f_contracted);
            } else {
                shrink = true;
            }
        }

        if shrink {
            let moved = simplex[0].0 + sigma * (simplex[1].0 - simplex[0].0);
            simplex[1] = (moved, f(moved)?);
            evaluations += 1;
        }

        iterations += 1;
        order(&mut simplex);
    }

    if !converged {
        debug!(
            iterations,
            evaluations,
            offset = %simplex[0].0,
            "line search budget exhausted before convergence"
        );
    }

    Ok(ScalarMinimum {
        offset: simplex[0].0,
        value: simplex[0].1,
        iterations,
        evaluations,
        converged,
    })
}

fn order<T: Scalar>(simplex: &mut [(T, T); 2]) {
    if simplex[1].1 < simplex[0].1 {
        simplex.swap(0, 1);
    }
}

/// Result of a line search along a direction.
#[derive(Debug, Clone)]
pub struct LineSearchResult<T: Scalar> {
    /// The accepted offset α
    pub offset: T,
    /// The new position `start + α direction`
    pub new_point: DVector<T>,
    /// The objective value at the new position
    pub new_value: T,
    /// Number of objective evaluations performed
    pub function_evals: usize,
    /// True if the search met its convergence tolerances
    pub converged: bool,
}

/// Trait for line search strategies.
pub trait LineSearch<T: Scalar>: Debug {
    /// Searches along `direction` from `start` and returns the new position.
    fn search<O>(
        &self,
        objective: &O,
        start: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<LineSearchResult<T>>
    where
        O: Objective<T> + ?Sized;

    /// Name of the line search.
    fn name(&self) -> &str;
}

/// Derivative-free line search minimising `f(start + α direction)` over α.
#[derive(Debug, Clone, Default)]
pub struct SimplexLineSearch<T: Scalar> {
    params: LineSearchParams<T>,
}

impl<T: Scalar> SimplexLineSearch<T> {
    /// Creates a simplex line search with the given parameters.
    pub fn new(params: LineSearchParams<T>) -> Self {
        Self { params }
    }

    /// Creates a simplex line search with a custom offset tolerance.
    pub fn with_tolerance(tolerance: T) -> Self {
        Self::new(LineSearchParams::default().with_offset_tolerance(tolerance))
    }

    /// The search parameters.
    pub fn params(&self) -> &LineSearchParams<T> {
        &self.params
    }
}

impl<T: Scalar> LineSearch<T> for SimplexLineSearch<T> {
    fn search<O>(
        &self,
        objective: &O,
        start: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<LineSearchResult<T>>
    where
        O: Objective<T> + ?Sized,
    {
        if start.len() != direction.len() {
            return Err(crate::core::error::ObjectiveError::dimension_mismatch(
                start.len(),
                direction.len(),
            )
            .into());
        }

        let along = |offset: T| start + direction * offset;
        let minimum = minimize_scalar(
            |offset| objective.value(&along(offset)).map_err(OptimizerError::from),
            &self.params,
        )?;

        Ok(LineSearchResult {
            offset: minimum.offset,
            new_point: along(minimum.offset),
            new_value: minimum.value,
            function_evals: minimum.evaluations,
            converged: minimum.converged,
        })
    }

    fn name(&self) -> &str {
        "Simplex"
    }
}

/// A "line search" that always moves by the same offset.
///
/// With an offset of one this turns a Newton strategy into the pure Newton
/// iteration `x - H⁻¹ g`.
#[derive(Debug, Clone, Copy)]
pub struct FixedStep<T> {
    offset: T,
}

impl<T: Scalar> FixedStep<T> {
    /// Creates a fixed step with the given offset.
    pub fn new(offset: T) -> Self {
        Self { offset }
    }
}

impl<T: Scalar> LineSearch<T> for FixedStep<T> {
    fn search<O>(
        &self,
        objective: &O,
        start: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<LineSearchResult<T>>
    where
        O: Objective<T> + ?Sized,
    {
        let new_point = start + direction * self.offset;
        let new_value = objective.value(&new_point)?;

        Ok(LineSearchResult {
            offset: self.offset,
            new_point,
            new_value,
            function_evals: 1,
            converged: true,
        })
    }

    fn name(&self) -> &str {
        "FixedStep"
    }
}

/// Moves from `start` along `direction` to the offset minimising the
/// objective, using a [`SimplexLineSearch`] with `params`.
pub fn line_search<T, O>(
    start: &DVector<T>,
    direction: &DVector<T>,
    objective: &O,
    params: &LineSearchParams<T>,
) -> OptimizerResult<DVector<T>>
where
    T: Scalar,
    O: Objective<T> + ?Sized,
{
    SimplexLineSearch::new(params.clone())
        .search(objective, start, direction)
        .map(|result| result.new_point)
}
