//! Newton's method with a line search.
//!
//! Each step solves the Newton system
//!
//! ```text
//! H(x) d = -g(x)
//! ```
//!
//! in the least-squares sense through a singular value decomposition of the
//! Hessian and then refines the step length along `d` with a line search.
//! Singular values at or below the cutoff `max(σ) · ε · n` are treated as
//! zero, so singular or badly conditioned Hessians produce the minimum-norm
//! approximate direction instead of an error. A zero Hessian gives a zero
//! direction and the step leaves the position unchanged.
//!
//! The objective must provide both a gradient and a Hessian; wrapping it in
//! `FiniteDifference` is not enough, since the wrapper has no Hessian.

use labopt_core::{
    core::{
        error::{ObjectiveError, OptimizerError, OptimizerResult},
        objective::Objective,
        types::{DMatrix, DVector, Scalar},
    },
    optimization::{
        line_search::{LineSearch, LineSearchParams, SimplexLineSearch},
        optimizer::StepStrategy,
    },
};
use num_traits::Float;
use tracing::trace;

/// Configuration for Newton's method.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonConfig<T: Scalar> {
    /// Parameters of the simplex line search along the Newton direction
    pub line_search_params: LineSearchParams<T>,
    /// Absolute singular value cutoff for the least-squares solve.
    /// `None` uses `max(σ) · ε · n`.
    pub singular_value_cutoff: Option<T>,
}

impl<T: Scalar> Default for NewtonConfig<T> {
    fn default() -> Self {
        Self {
            line_search_params: LineSearchParams::default(),
            singular_value_cutoff: None,
        }
    }
}

impl<T: Scalar> NewtonConfig<T> {
    /// Create a new Newton configuration with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line search parameters
    pub fn with_line_search_params(mut self, params: LineSearchParams<T>) -> Self {
        self.line_search_params = params;
        self
    }

    /// Set a fixed singular value cutoff
    pub fn with_singular_value_cutoff(mut self, cutoff: T) -> Self {
        self.singular_value_cutoff = Some(cutoff);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        self.line_search_params.validate()?;
        if let Some(cutoff) = self.singular_value_cutoff {
            if !<T as Float>::is_finite(cutoff) || cutoff < T::zero() {
                return Err(OptimizerError::invalid_configuration(
                    "must be non-negative and finite",
                    "singular_value_cutoff",
                    cutoff.to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Solves `hessian · d = -gradient` in the least-squares sense.
///
/// Singular values at or below `cutoff` (default `max(σ) · ε · n`) are
/// dropped from the pseudo-inverse.
pub fn newton_direction<T: Scalar>(
    gradient: &DVector<T>,
    hessian: &DMatrix<T>,
    cutoff: Option<T>,
) -> OptimizerResult<DVector<T>> {
    let n = gradient.len();
    if hessian.shape() != (n, n) {
        return Err(ObjectiveError::dimension_mismatch(
            format!("{n}x{n} Hessian"),
            format!("{}x{} Hessian", hessian.nrows(), hessian.ncols()),
        )
        .into());
    }
    if n == 0 {
        return Ok(DVector::zeros(0));
    }
    if hessian.iter().chain(gradient.iter()).any(|v| !<T as Float>::is_finite(*v)) {
        return Err(OptimizerError::linear_solve_failed(
            "gradient or Hessian has non-finite entries",
        ));
    }

    let svd = hessian.clone().svd(true, true);
    let eps = cutoff.unwrap_or_else(|| {
        let largest = svd
            .singular_values
            .iter()
            .fold(T::zero(), |m, &s| if s > m { s } else { m });
        largest * T::EPSILON * <T as Scalar>::from_usize(n)
    });

    svd.solve(&(-gradient), eps)
        .map_err(OptimizerError::linear_solve_failed)
}

/// Newton's method.
///
/// Generic over the line search; [`Newton::new`] uses the derivative-free
/// [`SimplexLineSearch`]. Use `FixedStep::new(1.0)` for the pure Newton
/// iteration.
#[derive(Debug, Clone)]
pub struct Newton<T: Scalar, L = SimplexLineSearch<T>> {
    config: NewtonConfig<T>,
    line_search: L,
}

impl<T: Scalar> Newton<T> {
    /// Creates a Newton strategy with a simplex line search.
    pub fn new(config: NewtonConfig<T>) -> Self {
        let line_search = SimplexLineSearch::new(config.line_search_params.clone());
        Self {
            config,
            line_search,
        }
    }
}

impl<T: Scalar> Default for Newton<T> {
    fn default() -> Self {
        Self::new(NewtonConfig::default())
    }
}

impl<T: Scalar, L: LineSearch<T>> Newton<T, L> {
    /// Creates a Newton strategy with a custom line search.
    ///
    /// The line search parameters in `config` are not used.
    pub fn with_line_search(config: NewtonConfig<T>, line_search: L) -> Self {
        Self {
            config,
            line_search,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NewtonConfig<T> {
        &self.config
    }

    /// Computes the Newton direction at `position`.
    pub fn direction<O>(&self, position: &DVector<T>, objective: &O) -> OptimizerResult<DVector<T>>
    where
        O: Objective<T> + ?Sized,
    {
        let gradient = objective.gradient(position)?;
        let hessian = objective.hessian(position)?;
        newton_direction(&gradient, &hessian, self.config.singular_value_cutoff)
    }
}

impl<T: Scalar, L: LineSearch<T>> StepStrategy<T> for Newton<T, L> {
    fn step<O>(&self, position: &DVector<T>, objective: &O) -> OptimizerResult<DVector<T>>
    where
        O: Objective<T> + ?Sized,
    {
        self.config.validate()?;

        let direction = self.direction(position, objective)?;
        let result = self.line_search.search(objective, position, &direction)?;

        trace!(
            offset = %result.offset,
            evaluations = result.function_evals,
            converged = result.converged,
            "newton step"
        );

        Ok(result.new_point)
    }

    fn name(&self) -> &str {
        "Newton"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use labopt_core::{
        core::{finite_difference::FiniteDifference, objective::QuadraticObjective},
        functions::Rosenbrock,
        optimization::line_search::FixedStep,
    };

    #[test]
    fn test_newton_config() {
        let config = NewtonConfig::<f64>::new()
            .with_singular_value_cutoff(1e-10)
            .with_line_search_params(LineSearchParams::default().with_budget(50, 50));

        assert_eq!(config.singular_value_cutoff, Some(1e-10));
        assert_eq!(config.line_search_params.max_iterations, 50);
        assert!(config.validate().is_ok());

        let bad = NewtonConfig::<f64>::new().with_singular_value_cutoff(-1.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_direction_on_rosenbrock() {
        let newton = Newton::<f64>::default();
        let position = DVector::from_vec(vec![1.2, 1.2]);
        let direction = newton.direction(&position, &Rosenbrock).unwrap();

        assert_relative_eq!(direction[0], -0.004081632653061273, epsilon = 1e-12);
        assert_relative_eq!(direction[1], 0.2302040816326536, epsilon = 1e-12);
    }

    #[test]
    fn test_step_on_rosenbrock() {
        let newton = Newton::<f64>::default();
        let position = DVector::from_vec(vec![1.2, 1.2]);
        let next = newton.step(&position, &Rosenbrock).unwrap();

        assert_relative_eq!(next[0], 1.195917506377551, epsilon = 1e-8);
        assert_relative_eq!(next[1], 1.430252640306123, epsilon = 1e-8);
    }

    #[test]
    fn test_pure_newton_solves_quadratic_in_one_step() {
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![-1.0, -1.0]);
        let objective = QuadraticObjective::new(a, b, 0.0).unwrap();

        let newton = Newton::with_line_search(NewtonConfig::new(), FixedStep::new(1.0));
        let next = newton
            .step(&DVector::from_vec(vec![2.0, -3.0]), &objective)
            .unwrap();

        assert_relative_eq!(next[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(next[1], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_hessian_gives_least_squares_direction() {
        let hessian = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 0.0]);
        let gradient = DVector::from_vec(vec![4.0, 1.0]);

        let direction = newton_direction(&gradient, &hessian, None).unwrap();
        assert_relative_eq!(direction[0], -2.0, epsilon = 1e-12);
        assert_relative_eq!(direction[1], 0.0, epsilon = 1e-12);

        let zero = newton_direction(&gradient, &DMatrix::zeros(2, 2), None).unwrap();
        assert_eq!(zero, DVector::zeros(2));
    }

    #[test]
    fn test_non_finite_hessian_fails() {
        let hessian = DMatrix::from_row_slice(1, 1, &[f64::NAN]);
        let result = newton_direction(&DVector::from_vec(vec![1.0]), &hessian, None);
        assert!(matches!(result, Err(OptimizerError::LinearSolveFailed { .. })));
    }

    #[test]
    fn test_requires_hessian() {
        let newton = Newton::<f64>::default();
        let objective = FiniteDifference::new(Rosenbrock);
        let err = newton
            .step(&DVector::from_vec(vec![0.0, 0.0]), &objective)
            .unwrap_err();

        match err {
            OptimizerError::Objective(inner) => assert!(inner.is_not_implemented()),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
