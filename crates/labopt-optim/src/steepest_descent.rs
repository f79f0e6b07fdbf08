//! Steepest descent with a line search.
//!
//! The direction is the negative gradient and the step length is chosen by
//! the line search. Only the gradient is needed, so value-only objectives
//! work once wrapped in `FiniteDifference`.

use labopt_core::{
    core::{
        error::OptimizerResult,
        objective::Objective,
        types::{DVector, Scalar},
    },
    optimization::{
        line_search::{LineSearch, LineSearchParams, SimplexLineSearch},
        optimizer::StepStrategy,
    },
};
use tracing::trace;

/// Configuration for steepest descent.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteepestDescentConfig<T: Scalar> {
    /// Parameters of the simplex line search along `-g`
    pub line_search_params: LineSearchParams<T>,
}

impl<T: Scalar> SteepestDescentConfig<T> {
    /// Creates a configuration with the default line search parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the line search parameters.
    pub fn with_line_search_params(mut self, params: LineSearchParams<T>) -> Self {
        self.line_search_params = params;
        self
    }

    /// Validates the line search parameters.
    pub fn validate(&self) -> OptimizerResult<()> {
        self.line_search_params.validate()
    }
}

/// Steepest descent.
#[derive(Debug, Clone)]
pub struct SteepestDescent<T: Scalar, L = SimplexLineSearch<T>> {
    config: SteepestDescentConfig<T>,
    line_search: L,
}

impl<T: Scalar> SteepestDescent<T> {
    /// Creates a steepest descent strategy with a simplex line search.
    pub fn new(config: SteepestDescentConfig<T>) -> Self {
        let line_search = SimplexLineSearch::new(config.line_search_params.clone());
        Self {
            config,
            line_search,
        }
    }
}

impl<T: Scalar> Default for SteepestDescent<T> {
    fn default() -> Self {
        Self::new(SteepestDescentConfig::default())
    }
}

impl<T: Scalar, L: LineSearch<T>> SteepestDescent<T, L> {
    /// Creates a steepest descent strategy with a custom line search.
    pub fn with_line_search(config: SteepestDescentConfig<T>, line_search: L) -> Self {
        Self {
            config,
            line_search,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &SteepestDescentConfig<T> {
        &self.config
    }
}

impl<T: Scalar, L: LineSearch<T>> StepStrategy<T> for SteepestDescent<T, L> {
    fn step<O>(&self, position: &DVector<T>, objective: &O) -> OptimizerResult<DVector<T>>
    where
        O: Objective<T> + ?Sized,
    {
        self.config.validate()?;

        let direction = -objective.gradient(position)?;
        let result = self.line_search.search(objective, position, &direction)?;

        trace!(
            offset = %result.offset,
            evaluations = result.function_evals,
            "steepest descent step"
        );

        Ok(result.new_point)
    }

    fn name(&self) -> &str {
        "SteepestDescent"
    }
}
