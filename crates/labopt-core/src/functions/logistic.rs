//! Negative log-likelihood of a logistic regression model.

use crate::core::{
    error::{ObjectiveError, Result},
    objective::{ensure_dimension, Objective},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Negative log-likelihood of binary labels under logistic regression.
///
/// The data matrix `x` holds one sample per column (`dims × samples`), so
/// the activation for parameters `φ` is `a = φᵀ x` and the predicted
/// probability is `p = sigmoid(a)`. The objective is
///
/// ```text
/// L(φ) = -Σ_j [ y_j log(p_j + ε) + (1 - y_j) log(1 - p_j + ε) ]
/// ```
///
/// with `ε = 1e-15` guarding the logarithms. The gradient is `x (p - y)` and
/// the Hessian is `x diag(p (1 - p)) xᵀ`.
#[derive(Debug, Clone)]
pub struct LogisticRegressionNll<T: Scalar> {
    x: DMatrix<T>,
    y: DVector<T>,
}

impl<T: Scalar> LogisticRegressionNll<T> {
    /// Guard added inside the logarithms.
    pub const LOG_GUARD: f64 = 1e-15;

    /// Creates the objective from a `dims × samples` data matrix and one
    /// label in `[0, 1]` per sample.
    pub fn new(x: DMatrix<T>, y: DVector<T>) -> Result<Self> {
        if x.ncols() != y.len() {
            return Err(ObjectiveError::dimension_mismatch(
                format!("{} labels", x.ncols()),
                format!("{} labels", y.len()),
            ));
        }
        if y.iter().any(|&label| label < T::zero() || label > T::one()) {
            return Err(ObjectiveError::invalid_parameter(
                "labels must lie in [0, 1]",
            ));
        }
        Ok(Self { x, y })
    }

    /// Number of parameters (rows of the data matrix).
    pub fn dims(&self) -> usize {
        self.x.nrows()
    }

    /// Number of samples (columns of the data matrix).
    pub fn samples(&self) -> usize {
        self.x.ncols()
    }

    /// Predicted probability for every sample.
    pub fn probabilities(&self, phi: &DVector<T>) -> Result<DVector<T>> {
        ensure_dimension(phi, self.dims())?;
        let activation = self.x.tr_mul(phi);
        Ok(activation.map(sigmoid))
    }
}

fn sigmoid<T: Scalar>(a: T) -> T {
    // exp of a large positive argument overflows, so branch on the sign
    if a >= T::zero() {
        T::one() / (T::one() + <T as Float>::exp(-a))
    } else {
        let e = <T as Float>::exp(a);
        e / (T::one() + e)
    }
}

impl<T: Scalar> Objective<T> for LogisticRegressionNll<T> {
    fn value(&self, phi: &DVector<T>) -> Result<T> {
        let p = self.probabilities(phi)?;
        let guard = <T as Scalar>::from_f64(Self::LOG_GUARD);

        let log_likelihood = p
            .iter()
            .zip(self.y.iter())
            .fold(T::zero(), |acc, (&p, &y)| {
                acc + y * <T as Float>::ln(p + guard)
                    + (T::one() - y) * <T as Float>::ln(T::one() - p + guard)
            });

        Ok(-log_likelihood)
    }

    fn gradient(&self, phi: &DVector<T>) -> Result<DVector<T>> {
        let p = self.probabilities(phi)?;
        Ok(&self.x * (p - &self.y))
    }

    fn hessian(&self, phi: &DVector<T>) -> Result<DMatrix<T>> {
        let p = self.probabilities(phi)?;
        let weights = p.map(|p| p * (T::one() - p));

        let mut weighted = self.x.clone();
        for (mut column, &w) in weighted.column_iter_mut().zip(weights.iter()) {
            column *= w;
        }

        Ok(weighted * self.x.transpose())
    }

    fn name(&self) -> &str {
        "LogisticRegressionNll"
    }
}
