//! Fitting a univariate normal distribution by maximum likelihood.

use crate::core::{
    error::{ObjectiveError, Result},
    objective::{ensure_dimension, Objective},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::{Float, FloatConst};

/// Negative log-likelihood of samples under `N(μ, σ²)`, over `[μ, σ]`.
///
/// ```text
/// -log L(μ, σ) = n/2 · log(2π σ²) + Σ (x_i - μ)² / (2σ²)
/// ```
///
/// The log-likelihood is undefined for `σ ≤ 0`; the objective reports `+∞`
/// there so that a line search is pushed back into the valid half-plane.
#[derive(Debug, Clone)]
pub struct NormalNll<T: Scalar> {
    samples: DVector<T>,
}

/// Sums needed by every derivative: `n`, `Σ (x - μ)` and `Σ (x - μ)²`.
struct Moments<T> {
    n: T,
    first: T,
    second: T,
}

impl<T: Scalar + FloatConst> NormalNll<T> {
    /// Creates the objective for a non-empty set of samples.
    pub fn new(samples: DVector<T>) -> Result<Self> {
        if samples.is_empty() {
            return Err(ObjectiveError::invalid_parameter(
                "at least one sample is required",
            ));
        }
        Ok(Self { samples })
    }

    /// The samples being fitted.
    pub fn samples(&self) -> &DVector<T> {
        &self.samples
    }

    /// Log-likelihood of the samples for the given parameters.
    ///
    /// Returns `-∞` for `σ ≤ 0`.
    pub fn log_likelihood(&self, mu: T, sigma: T) -> T {
        if sigma <= T::zero() {
            return <T as Float>::neg_infinity();
        }
        let m = self.moments(mu);
        let two = <T as Scalar>::from_f64(2.0);
        let variance = sigma * sigma;

        -m.n / two * <T as Float>::ln(two * T::PI() * variance) - m.second / (two * variance)
    }

    /// Likelihood of the samples for the given parameters.
    ///
    /// Underflows to zero quickly as the sample count grows; prefer
    /// [`Self::log_likelihood`] for anything but small data sets.
    pub fn likelihood(&self, mu: T, sigma: T) -> T {
        <T as Float>::exp(self.log_likelihood(mu, sigma))
    }

    /// Closed-form maximum-likelihood estimate `[μ̂, σ̂]`.
    pub fn closed_form(&self) -> DVector<T> {
        let n = <T as Scalar>::from_usize(self.samples.len());
        let mu = self.samples.sum() / n;
        let sigma = <T as Float>::sqrt(self.moments(mu).second / n);
        DVector::from_vec(vec![mu, sigma])
    }

    fn moments(&self, mu: T) -> Moments<T> {
        let (first, second) = self
            .samples
            .iter()
            .fold((T::zero(), T::zero()), |(s1, s2), &x| {
                let d = x - mu;
                (s1 + d, s2 + d * d)
            });
        Moments {
            n: <T as Scalar>::from_usize(self.samples.len()),
            first,
            second,
        }
    }

    fn parameters(point: &DVector<T>) -> Result<(T, T)> {
        ensure_dimension(point, 2)?;
        Ok((point[0], point[1]))
    }

    fn require_positive_sigma(sigma: T) -> Result<()> {
        if sigma > T::zero() {
            Ok(())
        } else {
            Err(ObjectiveError::numerical_error(format!(
                "derivatives are undefined for sigma = {sigma}"
            )))
        }
    }
}

impl<T: Scalar + FloatConst> Objective<T> for NormalNll<T> {
    fn value(&self, point: &DVector<T>) -> Result<T> {
        let (mu, sigma) = Self::parameters(point)?;
        Ok(-self.log_likelihood(mu, sigma))
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let (mu, sigma) = Self::parameters(point)?;
        Self::require_positive_sigma(sigma)?;
        let m = self.moments(mu);
        let s2 = sigma * sigma;

        Ok(DVector::from_vec(vec![
            -m.first / s2,
            m.n / sigma - m.second / (s2 * sigma),
        ]))
    }

    fn hessian(&self, point: &DVector<T>) -> Result<DMatrix<T>> {
        let (mu, sigma) = Self::parameters(point)?;
        Self::require_positive_sigma(sigma)?;
        let m = self.moments(mu);
        let s2 = sigma * sigma;
        let cross = <T as Scalar>::from_f64(2.0) * m.first / (s2 * sigma);

        Ok(DMatrix::from_row_slice(
            2,
            2,
            &[
                m.n / s2,
                cross,
                cross,
                -m.n / s2 + <T as Scalar>::from_f64(3.0) * m.second / (s2 * s2),
            ],
        ))
    }

    fn name(&self) -> &str {
        "NormalNll"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::objective::DerivativeChecker;
    use approx::assert_relative_eq;

    fn samples() -> NormalNll<f64> {
        NormalNll::new(DVector::from_vec(vec![1.0, 2.0, 2.5, 3.5, 6.0])).unwrap()
    }

    #[test]
    fn test_log_likelihood_single_sample() {
        // one sample at the mean: -1/2 log(2π)
        let objective = NormalNll::new(DVector::from_vec(vec![0.0])).unwrap();
        let expected = -0.5 * (2.0 * std::f64::consts::PI).ln();
        assert_relative_eq!(objective.log_likelihood(0.0, 1.0), expected, epsilon = 1e-12);
        assert_relative_eq!(objective.likelihood(0.0, 1.0), expected.exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_sigma() {
        let objective = samples();
        assert_eq!(objective.log_likelihood(0.0, 0.0), f64::NEG_INFINITY);
        assert_eq!(objective.likelihood(0.0, -1.0), 0.0);

        let value = objective.value(&DVector::from_vec(vec![0.0, -1.0])).unwrap();
        assert_eq!(value, f64::INFINITY);
        assert!(objective.gradient(&DVector::from_vec(vec![0.0, 0.0])).is_err());
    }

    #[test]
    fn test_gradient_vanishes_at_closed_form() {
        let objective = samples();
        let estimate = objective.closed_form();
        assert_relative_eq!(estimate[0], 3.0, epsilon = 1e-12);

        let gradient = objective.gradient(&estimate).unwrap();
        assert!(gradient.norm() < 1e-10);
    }

    #[test]
    fn test_derivatives_are_consistent() {
        let objective = samples();
        let point = DVector::from_vec(vec![2.0, 1.5]);

        let (passes, error) =
            DerivativeChecker::check_gradient(&objective, &point, 1e-7, 1e-4).unwrap();
        assert!(passes, "max gradient error {error}");

        let (symmetric, _) =
            DerivativeChecker::check_hessian_symmetry(&objective, &point, 1e-12).unwrap();
        assert!(symmetric);
    }

    #[test]
    fn test_requires_samples() {
        let err = NormalNll::<f64>::new(DVector::zeros(0)).unwrap_err();
        assert!(matches!(err, ObjectiveError::InvalidParameter { .. }));
    }
}
