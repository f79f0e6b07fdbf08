//! Forward finite-difference gradients.
//!
//! [`FiniteDifference`] wraps any objective, delegates value evaluation to
//! it, and replaces its gradient with the coordinate-wise forward difference
//!
//! ```text
//! ∂f/∂x_i ≈ (f(x + h e_i) - f(x)) / h
//! ```
//!
//! The approximation is first-order accurate: the error is `O(h)`. Second
//! derivatives are not approximated; asking the wrapper for a Hessian is an
//! error.
//!
//! # Example
//!
//! ```rust
//! use labopt_core::prelude::*;
//!
//! let objective = FiniteDifference::new(Rosenbrock::new());
//! let point: DVector<f64> = DVector::from_vec(vec![1.0, 2.0]);
//!
//! let gradient = objective.gradient(&point)?;
//! assert!((gradient[0] - (-400.0)).abs() < 1e-2);
//! assert!(objective.hessian(&point).is_err());
//! # Ok::<(), labopt_core::error::ObjectiveError>(())
//! ```

use crate::core::{
    error::{ObjectiveError, Result},
    objective::Objective,
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Approximates the gradient of `f` at `point` by forward differences.
///
/// `f(point)` is evaluated once and reused for every coordinate.
pub fn forward_difference_gradient<T, F>(f: F, point: &DVector<T>, h: T) -> Result<DVector<T>>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> Result<T>,
{
    validate_step(h)?;

    let f_x = f(point)?;
    let mut gradient = DVector::zeros(point.len());
    let mut shifted = point.clone();

    for i in 0..point.len() {
        let original = shifted[i];
        shifted[i] = original + h;
        gradient[i] = (f(&shifted)? - f_x) / h;
        shifted[i] = original;
    }

    Ok(gradient)
}

fn validate_step<T: Scalar>(h: T) -> Result<()> {
    if <T as Float>::is_finite(h) && h > T::zero() {
        Ok(())
    } else {
        Err(ObjectiveError::invalid_parameter(format!(
            "finite difference step must be positive and finite, got {h}"
        )))
    }
}

/// An objective whose gradient is approximated by forward differences.
///
/// Owns the inner objective and forwards `value` to it. Any analytic
/// gradient the inner objective may have is ignored.
#[derive(Debug, Clone)]
pub struct FiniteDifference<O, T: Scalar = f64> {
    inner: O,
    h: T,
}

impl<O, T: Scalar> FiniteDifference<O, T> {
    /// Wraps `inner` with the default step `h = 1e-3`.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            h: T::DEFAULT_FD_STEP,
        }
    }

    /// Wraps `inner` with a custom step.
    ///
    /// Fails if `h` is not positive and finite.
    pub fn with_step(inner: O, h: T) -> Result<Self> {
        validate_step(h)?;
        Ok(Self { inner, h })
    }

    /// The finite-difference step.
    pub fn step(&self) -> T {
        self.h
    }

    /// The wrapped objective.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Unwraps the inner objective.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O, T> Objective<T> for FiniteDifference<O, T>
where
    T: Scalar,
    O: Objective<T>,
{
    fn value(&self, point: &DVector<T>) -> Result<T> {
        self.inner.value(point)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        forward_difference_gradient(|x| self.inner.value(x), point, self.h)
    }

    fn hessian(&self, _point: &DVector<T>) -> Result<DMatrix<T>> {
        Err(ObjectiveError::not_implemented(
            "hessian",
            format!("FiniteDifference<{}>", self.inner.name()),
        ))
    }

    fn name(&self) -> &str {
        "FiniteDifference"
    }
}
