//! Objective function interface for the optimiser.
//!
//! An objective reports a scalar value at a position and may additionally
//! report its gradient and Hessian. Only the value is required; the
//! derivative methods default to an explicit `NotImplemented` error so that
//! a strategy asking for a capability the objective lacks fails loudly
//! instead of silently receiving a wrong value.
//!
//! # Capability matrix
//!
//! | Objective                | value | gradient | hessian |
//! |--------------------------|-------|----------|---------|
//! | [`QuadraticObjective`]   | yes   | yes      | yes     |
//! | `Rosenbrock`             | yes   | yes      | yes     |
//! | `LogisticRegressionNll`  | yes   | yes      | yes     |
//! | `NormalNll`              | yes   | yes      | yes     |
//! | `FiniteDifference<O>`    | yes   | approx.  | no      |

use crate::core::{
    error::{ObjectiveError, Result},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;
use std::cell::Cell;
use std::fmt::Debug;

/// Trait for scalar objective functions minimised by the optimiser.
pub trait Objective<T: Scalar>: Debug {
    /// Evaluates the objective at a position.
    fn value(&self, point: &DVector<T>) -> Result<T>;

    /// Evaluates the gradient (first-derivative vector) at a position.
    ///
    /// # Default Implementation
    ///
    /// Returns `NotImplemented`. Override for first-order strategies.
    fn gradient(&self, _point: &DVector<T>) -> Result<DVector<T>> {
        Err(ObjectiveError::not_implemented("gradient", self.name()))
    }

    /// Evaluates the Hessian (second-derivative matrix) at a position.
    ///
    /// # Default Implementation
    ///
    /// Returns `NotImplemented`. Override for second-order strategies.
    fn hessian(&self, _point: &DVector<T>) -> Result<DMatrix<T>> {
        Err(ObjectiveError::not_implemented("hessian", self.name()))
    }

    /// Human-readable name used in error messages and logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<T, O> Objective<T> for &O
where
    T: Scalar,
    O: Objective<T> + ?Sized,
{
    fn value(&self, point: &DVector<T>) -> Result<T> {
        (**self).value(point)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        (**self).gradient(point)
    }

    fn hessian(&self, point: &DVector<T>) -> Result<DMatrix<T>> {
        (**self).hessian(point)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Checks that a position has the dimension an objective expects.
pub fn ensure_dimension<T: Scalar>(point: &DVector<T>, expected: usize) -> Result<()> {
    if point.len() == expected {
        Ok(())
    } else {
        Err(ObjectiveError::dimension_mismatch(expected, point.len()))
    }
}

/// A quadratic objective.
///
/// Computes f(x) = 0.5 * x^T * A * x + b^T * x + c
#[derive(Debug, Clone)]
pub struct QuadraticObjective<T: Scalar> {
    /// The quadratic form matrix (should be symmetric)
    pub a: DMatrix<T>,
    /// The linear term
    pub b: DVector<T>,
    /// The constant term
    pub c: T,
}

impl<T: Scalar> QuadraticObjective<T> {
    /// Creates a new quadratic objective.
    ///
    /// Fails if `a` is not square or `b` does not match its size.
    pub fn new(a: DMatrix<T>, b: DVector<T>, c: T) -> Result<Self> {
        if !a.is_square() {
            return Err(ObjectiveError::dimension_mismatch(
                "square matrix",
                format!("{}x{}", a.nrows(), a.ncols()),
            ));
        }
        if b.len() != a.nrows() {
            return Err(ObjectiveError::dimension_mismatch(a.nrows(), b.len()));
        }
        Ok(Self { a, b, c })
    }

    /// Creates a simple quadratic with identity matrix: f(x) = 0.5 * ||x||^2
    pub fn simple(dim: usize) -> Self {
        Self {
            a: DMatrix::identity(dim, dim),
            b: DVector::zeros(dim),
            c: T::zero(),
        }
    }

    /// Dimension of the positions this objective accepts.
    pub fn dimension(&self) -> usize {
        self.b.len()
    }

    /// The stationary point A^{-1}(-b), if A is invertible.
    pub fn minimiser(&self) -> Option<DVector<T>> {
        self.a.clone().lu().solve(&(-&self.b))
    }
}

impl<T: Scalar> Objective<T> for QuadraticObjective<T> {
    fn value(&self, point: &DVector<T>) -> Result<T> {
        ensure_dimension(point, self.dimension())?;
        let ax = &self.a * point;
        let quad_term = point.dot(&ax) * <T as Scalar>::from_f64(0.5);
        Ok(quad_term + self.b.dot(point) + self.c)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        ensure_dimension(point, self.dimension())?;
        Ok(&self.a * point + &self.b)
    }

    fn hessian(&self, point: &DVector<T>) -> Result<DMatrix<T>> {
        ensure_dimension(point, self.dimension())?;
        Ok(self.a.clone())
    }

    fn name(&self) -> &str {
        "QuadraticObjective"
    }
}

/// Wrapper to count objective evaluations for testing and debugging.
#[derive(Debug)]
pub struct CountingObjective<O> {
    /// The underlying objective
    pub inner: O,
    value_count: Cell<usize>,
    gradient_count: Cell<usize>,
    hessian_count: Cell<usize>,
}

impl<O> CountingObjective<O> {
    /// Creates a new counting wrapper around an objective.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            value_count: Cell::new(0),
            gradient_count: Cell::new(0),
            hessian_count: Cell::new(0),
        }
    }

    /// Resets all counters to zero.
    pub fn reset_counts(&self) {
        self.value_count.set(0);
        self.gradient_count.set(0);
        self.hessian_count.set(0);
    }

    /// Returns the current (value, gradient, hessian) evaluation counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.value_count.get(),
            self.gradient_count.get(),
            self.hessian_count.get(),
        )
    }
}

impl<T, O> Objective<T> for CountingObjective<O>
where
    T: Scalar,
    O: Objective<T>,
{
    fn value(&self, point: &DVector<T>) -> Result<T> {
        self.value_count.set(self.value_count.get() + 1);
        self.inner.value(point)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.gradient_count.set(self.gradient_count.get() + 1);
        self.inner.gradient(point)
    }

    fn hessian(&self, point: &DVector<T>) -> Result<DMatrix<T>> {
        self.hessian_count.set(self.hessian_count.get() + 1);
        self.inner.hessian(point)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Utilities for checking analytic derivative implementations.
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Compares the analytic gradient with a forward-difference approximation.
    ///
    /// Returns `(passes, max_error)` where `max_error` is the largest
    /// component-wise absolute difference.
    pub fn check_gradient<T, O>(objective: &O, point: &DVector<T>, h: T, tol: T) -> Result<(bool, T)>
    where
        T: Scalar,
        O: Objective<T>,
    {
        let analytical = objective.gradient(point)?;
        let approximate = crate::core::finite_difference::forward_difference_gradient(
            |x| objective.value(x),
            point,
            h,
        )?;

        let max_error = (&analytical - &approximate)
            .iter()
            .map(|x| <T as Float>::abs(*x))
            .fold(T::zero(), |a, b| <T as Float>::max(a, b));

        Ok((max_error < tol, max_error))
    }

    /// Checks if the Hessian is symmetric.
    ///
    /// Returns `(is_symmetric, max_asymmetry)`.
    pub fn check_hessian_symmetry<T, O>(objective: &O, point: &DVector<T>, tol: T) -> Result<(bool, T)>
    where
        T: Scalar,
        O: Objective<T>,
    {
        let hessian = objective.hessian(point)?;
        let n = hessian.nrows();

        let mut max_asymmetry = T::zero();
        for i in 0..n {
            for j in i + 1..n {
                let asymmetry = <T as Float>::abs(hessian[(i, j)] - hessian[(j, i)]);
                max_asymmetry = <T as Float>::max(max_asymmetry, asymmetry);
            }
        }

        Ok((max_asymmetry < tol, max_asymmetry))
    }
}
