//! The Rosenbrock function.

use crate::core::{
    error::Result,
    objective::{ensure_dimension, Objective},
    types::{DMatrix, DVector, Scalar},
};

/// Rosenbrock's banana function `100 (x2 - x1²)² + (1 - x1)²`.
///
/// A simple polynomial whose global minimum at `(1, 1)` sits at the bottom
/// of a long curved valley, which makes it hard for first-order methods.
/// Positions must be 2-dimensional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rosenbrock;

impl Rosenbrock {
    /// Creates the Rosenbrock objective.
    pub fn new() -> Self {
        Self
    }

    /// The global minimiser `(1, 1)`.
    pub fn minimiser<T: Scalar>() -> DVector<T> {
        DVector::from_element(2, T::one())
    }
}

fn coordinates<T: Scalar>(point: &DVector<T>) -> Result<(T, T)> {
    ensure_dimension(point, 2)?;
    Ok((point[0], point[1]))
}

impl<T: Scalar> Objective<T> for Rosenbrock {
    fn value(&self, point: &DVector<T>) -> Result<T> {
        let (x1, x2) = coordinates(point)?;
        let hundred = <T as Scalar>::from_f64(100.0);
        let valley = x2 - x1 * x1;
        let offset = T::one() - x1;
        Ok(hundred * valley * valley + offset * offset)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let (x1, x2) = coordinates(point)?;
        let two = <T as Scalar>::from_f64(2.0);
        let valley = x2 - x1 * x1;
        Ok(DVector::from_vec(vec![
            <T as Scalar>::from_f64(-400.0) * x1 * valley - two * (T::one() - x1),
            <T as Scalar>::from_f64(200.0) * valley,
        ]))
    }

    fn hessian(&self, point: &DVector<T>) -> Result<DMatrix<T>> {
        let (x1, x2) = coordinates(point)?;
        let cross = <T as Scalar>::from_f64(-400.0) * x1;
        Ok(DMatrix::from_row_slice(
            2,
            2,
            &[
                <T as Scalar>::from_f64(1200.0) * x1 * x1
                    - <T as Scalar>::from_f64(400.0) * x2
                    + <T as Scalar>::from_f64(2.0),
                cross,
                cross,
                <T as Scalar>::from_f64(200.0),
            ],
        ))
    }

    fn name(&self) -> &str {
        "Rosenbrock"
    }
}
