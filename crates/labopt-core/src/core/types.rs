//! Type definitions and aliases shared by every optimiser component.
//!
//! This module provides the scalar trait the library is generic over, the
//! vector and matrix aliases used for positions and derivatives, and a few
//! numerical constants.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in optimisation (f32 or f64).
///
/// This trait combines all the numeric traits required by the objective
/// functions, the line search and the step strategies.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default tolerance on the per-coordinate position change between
    /// two iterates.
    const DEFAULT_TOLERANCE: Self;

    /// Default step used by forward finite differences.
    const DEFAULT_FD_STEP: Self;

    /// Default convergence tolerance on the line search offset.
    const DEFAULT_OFFSET_TOLERANCE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_from_f64` for a non-panicking version.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Try to convert from f64.
    ///
    /// Returns None if the conversion fails.
    fn try_from_f64(v: f64) -> Option<Self> {
        <Self as FromPrimitive>::from_f64(v)
    }

    /// Convert to f64 (for logging/display).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_to_f64` for a non-panicking version.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("Failed to convert to f64")
    }

    /// Try to convert to f64.
    fn try_to_f64(self) -> Option<f64> {
        num_traits::cast(self)
    }

    /// Convert from usize (for sample counts and dimensions).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-4;
    const DEFAULT_FD_STEP: Self = 1e-3;
    const DEFAULT_OFFSET_TOLERANCE: Self = 1e-5;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-6;
    const DEFAULT_FD_STEP: Self = 1e-3;
    const DEFAULT_OFFSET_TOLERANCE: Self = 1e-5;
}

/// A position in the search space.
pub type Position<T> = OVector<T, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Numerical constants for different precision levels.
pub mod constants {
    use super::Scalar;

    /// Get machine epsilon for the given scalar type.
    pub fn epsilon<T: Scalar>() -> T {
        T::EPSILON
    }

    /// Get the default position-change tolerance.
    pub fn default_tolerance<T: Scalar>() -> T {
        T::DEFAULT_TOLERANCE
    }

    /// Get the default finite-difference step.
    pub fn fd_step<T: Scalar>() -> T {
        T::DEFAULT_FD_STEP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(<f64 as Scalar>::from_f64(0.5), 0.5);
        assert_eq!(<f32 as Scalar>::from_f64(0.5), 0.5_f32);
        assert_eq!(<f64 as Scalar>::from_usize(7), 7.0);
        assert_eq!(Scalar::to_f64(2.5_f32), 2.5);
        assert_eq!(<f32 as Scalar>::try_from_f64(1.0), Some(1.0));
    }

    #[test]
    fn test_constants() {
        assert_eq!(constants::epsilon::<f64>(), f64::EPSILON);
        assert_eq!(constants::fd_step::<f64>(), 1e-3);
        assert!(constants::default_tolerance::<f32>() > 0.0);
    }
}
