//! The positions visited by an optimisation run and their objective values.

use crate::core::{
    error::{ObjectiveError, OptimizerResult},
    types::{DMatrix, DVector, Scalar},
};

/// Why an optimisation run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// Every coordinate moved by less than the tolerance in the last step
    Converged,
    /// The iteration cap was reached first
    MaxIterations,
}

/// Append-only record of positions and their objective values.
///
/// Index 0 always holds the start position, so a trajectory is never empty,
/// and `positions().len() == values().len()` holds at all times. Every
/// position has the same dimension as the start.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory<T: Scalar> {
    positions: Vec<DVector<T>>,
    values: Vec<T>,
}

impl<T: Scalar> Trajectory<T> {
    /// Starts a trajectory at `start`.
    pub fn new(start: DVector<T>, value: T) -> Self {
        Self {
            positions: vec![start],
            values: vec![value],
        }
    }

    /// Appends a position and its value.
    pub fn push(&mut self, position: DVector<T>, value: T) -> OptimizerResult<()> {
        let dimension = self.dimension();
        if position.len() != dimension {
            return Err(ObjectiveError::dimension_mismatch(dimension, position.len()).into());
        }
        self.positions.push(position);
        self.values.push(value);
        Ok(())
    }

    /// Number of recorded positions, including the start.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false: the start position is recorded on creation.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Dimension shared by every position.
    pub fn dimension(&self) -> usize {
        self.positions[0].len()
    }

    /// The recorded positions, index 0 being the start.
    pub fn positions(&self) -> &[DVector<T>] {
        &self.positions
    }

    /// The recorded values, aligned with [`Self::positions`].
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Position and value at index `i`.
    pub fn get(&self, i: usize) -> Option<(&DVector<T>, T)> {
        Some((self.positions.get(i)?, *self.values.get(i)?))
    }

    /// The most recent position.
    pub fn last_position(&self) -> &DVector<T> {
        &self.positions[self.positions.len() - 1]
    }

    /// The most recent value.
    pub fn last_value(&self) -> T {
        self.values[self.values.len() - 1]
    }

    /// Positions stacked row-wise into a `len × dimension` matrix.
    pub fn to_matrix(&self) -> DMatrix<T> {
        DMatrix::from_fn(self.len(), self.dimension(), |i, j| self.positions[i][j])
    }

    /// Values as a vector of length `len`.
    pub fn value_vector(&self) -> DVector<T> {
        DVector::from_column_slice(&self.values)
    }

    /// Iterates over `(position, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&DVector<T>, T)> + '_ {
        self.positions.iter().zip(self.values.iter().copied())
    }
}

/// Outcome of an optimisation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimisationResult<T: Scalar> {
    trajectory: Trajectory<T>,

    /// Why the run stopped
    pub termination: TerminationReason,
}

impl<T: Scalar> OptimisationResult<T> {
    /// Wraps a finished trajectory with its termination reason.
    pub fn new(trajectory: Trajectory<T>, termination: TerminationReason) -> Self {
        Self {
            trajectory,
            termination,
        }
    }

    /// The visited positions, index 0 being the start.
    pub fn trajectory(&self) -> &[DVector<T>] {
        self.trajectory.positions()
    }

    /// Objective value at each visited position.
    pub fn values(&self) -> &[T] {
        self.trajectory.values()
    }

    /// The last recorded position.
    pub fn final_position(&self) -> &DVector<T> {
        self.trajectory.last_position()
    }

    /// The objective value at the last recorded position.
    pub fn final_value(&self) -> T {
        self.trajectory.last_value()
    }

    /// Number of steps taken, i.e. the trajectory length minus one.
    pub fn iterations(&self) -> usize {
        self.trajectory.len() - 1
    }

    /// True if the run stopped because the iterates stopped moving.
    pub fn converged(&self) -> bool {
        self.termination == TerminationReason::Converged
    }

    /// Positions as a matrix with one row per recorded position.
    pub fn trajectory_matrix(&self) -> DMatrix<T> {
        self.trajectory.to_matrix()
    }

    /// Values as a vector, aligned with the rows of
    /// [`Self::trajectory_matrix`].
    pub fn value_vector(&self) -> DVector<T> {
        self.trajectory.value_vector()
    }

    /// The underlying trajectory record.
    pub fn record(&self) -> &Trajectory<T> {
        &self.trajectory
    }

    /// Unwraps the underlying trajectory record.
    pub fn into_record(self) -> Trajectory<T> {
        self.trajectory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::OptimizerError;

    fn sample() -> Trajectory<f64> {
        let mut trajectory = Trajectory::new(DVector::from_vec(vec![0.0, 1.0]), 5.0);
        trajectory
            .push(DVector::from_vec(vec![0.5, 0.5]), 2.0)
            .unwrap();
        trajectory
            .push(DVector::from_vec(vec![0.75, 0.25]), 1.0)
            .unwrap();
        trajectory
    }

    #[test]
    fn test_push_keeps_alignment() {
        let trajectory = sample();
        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.values().len(), trajectory.positions().len());
        assert!(!trajectory.is_empty());
        assert_eq!(trajectory.last_value(), 1.0);
        assert_eq!(trajectory.get(1).map(|(_, v)| v), Some(2.0));
        assert!(trajectory.get(3).is_none());
    }

    #[test]
    fn test_push_rejects_dimension_change() {
        let mut trajectory = sample();
        let err = trajectory.push(DVector::zeros(3), 0.0).unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Objective(ObjectiveError::DimensionMismatch { .. })
        ));
        assert_eq!(trajectory.len(), 3);
    }

    #[test]
    fn test_stacked_views() {
        let result = OptimisationResult::new(sample(), TerminationReason::MaxIterations);

        let matrix = result.trajectory_matrix();
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix[(1, 0)], 0.5);
        assert_eq!(matrix[(2, 1)], 0.25);

        assert_eq!(result.value_vector(), DVector::from_vec(vec![5.0, 2.0, 1.0]));
        assert_eq!(result.iterations(), 2);
        assert!(!result.converged());
        assert_eq!(result.final_position(), &DVector::from_vec(vec![0.75, 0.25]));
    }
}
