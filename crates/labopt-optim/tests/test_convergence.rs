//! End-to-end convergence tests for both step strategies.

use approx::assert_relative_eq;
use labopt_core::prelude::*;
use labopt_optim::{Newton, NewtonConfig, SteepestDescent, SteepestDescentConfig};
use pretty_assertions::assert_eq;

/// `½ xᵀAx + bᵀx` with A = [[3, 1], [1, 2]] and b = [-1, -1], minimised at
/// (0.2, 0.4).
fn convex_quadratic() -> QuadraticObjective<f64> {
    let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
    let b = DVector::from_vec(vec![-1.0, -1.0]);
    QuadraticObjective::new(a, b, 0.0).unwrap()
}

fn assert_within(position: &DVector<f64>, target: &DVector<f64>, tol: f64) {
    let error = (position - target).amax();
    assert!(error < tol, "|{position} - {target}| = {error} >= {tol}");
}

#[test]
fn test_both_strategies_converge_on_quadratic() {
    let objective = convex_quadratic();
    let minimiser = objective.minimiser().unwrap();
    let start = DVector::from_vec(vec![2.0, -3.0]);

    for tol in [1e-4, 1e-6] {
        let newton = optimise(&start, tol, &objective, &Newton::default(), Some(100)).unwrap();
        assert!(newton.converged());
        assert_within(newton.final_position(), &minimiser, tol);

        let descent =
            optimise(&start, tol, &objective, &SteepestDescent::default(), Some(100)).unwrap();
        assert!(descent.converged());
        assert_within(descent.final_position(), &minimiser, tol);
    }
}

#[test]
fn test_newton_needs_one_step_on_quadratic() {
    let objective = convex_quadratic();
    let start = DVector::from_vec(vec![2.0, -3.0]);
    let result = optimise(&start, 1e-6, &objective, &Newton::default(), Some(100)).unwrap();

    // one step to the minimiser, one more to notice it stopped moving
    assert_eq!(result.trajectory().len(), 3);
    assert_relative_eq!(result.values()[0], 10.0, epsilon = 1e-12);
    assert_relative_eq!(result.values()[1], -0.3, epsilon = 1e-10);
    assert_relative_eq!(result.values()[2], -0.3, epsilon = 1e-10);
}

#[test]
fn test_value_trace_trends_downward() {
    let objective = convex_quadratic();
    let start = DVector::from_vec(vec![2.0, -3.0]);
    let result =
        optimise(&start, 1e-8, &objective, &SteepestDescent::default(), Some(100)).unwrap();

    let values = result.values();
    assert!(values.windows(2).all(|pair| pair[1] <= pair[0]));
    assert!(values[values.len() - 1] < values[0]);
}

#[test]
fn test_newton_solves_rosenbrock() {
    let minimiser = Rosenbrock::minimiser::<f64>();

    for (start, max_len) in [(vec![1.2, 1.2], 12), (vec![-1.2, 1.0], 20)] {
        let start = DVector::from_vec(start);
        let result = optimise(&start, 1e-6, &Rosenbrock, &Newton::default(), None).unwrap();

        assert!(result.converged());
        assert!(result.trajectory().len() <= max_len);
        assert_within(result.final_position(), &minimiser, 1e-6);
    }
}

#[test]
fn test_steepest_descent_makes_progress_on_rosenbrock() {
    let start = DVector::from_vec(vec![-1.2, 1.0]);
    let result =
        optimise(&start, 1e-6, &Rosenbrock, &SteepestDescent::default(), Some(200)).unwrap();

    // the valley is too narrow for steepest descent to finish in 200 steps
    assert_eq!(result.termination, TerminationReason::MaxIterations);
    assert_eq!(result.trajectory().len(), 201);
    assert!(result.final_value() < 0.1 * result.values()[0]);
}

#[test]
fn test_zero_iterations() {
    let start = DVector::from_vec(vec![1.2, 1.2]);
    for result in [
        optimise(&start, 1e-6, &Rosenbrock, &Newton::default(), Some(0)),
        optimise(&start, 1e-6, &Rosenbrock, &SteepestDescent::default(), Some(0)),
    ] {
        let result = result.unwrap();
        assert_eq!(result.trajectory(), &[start.clone()]);
        assert_eq!(result.trajectory_matrix().nrows(), 1);
    }
}

#[test]
fn test_normal_fit_matches_closed_form() {
    let samples = DVector::from_vec(vec![1.0, 2.0, 2.5, 3.5, 6.0]);
    let objective = NormalNll::new(samples).unwrap();
    let expected = objective.closed_form();

    for start in [vec![2.0, 1.5], vec![0.0, 1.0], vec![5.0, 4.0]] {
        let start = DVector::from_vec(start);

        let newton = optimise(&start, 1e-6, &objective, &Newton::default(), Some(100)).unwrap();
        assert!(newton.converged());
        assert_within(newton.final_position(), &expected, 1e-5);

        let descent =
            optimise(&start, 1e-6, &objective, &SteepestDescent::default(), Some(500)).unwrap();
        assert!(descent.converged());
        assert_within(descent.final_position(), &expected, 1e-4);
    }
}

#[test]
fn test_logistic_regression_fit() {
    // bias row plus one feature; the labels overlap so the MLE is finite
    let x = DMatrix::from_row_slice(
        2,
        6,
        &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -2.0, -1.0, -0.5, 0.5, 1.0, 2.0],
    );
    let y = DVector::from_vec(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    let objective = LogisticRegressionNll::new(x, y).unwrap();
    let start = DVector::zeros(2);

    let result = optimise(&start, 1e-6, &objective, &Newton::default(), Some(100)).unwrap();
    assert!(result.converged());
    assert!(objective.gradient(result.final_position()).unwrap().amax() < 1e-5);
    assert_relative_eq!(result.final_position()[1], 1.351112, epsilon = 1e-5);
}

#[test]
fn test_finite_difference_descent() {
    // a value-only objective is usable by steepest descent once wrapped
    let objective = FiniteDifference::with_step(convex_quadratic(), 1e-6).unwrap();
    let start = DVector::from_vec(vec![2.0, -3.0]);

    let result =
        optimise(&start, 1e-6, &objective, &SteepestDescent::default(), Some(200)).unwrap();
    assert!(result.converged());
    assert_within(result.final_position(), &DVector::from_vec(vec![0.2, 0.4]), 1e-4);

    let err = optimise(&start, 1e-6, &objective, &Newton::default(), Some(10)).unwrap_err();
    assert!(matches!(
        err,
        OptimizerError::Objective(ObjectiveError::NotImplemented { .. })
    ));
}

#[test]
fn test_custom_configuration() {
    let params = LineSearchParams::default()
        .with_offset_tolerance(1e-8)
        .with_value_tolerance(1e-10)
        .with_budget(400, 400);

    let newton = Newton::new(NewtonConfig::new().with_line_search_params(params.clone()));
    let descent =
        SteepestDescent::new(SteepestDescentConfig::new().with_line_search_params(params));

    let objective = convex_quadratic();
    let start = DVector::from_vec(vec![-4.0, 4.0]);
    let criterion = StoppingCriterion::new()
        .with_tolerance(1e-8)
        .with_max_iterations(500);

    for result in [
        Optimiser::new(&newton).with_criterion(criterion).run(&objective, &start),
        Optimiser::new(&descent).with_criterion(criterion).run(&objective, &start),
    ] {
        let result = result.unwrap();
        assert!(result.converged());
        assert_within(result.final_position(), &objective.minimiser().unwrap(), 1e-6);
    }
}
