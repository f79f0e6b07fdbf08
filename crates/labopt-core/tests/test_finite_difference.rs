//! Tests for the finite-difference gradient adapter.
//!
//! The forward difference has an `O(h)` error, so with the default
//! `h = 1e-3` it should agree with analytic gradients to about three
//! significant digits.

use approx::assert_relative_eq;
use labopt_core::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_rosenbrock_gradient_matches_analytic() {
    let wrapped = FiniteDifference::new(Rosenbrock);
    let point = DVector::from_vec(vec![1.0, 2.0]);

    let approx = wrapped.gradient(&point).unwrap();
    let exact = Rosenbrock.gradient(&point).unwrap();

    assert_relative_eq!(approx[0], exact[0], max_relative = 1e-3);
    assert_relative_eq!(approx[1], exact[1], max_relative = 1e-3);

    // leading error term is h/2 times the second derivative (402 and 200)
    assert_relative_eq!(approx[0], -400.0 + 0.201, epsilon = 1e-3);
    assert_relative_eq!(approx[1], 200.1, epsilon = 1e-6);
}

#[test]
fn test_error_shrinks_with_step() {
    let point = DVector::from_vec(vec![-1.2, 1.0]);
    let exact = Rosenbrock.gradient(&point).unwrap();

    let errors: Vec<f64> = [1e-2, 1e-3, 1e-4]
        .into_iter()
        .map(|h| {
            let wrapped = FiniteDifference::with_step(Rosenbrock, h).unwrap();
            (wrapped.gradient(&point).unwrap() - &exact).amax()
        })
        .collect();

    assert!(errors[1] < errors[0]);
    assert!(errors[2] < errors[1]);
}

#[test]
fn test_hessian_fails_explicitly() {
    let wrapped = FiniteDifference::new(Rosenbrock);
    let err = Objective::<f64>::hessian(&wrapped, &DVector::from_vec(vec![1.0, 1.0])).unwrap_err();

    assert!(err.is_not_implemented());
    assert!(err.to_string().contains("hessian"));
}

#[test]
fn test_value_only_objective_gains_a_gradient() {
    #[derive(Debug)]
    struct Bowl;

    impl Objective<f64> for Bowl {
        fn value(&self, point: &DVector<f64>) -> Result<f64> {
            Ok(point.iter().map(|x| (x - 1.0).powi(2)).sum())
        }
    }

    let point = DVector::from_vec(vec![0.0, 3.0]);
    assert!(Bowl.gradient(&point).unwrap_err().is_not_implemented());

    let gradient = FiniteDifference::new(Bowl).gradient(&point).unwrap();
    assert_relative_eq!(gradient[0], -2.0, epsilon = 1e-2);
    assert_relative_eq!(gradient[1], 4.0, epsilon = 1e-2);
}

#[test]
fn test_evaluation_counts() {
    let counting = CountingObjective::new(Rosenbrock);
    let wrapped = FiniteDifference::new(&counting);

    Objective::<f64>::gradient(&wrapped, &DVector::from_vec(vec![0.5, 0.5])).unwrap();

    // one base evaluation plus one per coordinate
    let (values, gradients, hessians) = counting.counts();
    assert_eq!((values, gradients, hessians), (3, 0, 0));
}
