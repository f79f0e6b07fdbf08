//! Ready-made objective functions.
//!
//! - [`Rosenbrock`]: the classic non-convex test function
//! - [`LogisticRegressionNll`]: binary classification loss
//! - [`NormalNll`]: maximum-likelihood fit of a univariate normal

pub mod logistic;
pub mod normal;
pub mod rosenbrock;

pub use logistic::LogisticRegressionNll;
pub use normal::NormalNll;
pub use rosenbrock::Rosenbrock;
