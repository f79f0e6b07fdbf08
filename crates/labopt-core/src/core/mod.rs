//! Core traits and types: scalars, errors, objectives and finite differences.

pub mod error;
pub mod finite_difference;
pub mod objective;
pub mod types;

// Re-export core types
pub use error::*;
pub use finite_difference::*;
pub use objective::*;
pub use types::*;
