//! The optimiser loop and the pieces it is built from.

pub mod line_search;
pub mod observer;
pub mod optimizer;
pub mod trajectory;

// Re-export optimization components
pub use line_search::*;
pub use observer::*;
pub use optimizer::*;
pub use trajectory::*;
