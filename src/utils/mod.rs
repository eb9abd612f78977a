//! Shared building blocks for layers and networks
//!
//! Activation and error functions, shape helpers, and the RNG used for
//! weight initialization.

pub mod activations;
pub mod error_functions;
pub mod rng;
pub mod shape;

pub use activations::ActivationFunction;
pub use error_functions::ErrorFunction;
pub use rng::SimpleRng;
pub use shape::column;
