//! Rust Feedforward Neural Network Engine
//!
//! A minimal feedforward network built from an ordered stack of dense layers,
//! with forward inference and backpropagation written out by hand (no autodiff).
//!
//! # Modules
//!
//! - `layers`: Dense layer and the layer-type registry
//! - `network`: Network orchestration, forward/backward traces and updates
//! - `classifier`: Network wrapper that reads its output as a class index
//! - `serialization`: Serialized network representation
//! - `config`: JSON network configuration and network building
//! - `utils`: Activation and error functions, shape helpers, RNG
//! - `error`: Error type shared by the whole crate

pub mod classifier;
pub mod config;
pub mod error;
pub mod layers;
pub mod network;
pub mod serialization;
pub mod utils;

pub use classifier::{class_index, Classifier};
pub use error::{NetworkError, Result};
pub use layers::{DenseLayer, LayerKind, LayerParams};
pub use network::{BackwardTrace, ForwardTrace, Network};
pub use serialization::{LayerRecord, NetworkMeta, NetworkRecord};
pub use utils::{column, ActivationFunction, ErrorFunction, SimpleRng};
