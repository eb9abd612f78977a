//! Error types for the network engine
//!
//! Every fallible operation in the crate returns [`Result`]. Errors are raised at
//! the point of detection and never retried or recovered internally.

use thiserror::Error;

/// Errors produced while building, running or (de)serializing a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A layer type tag that is not in the registered set.
    #[error("unknown layer type '{name}'; layer type must be one of: {}", .valid.join(", "))]
    UnknownLayerType {
        name: String,
        valid: Vec<&'static str>,
    },

    /// An error function name that is not in the registered set.
    #[error("unknown error function '{name}'; error_func must be one of: {}", .valid.join(", "))]
    UnknownErrorFunction {
        name: String,
        valid: Vec<&'static str>,
    },

    /// A matrix or vector with a non-conforming shape.
    #[error("invalid shape in {context}: expected {expected}, got {actual}")]
    InvalidShape {
        context: String,
        expected: String,
        actual: String,
    },

    /// A phase of the forward/backward/update protocol was skipped.
    #[error("unset state: {0}")]
    UnsetState(String),

    /// A layer type that needs a hyperparameter was built without it.
    #[error("layer type '{layer}' requires parameter '{parameter}'")]
    MissingParameter {
        layer: &'static str,
        parameter: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    /// Shorthand for an [`NetworkError::InvalidShape`] built from two `(rows, cols)` pairs.
    pub(crate) fn shape(
        context: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        NetworkError::InvalidShape {
            context: context.into(),
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_layer_type_lists_valid_tags() {
        let err = NetworkError::UnknownLayerType {
            name: "relu".to_string(),
            valid: vec!["logistic", "tanh", "softmax"],
        };
        let message = err.to_string();
        assert!(message.contains("'relu'"));
        assert!(message.contains("logistic, tanh, softmax"));
    }

    #[test]
    fn test_shape_helper_formats_dimensions() {
        let err = NetworkError::shape("tanh jacobian", (3, 1), (3, 2));
        assert_eq!(
            err.to_string(),
            "invalid shape in tanh jacobian: expected 3x1, got 3x2"
        );
    }
}
