//! Layer types and the layer-type registry
//!
//! Networks build layers by type tag (`"logistic"`, `"tanh"`, `"softmax"`).
//! [`LayerKind`] is the closed set of known kinds; [`LayerKind::REGISTERED`]
//! is the subset a network will construct by name.

pub mod dense;

pub use dense::DenseLayer;

use crate::error::{NetworkError, Result};
use crate::utils::ActivationFunction;

/// Kind of dense layer, one per activation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Logistic,
    Tanh,
    Softmax,
    Rectifier,
}

impl LayerKind {
    /// Every layer kind the crate implements.
    pub const ALL: &'static [LayerKind] = &[
        LayerKind::Logistic,
        LayerKind::Tanh,
        LayerKind::Softmax,
        LayerKind::Rectifier,
    ];

    /// Layer kinds a network constructs by name.
    ///
    /// `Rectifier` is implemented but intentionally left out of this list.
    pub const REGISTERED: &'static [LayerKind] =
        &[LayerKind::Logistic, LayerKind::Tanh, LayerKind::Softmax];

    pub fn tag(&self) -> &'static str {
        match self {
            LayerKind::Logistic => "logistic",
            LayerKind::Tanh => "tanh",
            LayerKind::Softmax => "softmax",
            LayerKind::Rectifier => "rectifier",
        }
    }

    /// Resolve a registered layer kind from its tag.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLayerType` listing the registered tags when `tag` is not
    /// registered, including `"rectifier"`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::REGISTERED
            .iter()
            .copied()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| NetworkError::UnknownLayerType {
                name: tag.to_string(),
                valid: Self::registered_tags(),
            })
    }

    pub fn registered_tags() -> Vec<&'static str> {
        Self::REGISTERED.iter().map(LayerKind::tag).collect()
    }

    /// Build the activation function for this kind from its hyperparameters.
    ///
    /// # Errors
    ///
    /// `Tanh` returns `MissingParameter` when `alpha` or `beta` is absent. Every
    /// other kind returns `InvalidConfig` when either is present.
    pub fn activation(&self, params: &LayerParams) -> Result<ActivationFunction> {
        if *self != LayerKind::Tanh && !params.is_empty() {
            return Err(NetworkError::InvalidConfig(format!(
                "layer type '{}' does not take alpha or beta",
                self.tag()
            )));
        }

        let activation = match self {
            LayerKind::Logistic => ActivationFunction::Logistic,
            LayerKind::Softmax => ActivationFunction::Softmax,
            LayerKind::Rectifier => ActivationFunction::Rectifier,
            LayerKind::Tanh => ActivationFunction::Tanh {
                alpha: params.alpha.ok_or(NetworkError::MissingParameter {
                    layer: "tanh",
                    parameter: "alpha",
                })?,
                beta: params.beta.ok_or(NetworkError::MissingParameter {
                    layer: "tanh",
                    parameter: "beta",
                })?,
            },
        };
        Ok(activation)
    }

    /// Kind matching an activation function.
    pub fn of(activation: &ActivationFunction) -> Self {
        match activation {
            ActivationFunction::Logistic => LayerKind::Logistic,
            ActivationFunction::Tanh { .. } => LayerKind::Tanh,
            ActivationFunction::Softmax => LayerKind::Softmax,
            ActivationFunction::Rectifier => LayerKind::Rectifier,
        }
    }
}

/// Extra hyperparameters passed alongside a layer tag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerParams {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
}

impl LayerParams {
    pub fn is_empty(&self) -> bool {
        self.alpha.is_none() && self.beta.is_none()
    }

    /// Parameters for a `tanh` layer computing `alpha * tanh(beta * s)`.
    pub fn tanh(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_tags_exclude_rectifier() {
        assert_eq!(
            LayerKind::registered_tags(),
            vec!["logistic", "tanh", "softmax"]
        );
        assert!(LayerKind::ALL.contains(&LayerKind::Rectifier));
    }

    #[test]
    fn test_from_tag_unregistered() {
        for tag in ["rectifier", "relu", ""] {
            assert!(matches!(
                LayerKind::from_tag(tag),
                Err(NetworkError::UnknownLayerType { .. })
            ));
        }
    }

    #[test]
    fn test_tanh_requires_alpha_and_beta() {
        let missing_beta = LayerParams {
            alpha: Some(1.0),
            beta: None,
        };
        assert!(matches!(
            LayerKind::Tanh.activation(&missing_beta),
            Err(NetworkError::MissingParameter {
                parameter: "beta",
                ..
            })
        ));
        assert_eq!(
            LayerKind::Tanh
                .activation(&LayerParams::tanh(1.5, 0.5))
                .unwrap(),
            ActivationFunction::Tanh {
                alpha: 1.5,
                beta: 0.5
            }
        );
    }

    #[test]
    fn test_kind_of_activation_round_trips_tag() {
        for kind in LayerKind::ALL {
            let params = match kind {
                LayerKind::Tanh => LayerParams::tanh(1.0, 1.0),
                _ => LayerParams::default(),
            };
            let activation = kind.activation(&params).unwrap();
            assert_eq!(LayerKind::of(&activation), *kind);
            assert_eq!(activation.name(), kind.tag());
        }
    }

    #[test]
    fn test_non_tanh_rejects_hyperparameters() {
        let alpha_only = LayerParams {
            alpha: Some(2.0),
            beta: None,
        };
        for kind in [LayerKind::Logistic, LayerKind::Softmax, LayerKind::Rectifier] {
            assert!(matches!(
                kind.activation(&alpha_only),
                Err(NetworkError::InvalidConfig(_))
            ));
        }
    }
}
