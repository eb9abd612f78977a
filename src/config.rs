//! Network configuration loaded from JSON
//!
//! A configuration describes the shape of a fresh network (as opposed to a
//! serialized network, which also carries learned weights).
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "xor",
//!   "n_input": 2,
//!   "error_func": "se",
//!   "epsilon": 0.5,
//!   "seed": 42,
//!   "layers": [
//!     {"type": "tanh", "n_output": 3, "alpha": 1.0, "beta": 1.0},
//!     {"type": "logistic", "n_output": 1}
//!   ]
//! }
//! ```

use crate::error::{NetworkError, Result};
use crate::layers::{LayerKind, LayerParams};
use crate::network::Network;
use crate::utils::{ErrorFunction, SimpleRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// One layer of a network configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Layer type tag: "logistic", "tanh" or "softmax"
    #[serde(rename = "type")]
    pub layer_type: String,

    /// Number of units in the layer
    pub n_output: usize,

    /// Output scale for tanh layers
    pub alpha: Option<f64>,

    /// Input scale for tanh layers
    pub beta: Option<f64>,
}

impl LayerConfig {
    pub fn params(&self) -> LayerParams {
        LayerParams {
            alpha: self.alpha,
            beta: self.beta,
        }
    }
}

/// Configuration for building a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,

    /// Width of the input vector
    pub n_input: usize,

    /// Error function tag (default "se")
    #[serde(default = "default_error_func")]
    pub error_func: String,

    /// Learning rate
    pub epsilon: f64,

    /// Seed for weight initialization; seeded from the clock when absent
    pub seed: Option<u64>,

    /// Layers in forward order
    pub layers: Vec<LayerConfig>,
}

fn default_error_func() -> String {
    ErrorFunction::SquaredError.name().to_string()
}

/// Loads a network configuration from a JSON file.
///
/// # Returns
///
/// `Ok(NetworkConfig)` on success, or an error if the file cannot be read,
/// the JSON is invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use rust_feedforward_nn::config::load_config;
///
/// let cfg = load_config("config/xor.json").unwrap();
/// assert_eq!(cfg.error_func, "se");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NetworkConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses and validates a configuration from a JSON string.
pub fn parse_config(json: &str) -> Result<NetworkConfig> {
    let config: NetworkConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks names, widths and hyperparameters before any layer is built.
pub fn validate_config(config: &NetworkConfig) -> Result<()> {
    if config.n_input == 0 {
        return Err(NetworkError::InvalidConfig(
            "n_input must be greater than 0".to_string(),
        ));
    }

    if !(config.epsilon.is_finite() && config.epsilon > 0.0) {
        return Err(NetworkError::InvalidConfig(format!(
            "epsilon must be positive and finite, got {}",
            config.epsilon
        )));
    }

    ErrorFunction::from_name(&config.error_func)?;

    if config.layers.is_empty() {
        return Err(NetworkError::InvalidConfig(
            "network must have at least one layer".to_string(),
        ));
    }

    for (i, layer) in config.layers.iter().enumerate() {
        let kind = LayerKind::from_tag(&layer.layer_type)?;
        if layer.n_output == 0 {
            return Err(NetworkError::InvalidConfig(format!(
                "layer {}: n_output must be greater than 0",
                i
            )));
        }
        kind.activation(&layer.params())?;
    }

    Ok(())
}

/// Builds a network with freshly initialized weights from a configuration.
///
/// # Examples
///
/// ```no_run
/// use rust_feedforward_nn::config::{build_network, load_config};
///
/// let config = load_config("config/xor.json").unwrap();
/// let network = build_network(&config).unwrap();
/// assert_eq!(network.layers().len(), config.layers.len());
/// ```
pub fn build_network(config: &NetworkConfig) -> Result<Network> {
    validate_config(config)?;

    let rng = config
        .seed
        .map(SimpleRng::new)
        .unwrap_or_else(SimpleRng::from_time);
    let mut network = Network::with_rng(
        config.name.clone(),
        config.n_input,
        &config.error_func,
        config.epsilon,
        rng,
    )?;

    for layer in &config.layers {
        network.add_layer(&layer.layer_type, layer.n_output, &layer.params())?;
    }

    info!(
        network = %network.name(),
        layers = network.layers().len(),
        parameters = network.parameter_count(),
        "built network from config"
    );
    Ok(network)
}
