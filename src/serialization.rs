//! Serialized network representation
//!
//! The structures here mirror the JSON exchanged with persistence code:
//!
//! ```json
//! {
//!   "meta": {"name": "xor", "n_input": 2, "error_func": "se", "epsilon": 0.1},
//!   "layers": [
//!     {"type": "tanh", "W": [[0.1, -0.2]], "b": [[0.3]], "alpha": 1.0, "beta": 1.0}
//!   ]
//! }
//! ```
//!
//! `alpha` and `beta` appear only on `tanh` layers. Reading and writing this
//! structure to storage is left to the caller.

use crate::error::Result;
use crate::layers::LayerParams;
use serde::{Deserialize, Serialize};

/// Network-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMeta {
    pub name: String,
    pub n_input: usize,
    pub error_func: String,
    pub epsilon: f64,
}

/// One serialized layer. `n_output` is the row count of `W`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    #[serde(rename = "type", default)]
    pub layer_type: String,
    #[serde(rename = "W")]
    pub weights: Vec<Vec<f64>>,
    #[serde(rename = "b")]
    pub biases: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl LayerRecord {
    pub fn n_output(&self) -> usize {
        self.weights.len()
    }

    pub fn params(&self) -> LayerParams {
        LayerParams {
            alpha: self.alpha,
            beta: self.beta,
        }
    }
}

/// Complete serialized network: metadata plus layers in forward order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub meta: NetworkMeta,
    pub layers: Vec<LayerRecord>,
}

impl NetworkRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TANH_NETWORK: &str = r#"{
        "meta": {"name": "tiny", "n_input": 2, "error_func": "se", "epsilon": 0.5},
        "layers": [
            {"type": "tanh", "W": [[0.1, -0.2]], "b": [[0.3]], "alpha": 1.5, "beta": 0.5}
        ]
    }"#;

    #[test]
    fn test_parse_record() {
        let record = NetworkRecord::from_json(TANH_NETWORK).unwrap();
        assert_eq!(record.meta.name, "tiny");
        assert_eq!(record.meta.n_input, 2);
        assert_eq!(record.layers.len(), 1);
        assert_eq!(record.layers[0].n_output(), 1);
        assert_eq!(record.layers[0].params(), LayerParams::tanh(1.5, 0.5));
    }

    #[test]
    fn test_non_tanh_layers_omit_hyperparameters() {
        let record = LayerRecord {
            layer_type: "logistic".to_string(),
            weights: vec![vec![1.0]],
            biases: vec![vec![0.0]],
            alpha: None,
            beta: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("type"));
        assert!(object.contains_key("W"));
        assert!(object.contains_key("b"));
        assert!(!object.contains_key("alpha"));
        assert!(!object.contains_key("beta"));
    }

    #[test]
    fn test_missing_type_defaults_to_empty_tag() {
        let record: LayerRecord = serde_json::from_str(r#"{"W": [[1.0]], "b": [[0.0]]}"#).unwrap();
        assert!(record.layer_type.is_empty());
    }
}
