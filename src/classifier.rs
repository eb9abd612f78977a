//! Classifier: a network whose output is read as a class index
//!
//! The class is the output unit whose value is closest to 1.0.

use crate::error::{NetworkError, Result};
use crate::network::{BackwardTrace, Network};
use crate::serialization::NetworkRecord;
use crate::utils::shape::ensure_single_column;
use ndarray::Array2;
use std::ops::{Deref, DerefMut};

/// Index of the component closest to 1.0, `argmin_i |1 - y_i|`.
///
/// Ties go to the lowest index.
///
/// # Errors
///
/// Returns `InvalidShape` if `y` is not a non-empty column vector.
pub fn class_index(y: &Array2<f64>) -> Result<usize> {
    ensure_single_column("classifier output", y)?;

    y.column(0)
        .iter()
        .map(|v| (1.0 - v).abs())
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((i, distance)),
        })
        .map(|(i, _)| i)
        .ok_or_else(|| NetworkError::InvalidShape {
            context: "classifier output".to_string(),
            expected: "at least one output unit".to_string(),
            actual: "0x1".to_string(),
        })
}

/// Network wrapper that remembers its most recent output.
///
/// All [`Network`] methods are reachable through `Deref`; the forward and
/// backward passes are shadowed here so that [`Classifier::get_class`] always
/// reads the last computed output. The cached output is tied to the layer
/// count it was computed with, so appending a layer invalidates it.
#[derive(Debug, Clone)]
pub struct Classifier {
    network: Network,
    last_output: Option<LastOutput>,
}

#[derive(Debug, Clone)]
struct LastOutput {
    n_layers: usize,
    output: Array2<f64>,
}

impl Classifier {
    pub fn new(
        name: impl Into<String>,
        n_input: usize,
        error_func_name: &str,
        epsilon: f64,
    ) -> Result<Self> {
        Ok(Self::from_network(Network::new(
            name,
            n_input,
            error_func_name,
            epsilon,
        )?))
    }

    pub fn from_network(network: Network) -> Self {
        Self {
            network,
            last_output: None,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_inner(self) -> Network {
        self.network
    }

    /// Most recent output, or `None` if the network has grown since.
    pub fn last_output(&self) -> Option<&Array2<f64>> {
        self.last_output
            .as_ref()
            .filter(|last| last.n_layers == self.network.layers().len())
            .map(|last| &last.output)
    }

    fn remember(&mut self, output: Array2<f64>) {
        self.last_output = Some(LastOutput {
            n_layers: self.network.layers().len(),
            output,
        });
    }

    pub fn propagate_forward(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let output = self.network.propagate_forward(x)?;
        self.remember(output.clone());
        Ok(output)
    }

    pub fn propagate_backward(
        &mut self,
        x: &Array2<f64>,
        t: &Array2<f64>,
    ) -> Result<BackwardTrace> {
        let backward = self.network.propagate_backward(x, t)?;
        self.remember(backward.output().clone());
        Ok(backward)
    }

    pub fn train_sample(&mut self, x: &Array2<f64>, t: &Array2<f64>) -> Result<f64> {
        let (loss, output) = self.network.train_step(x, t)?;
        self.remember(output);
        Ok(loss)
    }

    /// Class of the most recent forward output.
    ///
    /// # Errors
    ///
    /// Returns `UnsetState` before any forward pass, or when a layer was
    /// appended after the last one.
    pub fn get_class(&self) -> Result<usize> {
        let output = self.last_output().ok_or_else(|| {
            NetworkError::UnsetState(
                "get_class called before propagate_forward on the current layers".to_string(),
            )
        })?;
        class_index(output)
    }

    /// Forward pass followed by [`Classifier::get_class`].
    pub fn classify(&mut self, x: &Array2<f64>) -> Result<usize> {
        self.propagate_forward(x)?;
        self.get_class()
    }

    pub fn to_record(&self) -> NetworkRecord {
        self.network.to_record()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_network(Network::from_json(json)?))
    }
}

impl Deref for Classifier {
    type Target = Network;

    fn deref(&self) -> &Network {
        &self.network
    }
}

impl DerefMut for Classifier {
    fn deref_mut(&mut self) -> &mut Network {
        &mut self.network
    }
}
