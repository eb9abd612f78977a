//! Feedforward network: an ordered stack of dense layers
//!
//! A [`Network`] owns its layers, one error function and a learning rate. One
//! training step is three explicit phases:
//!
//! 1. [`Network::forward_trace`] / [`Network::propagate_forward`] run the input
//!    through every layer.
//! 2. [`Network::propagate_backward`] seeds the output layer with the error
//!    gradient and walks the layers in reverse, producing a [`BackwardTrace`]
//!    with every layer's output and error signal.
//! 3. [`Network::update`] consumes that trace and applies one gradient-descent
//!    step per layer.
//!
//! The outputs and error signals live in the trace values, not in the layers,
//! so each phase's inputs are visible in its signature.
//!
//! # Example
//!
//! ```ignore
//! use rust_feedforward_nn::{column, LayerParams, Network};
//!
//! let mut network = Network::new("xor", 2, "se", 0.5)?;
//! network.add_layer("tanh", 3, &LayerParams::tanh(1.0, 1.0))?;
//! network.add_layer("logistic", 1, &LayerParams::default())?;
//!
//! let loss = network.train_sample(&column(&[1.0, 0.0]), &column(&[1.0]))?;
//! let output = network.propagate_forward(&column(&[1.0, 0.0]))?;
//! ```

use crate::error::{NetworkError, Result};
use crate::layers::{DenseLayer, LayerKind, LayerParams};
use crate::serialization::{NetworkMeta, NetworkRecord};
use crate::utils::shape::{ensure_column, from_nested};
use crate::utils::{ErrorFunction, SimpleRng};
use ndarray::Array2;
use tracing::{debug, trace};

/// Every layer output of one forward pass, plus the input that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardTrace {
    input: Array2<f64>,
    outputs: Vec<Array2<f64>>,
}

impl ForwardTrace {
    pub fn input(&self) -> &Array2<f64> {
        &self.input
    }

    /// Layer outputs in forward order.
    pub fn outputs(&self) -> &[Array2<f64>] {
        &self.outputs
    }

    /// Network output: the last layer's output, or the input for an empty network.
    pub fn output(&self) -> &Array2<f64> {
        self.outputs.last().unwrap_or(&self.input)
    }
}

/// A forward trace together with every layer's error signal.
#[derive(Debug, Clone, PartialEq)]
pub struct BackwardTrace {
    forward: ForwardTrace,
    deltas: Vec<Array2<f64>>,
}

impl BackwardTrace {
    pub fn forward(&self) -> &ForwardTrace {
        &self.forward
    }

    /// Error signals in forward (layer) order.
    pub fn deltas(&self) -> &[Array2<f64>] {
        &self.deltas
    }

    pub fn output(&self) -> &Array2<f64> {
        self.forward.output()
    }
}

/// Feedforward network of dense layers trained by online gradient descent.
///
/// # Fields
///
/// * `name` - Free-form name, carried through serialization
/// * `n_input` - Width of the input vector, fixed at construction
/// * `layers` - Layers in forward order; only appended, never removed
/// * `error_function` - Loss used to seed the backward pass
/// * `epsilon` - Learning rate
/// * `rng` - Generator used to initialize appended layers
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    n_input: usize,
    layers: Vec<DenseLayer>,
    error_function: ErrorFunction,
    epsilon: f64,
    rng: SimpleRng,
}

impl Network {
    /// Create an empty network whose layers are initialized from a time-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns `UnknownErrorFunction` if `error_func_name` is not registered.
    pub fn new(
        name: impl Into<String>,
        n_input: usize,
        error_func_name: &str,
        epsilon: f64,
    ) -> Result<Self> {
        Self::with_rng(name, n_input, error_func_name, epsilon, SimpleRng::from_time())
    }

    /// Create an empty network with an explicit RNG for reproducible initialization.
    pub fn with_rng(
        name: impl Into<String>,
        n_input: usize,
        error_func_name: &str,
        epsilon: f64,
        rng: SimpleRng,
    ) -> Result<Self> {
        let error_function = ErrorFunction::from_name(error_func_name)?;
        Ok(Self {
            name: name.into(),
            n_input,
            layers: Vec::new(),
            error_function,
            epsilon,
            rng,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_input(&self) -> usize {
        self.n_input
    }

    /// Width of the network output: the last layer's `n_output`, or `n_input`
    /// while the network has no layers.
    pub fn n_output(&self) -> usize {
        self.layers.last().map_or(self.n_input, DenseLayer::n_output)
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// Mutable access to one layer's parameters.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut DenseLayer> {
        self.layers.get_mut(index)
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(DenseLayer::parameter_count).sum()
    }

    pub fn error_function(&self) -> ErrorFunction {
        self.error_function
    }

    /// Select the error function by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownErrorFunction` and keeps the current function if `name`
    /// is not registered.
    pub fn set_error_function(&mut self, name: &str) -> Result<()> {
        self.error_function = ErrorFunction::from_name(name)?;
        debug!(network = %self.name, error_func = name, "error function changed");
        Ok(())
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Append a layer built from its type tag.
    ///
    /// The new layer consumes the current network output width and produces
    /// `n_output` values.
    ///
    /// # Arguments
    ///
    /// * `type_tag` - One of the registered layer tags (`logistic`, `tanh`, `softmax`)
    /// * `n_output` - Number of units in the new layer
    /// * `params` - Extra hyperparameters (`alpha`/`beta` for `tanh`)
    ///
    /// # Errors
    ///
    /// Returns `UnknownLayerType` or `MissingParameter`; the layer list is left
    /// unchanged on error.
    pub fn add_layer(
        &mut self,
        type_tag: &str,
        n_output: usize,
        params: &LayerParams,
    ) -> Result<()> {
        self.push_layer(type_tag, n_output, params)?;
        Ok(())
    }

    fn push_layer(
        &mut self,
        type_tag: &str,
        n_output: usize,
        params: &LayerParams,
    ) -> Result<&mut DenseLayer> {
        let kind = LayerKind::from_tag(type_tag)?;
        let activation = kind.activation(params)?;
        let n_prev_output = self.n_output();

        let layer = DenseLayer::new(n_output, n_prev_output, activation, &mut self.rng);
        debug!(
            network = %self.name,
            layer_type = kind.tag(),
            n_prev_output,
            n_output,
            "appended layer"
        );

        self.layers.push(layer);
        let index = self.layers.len() - 1;
        Ok(&mut self.layers[index])
    }

    /// Run `x` through every layer and return the final output.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `x` is not `(n_input, 1)`.
    pub fn propagate_forward(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        ensure_column("network input", x, self.n_input)?;
        self.layers
            .iter()
            .try_fold(x.clone(), |output, layer| layer.propagate_forward(&output))
    }

    /// Forward pass that keeps every layer's output.
    pub fn forward_trace(&self, x: &Array2<f64>) -> Result<ForwardTrace> {
        ensure_column("network input", x, self.n_input)?;

        let mut outputs: Vec<Array2<f64>> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let output = layer.propagate_forward(outputs.last().unwrap_or(x))?;
            outputs.push(output);
        }

        Ok(ForwardTrace {
            input: x.clone(),
            outputs,
        })
    }

    /// Compute every layer's error signal for the pair `(x, t)`.
    ///
    /// The forward pass is recomputed from `x`, the output layer is seeded with
    /// `error_function.derivative(t, output)`, and each layer's error signal is
    /// propagated toward the input through the next layer's weights.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `x` or `t` does not match the network widths.
    pub fn propagate_backward(&self, x: &Array2<f64>, t: &Array2<f64>) -> Result<BackwardTrace> {
        let forward = self.forward_trace(x)?;
        let mut delta = self.error_function.derivative(t, forward.output())?;

        let mut deltas = Vec::with_capacity(self.layers.len());
        let mut next_weights: Option<&Array2<f64>> = None;
        for (layer, y) in self.layers.iter().zip(forward.outputs.iter()).rev() {
            delta = layer.propagate_backward(y, &delta, next_weights)?;
            deltas.push(delta.clone());
            next_weights = Some(layer.weights());
        }
        deltas.reverse();

        Ok(BackwardTrace { forward, deltas })
    }

    /// Apply one gradient-descent step to every layer from a backward trace.
    ///
    /// Each layer is updated with its own error signal and the output of the
    /// layer before it (the trace input for the first layer).
    ///
    /// # Errors
    ///
    /// Returns `UnsetState` if the trace does not cover every layer, for example
    /// when a layer was appended after the trace was computed, and
    /// `InvalidShape` if any layer's widths differ from the trace. No layer is
    /// changed when an error is returned.
    pub fn update(&mut self, trace: &BackwardTrace) -> Result<()> {
        let n_layers = self.layers.len();
        if trace.deltas.len() != n_layers || trace.forward.outputs.len() != n_layers {
            return Err(NetworkError::UnsetState(format!(
                "backward trace covers {} layers but the network has {}; \
                 run propagate_backward first",
                trace.deltas.len(),
                n_layers
            )));
        }

        let mut prev_y = &trace.forward.input;
        for ((layer, delta), y) in self
            .layers
            .iter()
            .zip(&trace.deltas)
            .zip(&trace.forward.outputs)
        {
            ensure_column("previous layer output", prev_y, layer.n_input())?;
            ensure_column("layer delta", delta, layer.n_output())?;
            prev_y = y;
        }

        let epsilon = self.epsilon;
        let mut prev_y = &trace.forward.input;
        for ((layer, delta), y) in self
            .layers
            .iter_mut()
            .zip(&trace.deltas)
            .zip(&trace.forward.outputs)
        {
            layer.update(prev_y, delta, epsilon)?;
            prev_y = y;
        }
        Ok(())
    }

    /// One online training step on `(x, t)`: backward pass then update.
    ///
    /// Returns the loss measured before the update.
    pub fn train_sample(&mut self, x: &Array2<f64>, t: &Array2<f64>) -> Result<f64> {
        self.train_step(x, t).map(|(loss, _)| loss)
    }

    /// Training step that also hands back the output seen before the update.
    pub(crate) fn train_step(
        &mut self,
        x: &Array2<f64>,
        t: &Array2<f64>,
    ) -> Result<(f64, Array2<f64>)> {
        let backward = self.propagate_backward(x, t)?;
        let loss = self.error_function.value(t, backward.output())?;
        self.update(&backward)?;
        trace!(network = %self.name, loss, "trained on sample");
        Ok((loss, backward.output().clone()))
    }

    /// Error-function value of the current output for `x` against `t`.
    pub fn loss(&self, x: &Array2<f64>, t: &Array2<f64>) -> Result<f64> {
        let output = self.propagate_forward(x)?;
        self.error_function.value(t, &output)
    }

    /// Serializable form of the whole network.
    pub fn to_record(&self) -> NetworkRecord {
        NetworkRecord {
            meta: NetworkMeta {
                name: self.name.clone(),
                n_input: self.n_input,
                error_func: self.error_function.name().to_string(),
                epsilon: self.epsilon,
            },
            layers: self.layers.iter().map(DenseLayer::to_record).collect(),
        }
    }

    /// Rebuild a network from its serialized form.
    ///
    /// Layers are re-added in array order by type tag, with `n_output` taken
    /// from the row count of `W`; the stored `W` and `b` then replace the
    /// freshly initialized parameters.
    ///
    /// # Errors
    ///
    /// Returns `UnknownErrorFunction`, `UnknownLayerType`, `MissingParameter`,
    /// `InvalidConfig` for `alpha`/`beta` on a non-tanh layer, or `InvalidShape`
    /// when a stored matrix does not chain with its neighbours.
    pub fn from_record(record: &NetworkRecord) -> Result<Self> {
        let meta = &record.meta;
        let mut network = Self::new(
            meta.name.clone(),
            meta.n_input,
            &meta.error_func,
            meta.epsilon,
        )?;

        for (index, layer_record) in record.layers.iter().enumerate() {
            let weights = from_nested(&format!("layer {} W", index), &layer_record.weights)?;
            let biases = from_nested(&format!("layer {} b", index), &layer_record.biases)?;

            let layer = network.push_layer(
                &layer_record.layer_type,
                layer_record.n_output(),
                &layer_record.params(),
            )?;
            layer.set_parameters(weights, biases)?;
        }

        debug!(
            network = %network.name,
            layers = network.layers.len(),
            "restored network from record"
        );
        Ok(network)
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_record().to_json()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_record(&NetworkRecord::from_json(json)?)
    }
}
