//! Dense (fully connected) layer implementation
//!
//! A DenseLayer computes `y = f(W x + b)` for a column vector `x`, where `f` is
//! the layer's activation function. The layer owns only its parameters: the
//! output `y` and error signal `delta` are returned to the caller, which passes
//! them back in for the backward pass and the update.

use crate::error::{NetworkError, Result};
use crate::layers::LayerKind;
use crate::serialization::LayerRecord;
use crate::utils::shape::{ensure_column, to_nested};
use crate::utils::{ActivationFunction, SimpleRng};
use ndarray::{Array2, ArrayViewMut2};
use std::fmt;

/// Dense layer with weights, biases and an activation function.
///
/// # Fields
///
/// * `weights` - Weight matrix W (n_output × n_input)
/// * `biases` - Bias column b (n_output × 1)
/// * `activation` - Activation applied to `W x + b`
///
/// # Example
///
/// ```ignore
/// use rust_feedforward_nn::layers::DenseLayer;
/// use rust_feedforward_nn::utils::{column, ActivationFunction, SimpleRng};
///
/// let mut rng = SimpleRng::new(42);
/// let layer = DenseLayer::new(3, 2, ActivationFunction::Logistic, &mut rng);
/// let y = layer.propagate_forward(&column(&[0.5, -0.5]))?;
/// assert_eq!(y.dim(), (3, 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    weights: Array2<f64>,
    biases: Array2<f64>,
    activation: ActivationFunction,
}

impl DenseLayer {
    /// Create a new DenseLayer with uniformly initialized parameters.
    ///
    /// Every weight and bias is sampled from `[-1, 1)`.
    ///
    /// # Arguments
    ///
    /// * `n_output` - Number of units in this layer
    /// * `n_prev_output` - Number of outputs of the previous layer (or network inputs)
    /// * `activation` - Activation function of the layer
    /// * `rng` - Random number generator for initialization
    pub fn new(
        n_output: usize,
        n_prev_output: usize,
        activation: ActivationFunction,
        rng: &mut SimpleRng,
    ) -> Self {
        let weights = Array2::from_shape_simple_fn((n_output, n_prev_output), || {
            rng.gen_range_f64(-1.0, 1.0)
        });
        let biases = Array2::from_shape_simple_fn((n_output, 1), || rng.gen_range_f64(-1.0, 1.0));

        Self {
            weights,
            biases,
            activation,
        }
    }

    /// Create a layer from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` unless `biases` is `(weights.nrows(), 1)`.
    pub fn from_parameters(
        weights: Array2<f64>,
        biases: Array2<f64>,
        activation: ActivationFunction,
    ) -> Result<Self> {
        ensure_column("layer biases", &biases, weights.nrows())?;
        Ok(Self {
            weights,
            biases,
            activation,
        })
    }

    pub fn n_input(&self) -> usize {
        self.weights.ncols()
    }

    pub fn n_output(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn biases(&self) -> &Array2<f64> {
        &self.biases
    }

    /// Mutable view of the weights. The view cannot change the layer's shape.
    pub fn weights_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.weights.view_mut()
    }

    /// Mutable view of the biases.
    pub fn biases_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.biases.view_mut()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn kind(&self) -> LayerKind {
        LayerKind::of(&self.activation)
    }

    /// Number of trainable parameters: n_output × n_input weights plus n_output biases.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Mean of all weights.
    pub fn average_weight(&self) -> f64 {
        self.weights.mean().unwrap_or(0.0)
    }

    /// Mean absolute weight, a quick indicator of weight growth during training.
    pub fn average_abs_weight(&self) -> f64 {
        self.weights.mapv(f64::abs).mean().unwrap_or(0.0)
    }

    /// Replace weights and biases wholesale, keeping the layer's shape.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if either matrix differs in shape from the current one.
    pub fn set_parameters(&mut self, weights: Array2<f64>, biases: Array2<f64>) -> Result<()> {
        if weights.dim() != self.weights.dim() {
            return Err(NetworkError::shape(
                "layer weights",
                self.weights.dim(),
                weights.dim(),
            ));
        }
        ensure_column("layer biases", &biases, self.n_output())?;

        self.weights = weights;
        self.biases = biases;
        Ok(())
    }

    /// Forward propagation: `y = f(W x + b)`.
    ///
    /// # Arguments
    ///
    /// * `x` - Input column vector (n_input × 1)
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `x` is not `(n_input, 1)`.
    pub fn propagate_forward(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        ensure_column("layer input", x, self.n_input())?;
        let s = self.weights.dot(x) + &self.biases;
        self.activation.value(&s)
    }

    /// Backward propagation of the error signal.
    ///
    /// For a hidden layer, `delta = J(y) · next_Wᵀ · next_delta`, where `next_W`
    /// and `next_delta` belong to the layer closer to the output. For the output
    /// layer (`next_weights` is `None`), `next_delta` is the loss gradient and
    /// `delta = J(y) · next_delta`.
    ///
    /// # Arguments
    ///
    /// * `y` - This layer's output from the forward pass (n_output × 1)
    /// * `next_delta` - Error signal flowing in from the output side
    /// * `next_weights` - Weights of the next layer, `None` for the output layer
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if any operand does not conform.
    pub fn propagate_backward(
        &self,
        y: &Array2<f64>,
        next_delta: &Array2<f64>,
        next_weights: Option<&Array2<f64>>,
    ) -> Result<Array2<f64>> {
        ensure_column("layer output", y, self.n_output())?;
        let jacobian = self.activation.jacobian(y)?;

        let delta = match next_weights {
            Some(next_w) => {
                if next_w.ncols() != self.n_output() {
                    return Err(NetworkError::shape(
                        "next layer weights",
                        (next_w.nrows(), self.n_output()),
                        next_w.dim(),
                    ));
                }
                ensure_column("next layer delta", next_delta, next_w.nrows())?;
                jacobian.dot(&next_w.t().dot(next_delta))
            }
            None => {
                ensure_column("loss gradient", next_delta, self.n_output())?;
                jacobian.dot(next_delta)
            }
        };
        Ok(delta)
    }

    /// Gradient-descent step: `W -= ε · delta · prev_yᵀ`, `b -= ε · delta`.
    ///
    /// # Arguments
    ///
    /// * `prev_y` - Input this layer saw in the forward pass (n_input × 1)
    /// * `delta` - This layer's error signal from the backward pass (n_output × 1)
    /// * `epsilon` - Learning rate
    pub fn update(
        &mut self,
        prev_y: &Array2<f64>,
        delta: &Array2<f64>,
        epsilon: f64,
    ) -> Result<()> {
        ensure_column("previous layer output", prev_y, self.n_input())?;
        ensure_column("layer delta", delta, self.n_output())?;

        self.weights.scaled_add(-epsilon, &delta.dot(&prev_y.t()));
        self.biases.scaled_add(-epsilon, delta);
        Ok(())
    }

    /// Serializable form of this layer.
    pub fn to_record(&self) -> LayerRecord {
        let (alpha, beta) = match self.activation {
            ActivationFunction::Tanh { alpha, beta } => (Some(alpha), Some(beta)),
            _ => (None, None),
        };

        LayerRecord {
            layer_type: self.activation.name().to_string(),
            weights: to_nested(&self.weights),
            biases: to_nested(&self.biases),
            alpha,
            beta,
        }
    }
}

impl fmt::Display for DenseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.activation.name())
    }
}
