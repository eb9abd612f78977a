//! Activation functions for dense layers
//!
//! Each activation maps a pre-activation column vector `s` to an output column
//! vector `y`, and exposes its Jacobian with respect to `s`. The Jacobian is
//! always evaluated from the *output* `y`, which is what backpropagation has at
//! hand when it walks the layers in reverse.
//!
//! - Logistic: component-wise, diagonal Jacobian
//! - Tanh(alpha, beta): component-wise, diagonal Jacobian
//! - Softmax: couples every output, full Jacobian
//! - Rectifier: component-wise, diagonal Jacobian

use crate::error::Result;
use crate::utils::shape::ensure_single_column;
use ndarray::{Array1, Array2};

/// Lower clamp applied to every softmax component before renormalizing.
pub const SOFTMAX_MIN: f64 = 1e-6;
/// Upper clamp applied to every softmax component before renormalizing.
pub const SOFTMAX_MAX: f64 = 1e7;

/// Activation function attached to a layer.
///
/// Instances carry no per-call state and are `Copy`, so a single value can be
/// shared by every layer with the same configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationFunction {
    /// `y = 1 / (1 + e^-s)`
    Logistic,
    /// `y = alpha * tanh(beta * s)`
    Tanh { alpha: f64, beta: f64 },
    /// `y = exp(s - max s) / sum(exp(s - max s))`, clamped and renormalized
    Softmax,
    /// `y = max(0, s)`
    Rectifier,
}

impl ActivationFunction {
    /// Name tag used in the serialized format.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Logistic => "logistic",
            ActivationFunction::Tanh { .. } => "tanh",
            ActivationFunction::Softmax => "softmax",
            ActivationFunction::Rectifier => "rectifier",
        }
    }

    /// Apply the activation to a pre-activation column vector.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `s` has more than one column.
    pub fn value(&self, s: &Array2<f64>) -> Result<Array2<f64>> {
        ensure_single_column(&format!("{} value", self.name()), s)?;

        let y = match *self {
            ActivationFunction::Logistic => s.mapv(|v| 1.0 / (1.0 + (-v).exp())),
            ActivationFunction::Tanh { alpha, beta } => s.mapv(|v| alpha * (beta * v).tanh()),
            ActivationFunction::Softmax => softmax(s),
            ActivationFunction::Rectifier => s.mapv(|v| v.max(0.0)),
        };
        Ok(y)
    }

    /// Jacobian `dy/ds` evaluated from the output `y`.
    ///
    /// Returns an `n x n` matrix for an `n x 1` output. Component-wise
    /// activations give a diagonal matrix with exact zeros off the diagonal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `y` has more than one column.
    pub fn jacobian(&self, y: &Array2<f64>) -> Result<Array2<f64>> {
        ensure_single_column(&format!("{} jacobian", self.name()), y)?;
        let y_col = y.column(0);

        let jacobian = match *self {
            ActivationFunction::Logistic => diagonal(y_col.mapv(|v| v * (1.0 - v))),
            ActivationFunction::Tanh { alpha, beta } => {
                // tanh(beta * s) = y / alpha, so the derivative needs no second tanh call.
                diagonal(y_col.mapv(|v| {
                    if alpha == 0.0 {
                        0.0
                    } else {
                        let ratio = v / alpha;
                        alpha * beta * (1.0 - ratio * ratio)
                    }
                }))
            }
            ActivationFunction::Softmax => diagonal(y_col.to_owned()) - y.dot(&y.t()),
            ActivationFunction::Rectifier => {
                diagonal(y_col.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }))
            }
        };
        Ok(jacobian)
    }

    /// True for activations whose Jacobian is diagonal.
    pub fn is_component_wise(&self) -> bool {
        !matches!(self, ActivationFunction::Softmax)
    }
}

fn diagonal(values: Array1<f64>) -> Array2<f64> {
    Array2::from_diag(&values)
}

/// Max-subtracted softmax with clamping into `[SOFTMAX_MIN, SOFTMAX_MAX]`.
fn softmax(s: &Array2<f64>) -> Array2<f64> {
    let max_value = s.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let exp_s = s.mapv(|v| (v - max_value).exp());
    let sum = exp_s.sum();

    let clamped = (exp_s / sum).mapv(|v| v.clamp(SOFTMAX_MIN, SOFTMAX_MAX));
    let total = clamped.sum();
    clamped / total
}
