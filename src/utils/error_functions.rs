//! Error (loss) functions
//!
//! An error function scores a network output `y` against a target `t` and
//! provides the gradient of that score with respect to `y`, which seeds the
//! backward pass.

use crate::error::{NetworkError, Result};
use crate::utils::shape::{ensure_column, ensure_single_column};
use ndarray::Array2;

/// Error function selectable by name on a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFunction {
    /// `E = 1/2 (t - y)^T (t - y)`, tag `"se"`
    SquaredError,
}

impl ErrorFunction {
    /// Every error function that can be selected by name.
    pub const REGISTERED: &'static [ErrorFunction] = &[ErrorFunction::SquaredError];

    /// Resolve an error function from its name tag.
    ///
    /// # Errors
    ///
    /// Returns `UnknownErrorFunction` listing the valid names.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::REGISTERED
            .iter()
            .copied()
            .find(|f| f.name() == name)
            .ok_or_else(|| NetworkError::UnknownErrorFunction {
                name: name.to_string(),
                valid: Self::REGISTERED.iter().map(|f| f.name()).collect(),
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorFunction::SquaredError => "se",
        }
    }

    /// Scalar error between target `t` and output `y`.
    pub fn value(&self, t: &Array2<f64>, y: &Array2<f64>) -> Result<f64> {
        check_pair(t, y)?;
        match self {
            ErrorFunction::SquaredError => {
                let diff = t - y;
                Ok(diff.iter().map(|d| d * d).sum::<f64>() / 2.0)
            }
        }
    }

    /// Gradient of the error with respect to `y`, same shape as `y`.
    pub fn derivative(&self, t: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
        check_pair(t, y)?;
        match self {
            ErrorFunction::SquaredError => Ok(y - t),
        }
    }
}

fn check_pair(t: &Array2<f64>, y: &Array2<f64>) -> Result<()> {
    ensure_single_column("network output", y)?;
    ensure_column("target", t, y.nrows())
}
