//! Shape checks and conversions for column vectors and matrices
//!
//! Vectors are `(n, 1)` matrices throughout the crate. Every check here fails
//! with [`NetworkError::InvalidShape`] rather than broadcasting or truncating.

use crate::error::{NetworkError, Result};
use ndarray::Array2;

/// Build an `(n, 1)` column vector from a slice.
pub fn column(values: &[f64]) -> Array2<f64> {
    Array2::from_shape_fn((values.len(), 1), |(i, _)| values[i])
}

/// Require `m` to have exactly one column, of any height.
pub fn ensure_single_column(context: &str, m: &Array2<f64>) -> Result<()> {
    if m.ncols() != 1 {
        return Err(NetworkError::shape(context, (m.nrows(), 1), m.dim()));
    }
    Ok(())
}

/// Require `m` to be an `(rows, 1)` column vector.
pub fn ensure_column(context: &str, m: &Array2<f64>, rows: usize) -> Result<()> {
    if m.dim() != (rows, 1) {
        return Err(NetworkError::shape(context, (rows, 1), m.dim()));
    }
    Ok(())
}

/// Nested row-major representation used by the serialized format.
pub fn to_nested(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.outer_iter().map(|row| row.to_vec()).collect()
}

/// Rebuild a matrix from nested rows. Ragged rows are rejected.
pub fn from_nested(context: &str, rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);

    if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
        return Err(NetworkError::InvalidShape {
            context: context.to_string(),
            expected: format!("rows of length {}", n_cols),
            actual: format!("a row of length {}", bad.len()),
        });
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| NetworkError::InvalidShape {
        context: context.to_string(),
        expected: format!("{}x{}", n_rows, n_cols),
        actual: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_column_shape() {
        let v = column(&[1.0, 2.0, 3.0]);
        assert_eq!(v.dim(), (3, 1));
        assert_eq!(v[[2, 0]], 3.0);
    }

    #[test]
    fn test_ensure_column_rejects_wrong_height() {
        let v = column(&[1.0, 2.0]);
        assert!(ensure_column("input", &v, 2).is_ok());
        assert!(matches!(
            ensure_column("input", &v, 3),
            Err(NetworkError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_ensure_single_column_rejects_matrix() {
        let m = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(ensure_single_column("y", &m).is_err());
    }

    #[test]
    fn test_nested_conversion() {
        let m = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let nested = to_nested(&m);
        assert_eq!(nested, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(from_nested("W", &nested).unwrap(), m);
    }

    #[test]
    fn test_from_nested_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            from_nested("W", &rows),
            Err(NetworkError::InvalidShape { .. })
        ));
    }
}
