//! Ordinary least-squares polynomial fit used as the starting point.

use ndarray::{Array1, Array2};

use crate::error::RegressionError;

/// Least-squares coefficients of a polynomial of `order`, ascending powers.
///
/// Solves the normal equations of the Vandermonde system by Gaussian
/// elimination with partial pivoting.
///
/// # Errors
///
/// [`RegressionError::SingularPolyfit`] if the normal matrix is singular,
/// e.g. when `x` has fewer distinct values than coefficients.
pub fn polyfit(x: &[f64], y: &[f64], order: usize) -> Result<Vec<f64>, RegressionError> {
    let k = order + 1;
    let vandermonde = Array2::from_shape_fn((x.len(), k), |(i, j)| x[i].powi(j as i32));
    let y = Array1::from_vec(y.to_vec());

    let normal = vandermonde.t().dot(&vandermonde);
    let rhs = vandermonde.t().dot(&y);
    solve(normal, rhs)
}

fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Vec<f64>, RegressionError> {
    let n = b.len();
    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0);

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot, col]].abs() <= 1e-12 * scale {
            return Err(RegressionError::SingularPolyfit);
        }
        if pivot != col {
            for j in 0..n {
                a.swap([pivot, j], [col, j]);
            }
            b.swap(pivot, col);
        }
        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            for j in col..n {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut coefficients = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|j| a[[row, j]] * coefficients[j]).sum();
        coefficients[row] = (b[row] - tail) / a[[row, row]];
    }
    Ok(coefficients)
}
