/// Polynomial least-squares regression
///
/// Fits `y ≈ c0 + c1·t + ... + cd·t^d` where `t = x / scale` and `scale` is the
/// largest `|x|` in the training data. Scaling keeps the Vandermonde matrix
/// well conditioned for time indices in the hundreds; the system is then
/// solved by Householder QR rather than the normal equations.

use super::PredictionError;

/// Degree used for case and death curves
pub const DEFAULT_DEGREE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialModel {
    /// Coefficients in increasing power of the scaled input
    coefficients: Vec<f64>,
    scale: f64,
}

impl PolynomialModel {
    /// Fits a polynomial of the given degree
    ///
    /// The caller is responsible for choosing a degree the data supports; a
    /// system with fewer distinct `x` values than coefficients is reported as
    /// [`PredictionError::Singular`].
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self, PredictionError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(PredictionError::Empty);
        }

        let cols = degree + 1;
        if x.len() < cols {
            return Err(PredictionError::Singular);
        }

        let scale = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let scale = if scale > 0.0 { scale } else { 1.0 };

        let mut design = Vec::with_capacity(x.len() * cols);
        for &xi in x {
            let t = xi / scale;
            let mut power = 1.0;
            for _ in 0..cols {
                design.push(power);
                power *= t;
            }
        }

        let coefficients = least_squares(design, y.to_vec(), x.len(), cols)?;
        Ok(Self { coefficients, scale })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluates the fitted polynomial
    pub fn predict(&self, x: f64) -> f64 {
        let t = x / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * t + c)
    }
}

/// Solves `min ‖A·c − b‖` for a row-major `rows × cols` matrix
fn least_squares(
    mut a: Vec<f64>,
    mut b: Vec<f64>,
    rows: usize,
    cols: usize,
) -> Result<Vec<f64>, PredictionError> {
    let at = |r: usize, c: usize| r * cols + c;

    for k in 0..cols {
        let norm = (k..rows).map(|i| a[at(i, k)].powi(2)).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(PredictionError::Singular);
        }

        let alpha = if a[at(k, k)] > 0.0 { -norm } else { norm };
        let mut v: Vec<f64> = (k..rows).map(|i| a[at(i, k)]).collect();
        v[0] -= alpha;
        let v_norm_sq: f64 = v.iter().map(|x| x * x).sum();

        for j in k..cols {
            let dot: f64 = (k..rows).map(|i| v[i - k] * a[at(i, j)]).sum();
            let factor = 2.0 * dot / v_norm_sq;
            for i in k..rows {
                a[at(i, j)] -= factor * v[i - k];
            }
        }

        let dot: f64 = (k..rows).map(|i| v[i - k] * b[i]).sum();
        let factor = 2.0 * dot / v_norm_sq;
        for i in k..rows {
            b[i] -= factor * v[i - k];
        }
    }

    let max_diag = (0..cols).map(|k| a[at(k, k)].abs()).fold(0.0_f64, f64::max);
    let tolerance = max_diag * 1e-12 * rows as f64;

    let mut coefficients = vec![0.0; cols];
    for k in (0..cols).rev() {
        let diag = a[at(k, k)];
        if diag.abs() <= tolerance {
            return Err(PredictionError::Singular);
        }
        let tail: f64 = (k + 1..cols).map(|j| a[at(k, j)] * coefficients[j]).sum();
        coefficients[k] = (b[k] - tail) / diag;
    }

    if coefficients.iter().all(|c| c.is_finite()) {
        Ok(coefficients)
    } else {
        Err(PredictionError::Singular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn test_recovers_exact_quadratic() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|x| 2.0 + 3.0 * x + x * x).collect();

        let model = PolynomialModel::fit(&x, &y, 2).unwrap();
        assert_close(model.predict(10.0), 132.0);
        assert_close(model.predict(-1.0), 0.0);
    }

    #[test]
    fn test_degree_five_on_large_time_indices() {
        let x: Vec<f64> = (0..190).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|x| 50.0 * x + 1000.0).collect();

        let model = PolynomialModel::fit(&x, &y, DEFAULT_DEGREE).unwrap();
        assert_eq!(model.degree(), 5);
        let predicted = model.predict(190.0);
        assert!((predicted - 10_500.0).abs() < 1e-3, "{predicted}");
    }

    #[test]
    fn test_least_squares_averages_noise() {
        // Two observations per x; the best constant is the mean.
        let x = [0.0, 0.0, 1.0, 1.0];
        let y = [1.0, 3.0, 1.0, 3.0];
        let model = PolynomialModel::fit(&x, &y, 0).unwrap();
        assert_close(model.predict(5.0), 2.0);
    }

    #[test]
    fn test_too_few_points_is_singular() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        assert!(matches!(
            PolynomialModel::fit(&x, &y, 5),
            Err(PredictionError::Singular)
        ));
    }

    #[test]
    fn test_repeated_x_is_singular() {
        let x = [1.0, 1.0, 1.0, 1.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(matches!(
            PolynomialModel::fit(&x, &y, 2),
            Err(PredictionError::Singular)
        ));
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(matches!(
            PolynomialModel::fit(&[1.0], &[], 0),
            Err(PredictionError::Empty)
        ));
    }
}
