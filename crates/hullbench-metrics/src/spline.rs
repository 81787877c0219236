//! Natural cubic spline resampling for presentation-only curve smoothing.
//!
//! The raw step curves from [`crate::cumulative`] stay authoritative for
//! all decision logic (classification, truncation); this module only
//! produces denser, visually smooth samples for a rendering layer.

use hullbench_core::errors::{HullbenchError, Result};

/// Evaluates a natural cubic spline through (xs, ys) at `sample_xs`.
///
/// `xs` must be strictly increasing and match `ys` in length. With fewer
/// than three knots the spline degenerates to linear interpolation.
/// Samples outside the knot range are clamped to the end segments.
pub fn natural_cubic_spline(xs: &[f64], ys: &[f64], sample_xs: &[f64]) -> Result<Vec<f64>> {
    if xs.len() != ys.len() {
        return Err(HullbenchError::index_mismatch(format!(
            "{} knots vs {} values",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(HullbenchError::parse(
            "spline needs at least two knots".to_string(),
        ));
    }
    for pair in xs.windows(2) {
        if pair[1] <= pair[0] {
            return Err(HullbenchError::parse(format!(
                "knots must be strictly increasing, got {} then {}",
                pair[0], pair[1]
            )));
        }
    }

    let n = xs.len();
    // Second derivatives at each knot; natural boundary conditions pin the
    // endpoints to zero curvature. Tridiagonal solve (Thomas algorithm).
    let mut m = vec![0.0; n];
    if n > 2 {
        let mut diag = vec![0.0; n - 2];
        let mut upper = vec![0.0; n - 2];
        let mut rhs = vec![0.0; n - 2];
        for i in 1..n - 1 {
            let h_lo = xs[i] - xs[i - 1];
            let h_hi = xs[i + 1] - xs[i];
            diag[i - 1] = 2.0 * (h_lo + h_hi);
            upper[i - 1] = h_hi;
            rhs[i - 1] = 6.0 * ((ys[i + 1] - ys[i]) / h_hi - (ys[i] - ys[i - 1]) / h_lo);
        }
        // Forward elimination: lower diagonal equals the previous row's h.
        for i in 1..n - 2 {
            let h_lo = xs[i + 1] - xs[i];
            let factor = h_lo / diag[i - 1];
            diag[i] -= factor * upper[i - 1];
            rhs[i] -= factor * rhs[i - 1];
        }
        // Back substitution.
        m[n - 2] = rhs[n - 3] / diag[n - 3];
        for i in (1..n - 2).rev() {
            m[i] = (rhs[i - 1] - upper[i - 1] * m[i + 1]) / diag[i - 1];
        }
    }

    let mut out = Vec::with_capacity(sample_xs.len());
    for &x in sample_xs {
        let x = x.clamp(xs[0], xs[n - 1]);
        // Segment index such that xs[seg] <= x <= xs[seg + 1].
        let seg = match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Less)) {
            Ok(i) => i.min(n - 2),
            Err(i) => i.saturating_sub(1).min(n - 2),
        };
        let h = xs[seg + 1] - xs[seg];
        let a = (xs[seg + 1] - x) / h;
        let b = (x - xs[seg]) / h;
        let value = a * ys[seg]
            + b * ys[seg + 1]
            + ((a.powi(3) - a) * m[seg] + (b.powi(3) - b) * m[seg + 1]) * h * h / 6.0;
        out.push(value);
    }
    Ok(out)
}

/// Smooths a rank-indexed curve (x implicitly 0, 1, 2, …) by resampling
/// `samples_per_step` points per rank through a natural cubic spline.
pub fn smooth_rank_curve(ys: &[f64], samples_per_step: usize) -> Result<Vec<f64>> {
    let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
    let total = (ys.len().saturating_sub(1)) * samples_per_step.max(1) + 1;
    let step = if total > 1 {
        (ys.len() - 1) as f64 / (total - 1) as f64
    } else {
        0.0
    };
    let sample_xs: Vec<f64> = (0..total).map(|i| i as f64 * step).collect();
    natural_cubic_spline(&xs, ys, &sample_xs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_knots_exactly() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 0.0, 1.0, 0.0];
        let out = natural_cubic_spline(&xs, &ys, &xs).unwrap();
        for (got, want) in out.iter().zip(&ys) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_data_stays_linear() {
        let xs: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let samples = [0.5, 1.25, 3.75, 4.5];
        let out = natural_cubic_spline(&xs, &ys, &samples).unwrap();
        for (&x, &y) in samples.iter().zip(&out) {
            assert!((y - (2.0 * x + 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_two_knots_fall_back_to_linear() {
        let out = natural_cubic_spline(&[0.0, 2.0], &[0.0, 4.0], &[1.0]).unwrap();
        assert!((out[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_samples_are_clamped_to_range() {
        let out = natural_cubic_spline(&[0.0, 1.0], &[3.0, 5.0], &[-1.0, 2.0]).unwrap();
        assert!((out[0] - 3.0).abs() < 1e-12);
        assert!((out[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_unsorted_knots() {
        assert!(natural_cubic_spline(&[0.0, 0.0], &[1.0, 2.0], &[0.0]).is_err());
        assert!(natural_cubic_spline(&[1.0, 0.0], &[1.0, 2.0], &[0.0]).is_err());
    }

    #[test]
    fn test_smooth_rank_curve_density() {
        let ys = [0.0, 50.0, 75.0, 100.0];
        let smooth = smooth_rank_curve(&ys, 10).unwrap();
        assert_eq!(smooth.len(), 31);
        assert!((smooth[0] - 0.0).abs() < 1e-9);
        assert!((smooth[30] - 100.0).abs() < 1e-9);
        // Knot values are preserved at every 10th sample.
        assert!((smooth[10] - 50.0).abs() < 1e-9);
        assert!((smooth[20] - 75.0).abs() < 1e-9);
    }
}
