//! Rolling mean absolute error as a function of true hull distance.

use hullbench_core::errors::{HullbenchError, Result};

/// Window configuration for the rolling-MAE curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingWindow {
    /// Half-width of the averaging window (eV/atom). The full window is
    /// `2 × half_window`.
    pub half_window: f64,
    /// Step between consecutive bin centers (eV/atom).
    pub bin_width: f64,
    /// Hull-distance range covered by the bin-center grid.
    pub x_lim: (f64, f64),
}

impl Default for RollingWindow {
    fn default() -> Self {
        // 40 meV/atom window stepped every 2 meV/atom over the range where
        // discovery decisions happen.
        Self {
            half_window: 0.02,
            bin_width: 0.002,
            x_lim: (-0.2, 0.3),
        }
    }
}

/// Rolling MAE and its standard error over a regular hull-distance grid.
///
/// Bins with no materials carry NaN in both `mae` and `sem`; consumers
/// (e.g. an error-band renderer) skip those samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingMae {
    /// Bin centers (eV/atom).
    pub centers: Vec<f64>,
    /// Mean |pred − true| within each window (eV/atom).
    pub mae: Vec<f64>,
    /// Standard error of that mean (eV/atom).
    pub sem: Vec<f64>,
    /// Half window actually used, for scale-bar annotation downstream.
    pub half_window: f64,
}

/// Computes the rolling MAE of predicted vs. true hull distance.
///
/// For each bin center `c` on the grid, the window selects materials whose
/// *true* hull distance lies in `(c − half_window, c + half_window]` and
/// averages their absolute prediction errors. The standard error uses the
/// sample standard deviation (ddof = 1), so single-member windows yield
/// NaN SEM.
pub fn rolling_mae_vs_hull_dist(
    e_above_hull_true: &[f64],
    e_above_hull_pred: &[f64],
    window: RollingWindow,
) -> Result<RollingMae> {
    if e_above_hull_true.len() != e_above_hull_pred.len() {
        return Err(HullbenchError::index_mismatch(format!(
            "true series has {} entries, predicted has {}",
            e_above_hull_true.len(),
            e_above_hull_pred.len()
        )));
    }
    if !(window.bin_width > 0.0) || !(window.half_window > 0.0) {
        return Err(HullbenchError::parse(format!(
            "window must be positive: half_window={}, bin_width={}",
            window.half_window, window.bin_width
        )));
    }

    let abs_errors: Vec<f64> = e_above_hull_true
        .iter()
        .zip(e_above_hull_pred)
        .map(|(t, p)| (p - t).abs())
        .collect();

    let (x0, x1) = window.x_lim;
    let mut centers = Vec::new();
    let mut center = x0;
    while center < x1 {
        centers.push(center);
        center = x0 + (centers.len() as f64) * window.bin_width;
    }

    let mut mae = Vec::with_capacity(centers.len());
    let mut sem = Vec::with_capacity(centers.len());
    for &c in &centers {
        let low = c - window.half_window;
        let high = c + window.half_window;

        let mut n = 0usize;
        let mut sum = 0.0;
        for (i, &t) in e_above_hull_true.iter().enumerate() {
            if t > low && t <= high {
                n += 1;
                sum += abs_errors[i];
            }
        }

        if n == 0 {
            mae.push(f64::NAN);
            sem.push(f64::NAN);
            continue;
        }
        let mean = sum / n as f64;
        mae.push(mean);

        if n < 2 {
            sem.push(f64::NAN);
            continue;
        }
        let mut sq_dev = 0.0;
        for (i, &t) in e_above_hull_true.iter().enumerate() {
            if t > low && t <= high {
                sq_dev += (abs_errors[i] - mean).powi(2);
            }
        }
        let sample_std = (sq_dev / (n as f64 - 1.0)).sqrt();
        sem.push(sample_std / (n as f64).sqrt());
    }

    Ok(RollingMae {
        centers,
        mae,
        sem,
        half_window: window.half_window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_error_gives_flat_curve() {
        // Every prediction off by exactly 0.05 eV/atom.
        let e_true: Vec<f64> = (0..50).map(|i| -0.1 + i as f64 * 0.004).collect();
        let e_pred: Vec<f64> = e_true.iter().map(|t| t + 0.05).collect();
        let window = RollingWindow {
            half_window: 0.05,
            bin_width: 0.01,
            x_lim: (-0.05, 0.05),
        };
        let curve = rolling_mae_vs_hull_dist(&e_true, &e_pred, window).unwrap();

        for (&c, &m) in curve.centers.iter().zip(&curve.mae) {
            assert!(
                (m - 0.05).abs() < 1e-12,
                "MAE at center {c} was {m}, expected 0.05"
            );
        }
        // Constant errors have zero spread, hence zero SEM.
        for &s in &curve.sem {
            assert!(s.abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_windows_yield_nan() {
        // All materials near zero; far-out bins must be NaN, not a crash.
        let e_true = [0.0, 0.001, -0.001];
        let e_pred = [0.01, 0.0, 0.0];
        let window = RollingWindow {
            half_window: 0.01,
            bin_width: 0.1,
            x_lim: (-0.3, 0.31),
        };
        let curve = rolling_mae_vs_hull_dist(&e_true, &e_pred, window).unwrap();

        let populated: Vec<bool> = curve.mae.iter().map(|m| !m.is_nan()).collect();
        assert!(populated.iter().any(|&p| p), "no populated bin at all");
        assert!(!populated.iter().all(|&p| p), "expected empty far-out bins");
    }

    #[test]
    fn test_window_bounds_follow_half_open_convention() {
        // Material exactly at low edge excluded, at high edge included.
        let e_true = [0.02, -0.02];
        let e_pred = [0.03, 0.0];
        let window = RollingWindow {
            half_window: 0.02,
            bin_width: 1.0,
            x_lim: (0.0, 0.5),
        };
        let curve = rolling_mae_vs_hull_dist(&e_true, &e_pred, window).unwrap();
        // Window around 0.0 is (-0.02, 0.02]: only the first material counts.
        assert!((curve.mae[0] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_grid_spacing() {
        let window = RollingWindow::default();
        let curve = rolling_mae_vs_hull_dist(&[0.0], &[0.0], window).unwrap();
        assert_eq!(curve.centers.len(), 250);
        assert!((curve.centers[0] - (-0.2)).abs() < 1e-12);
        assert!((curve.centers[1] - curve.centers[0] - 0.002).abs() < 1e-12);
        assert!(*curve.centers.last().unwrap() < 0.3);
    }

    #[test]
    fn test_single_member_window_has_nan_sem() {
        let window = RollingWindow {
            half_window: 0.01,
            bin_width: 1.0,
            x_lim: (0.0, 0.5),
        };
        let curve = rolling_mae_vs_hull_dist(&[0.005], &[0.015], window).unwrap();
        assert!((curve.mae[0] - 0.01).abs() < 1e-12);
        assert!(curve.sem[0].is_nan());
    }
}
