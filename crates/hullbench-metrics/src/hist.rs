//! Histogram series of classified materials vs. hull distance.
//!
//! Produces the per-bin confusion-bucket counts behind the stacked
//! "classified stable vs. hull distance" histogram, plus a per-bin rolling
//! accuracy. Numeric series only; rendering is someone else's job.

use hullbench_core::errors::{HullbenchError, Result};

use crate::classify::classify_stable;

/// Which hull-distance axis to bin on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhichEnergy {
    /// Ground-truth (DFT) hull distance.
    True,
    /// Model-predicted hull distance.
    Pred,
}

/// Stacked histogram of confusion buckets over a hull-distance grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedHistogram {
    /// Bin edges, length `n_bins + 1`.
    pub bin_edges: Vec<f64>,
    pub true_pos: Vec<usize>,
    pub false_neg: Vec<usize>,
    pub false_pos: Vec<usize>,
    pub true_neg: Vec<usize>,
    /// Per-bin accuracy (TP + TN) / count; NaN for empty bins.
    pub accuracy: Vec<f64>,
}

impl ClassifiedHistogram {
    pub fn n_bins(&self) -> usize {
        self.true_pos.len()
    }

    /// Total count per bin across all four buckets.
    pub fn totals(&self) -> Vec<usize> {
        (0..self.n_bins())
            .map(|i| self.true_pos[i] + self.false_neg[i] + self.false_pos[i] + self.true_neg[i])
            .collect()
    }
}

/// Bins classified materials by hull distance.
///
/// Classification always thresholds both series; `which_energy` only
/// selects which axis the histogram runs over. Materials outside `x_lim`
/// are excluded from the counts (matching the plotting range), not
/// clamped.
pub fn hist_classified_stable_vs_hull_dist(
    e_above_hull_true: &[f64],
    e_above_hull_pred: &[f64],
    stability_threshold: f64,
    which_energy: WhichEnergy,
    x_lim: (f64, f64),
    n_bins: usize,
) -> Result<ClassifiedHistogram> {
    if n_bins == 0 || !(x_lim.1 > x_lim.0) {
        return Err(HullbenchError::parse(format!(
            "invalid histogram grid: x_lim={x_lim:?}, n_bins={n_bins}"
        )));
    }
    let masks = classify_stable(e_above_hull_true, e_above_hull_pred, stability_threshold)?;

    let width = (x_lim.1 - x_lim.0) / n_bins as f64;
    let bin_edges: Vec<f64> = (0..=n_bins).map(|i| x_lim.0 + i as f64 * width).collect();

    let axis = match which_energy {
        WhichEnergy::True => e_above_hull_true,
        WhichEnergy::Pred => e_above_hull_pred,
    };

    let mut hist = ClassifiedHistogram {
        bin_edges,
        true_pos: vec![0; n_bins],
        false_neg: vec![0; n_bins],
        false_pos: vec![0; n_bins],
        true_neg: vec![0; n_bins],
        accuracy: vec![f64::NAN; n_bins],
    };

    for (i, &x) in axis.iter().enumerate() {
        if x < x_lim.0 || x > x_lim.1 {
            continue;
        }
        // Right-inclusive last bin so the range endpoint is not dropped.
        let bin = (((x - x_lim.0) / width) as usize).min(n_bins - 1);
        if masks.true_pos[i] {
            hist.true_pos[bin] += 1;
        } else if masks.false_neg[i] {
            hist.false_neg[bin] += 1;
        } else if masks.false_pos[i] {
            hist.false_pos[bin] += 1;
        } else {
            hist.true_neg[bin] += 1;
        }
    }

    for bin in 0..n_bins {
        let total =
            hist.true_pos[bin] + hist.false_neg[bin] + hist.false_pos[bin] + hist.true_neg[bin];
        if total > 0 {
            hist.accuracy[bin] =
                (hist.true_pos[bin] + hist.true_neg[bin]) as f64 / total as f64;
        }
    }

    Ok(hist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_land_in_expected_bins() {
        let e_true = [-0.3, -0.1, 0.1, 0.3];
        let e_pred = [-0.3, 0.1, -0.1, 0.3];
        let hist = hist_classified_stable_vs_hull_dist(
            &e_true,
            &e_pred,
            0.0,
            WhichEnergy::True,
            (-0.4, 0.4),
            4,
        )
        .unwrap();

        // Bins: [-0.4,-0.2), [-0.2,0), [0,0.2), [0.2,0.4]
        assert_eq!(hist.true_pos, vec![1, 0, 0, 0]);
        assert_eq!(hist.false_neg, vec![0, 1, 0, 0]);
        assert_eq!(hist.false_pos, vec![0, 0, 1, 0]);
        assert_eq!(hist.true_neg, vec![0, 0, 0, 1]);
        assert_eq!(hist.totals(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_pred_axis_rebins_without_reclassifying() {
        let e_true = [-0.3, -0.1, 0.1, 0.3];
        let e_pred = [-0.3, 0.1, -0.1, 0.3];
        let hist = hist_classified_stable_vs_hull_dist(
            &e_true,
            &e_pred,
            0.0,
            WhichEnergy::Pred,
            (-0.4, 0.4),
            4,
        )
        .unwrap();

        // Same buckets, different axis: the false negative (pred 0.1) now
        // lands in the third bin, the false positive (pred -0.1) in the
        // second.
        assert_eq!(hist.false_neg, vec![0, 0, 1, 0]);
        assert_eq!(hist.false_pos, vec![0, 1, 0, 0]);
    }

    #[test]
    fn test_out_of_range_materials_are_excluded() {
        let e_true = [-1.0, 0.0];
        let e_pred = [-1.0, 0.0];
        let hist = hist_classified_stable_vs_hull_dist(
            &e_true,
            &e_pred,
            0.0,
            WhichEnergy::True,
            (-0.4, 0.4),
            2,
        )
        .unwrap();
        assert_eq!(hist.totals().iter().sum::<usize>(), 1);
    }

    #[test]
    fn test_accuracy_nan_for_empty_bins() {
        let hist = hist_classified_stable_vs_hull_dist(
            &[-0.35],
            &[-0.35],
            0.0,
            WhichEnergy::True,
            (-0.4, 0.4),
            4,
        )
        .unwrap();
        assert!((hist.accuracy[0] - 1.0).abs() < 1e-12);
        assert!(hist.accuracy[1].is_nan());
        assert!(hist.accuracy[3].is_nan());
    }

    #[test]
    fn test_range_endpoint_included() {
        let hist = hist_classified_stable_vs_hull_dist(
            &[0.4],
            &[0.4],
            0.0,
            WhichEnergy::True,
            (-0.4, 0.4),
            4,
        )
        .unwrap();
        assert_eq!(hist.true_neg, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        assert!(hist_classified_stable_vs_hull_dist(
            &[0.0],
            &[0.0],
            0.0,
            WhichEnergy::True,
            (0.4, -0.4),
            4
        )
        .is_err());
    }
}
