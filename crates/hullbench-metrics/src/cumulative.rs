//! Cumulative precision/recall over materials ranked by predicted
//! stability.

use hullbench_core::errors::Result;

use crate::classify::classify_stable;

/// Cumulative precision and recall curves over predicted-stability rank.
///
/// `precision_pct[i]` and `recall_pct[i]` are the running precision and
/// true-positive rate (both in percent) after including the `i+1` materials
/// with the lowest predicted hull distance. `truncation` is the rank at
/// which the running TPR first reaches its maximum; points past it add no
/// information and are suppressed from the presentation slices.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeCurves {
    pub precision_pct: Vec<f64>,
    pub recall_pct: Vec<f64>,
    /// Rank order: indices into the original series, sorted by predicted
    /// hull distance ascending (most stable first).
    pub rank_order: Vec<usize>,
    /// Index of the argmax of the TPR sequence (first occurrence).
    pub truncation: usize,
}

impl CumulativeCurves {
    /// Running precision up to the truncation rank.
    pub fn precision_truncated(&self) -> &[f64] {
        &self.precision_pct[..self.truncation]
    }

    /// Running recall up to the truncation rank.
    pub fn recall_truncated(&self) -> &[f64] {
        &self.recall_pct[..self.truncation]
    }
}

/// Computes cumulative precision/recall for one model.
///
/// Materials enter most-stable-first (predicted hull distance ascending).
/// Precision is cumulative-TP / cumulative-predicted-positive; recall is
/// cumulative-TP / total-actual-positive. Degenerate denominators (no
/// predictions yet classified stable, or no actually-stable materials)
/// propagate NaN. Decision logic operates on the raw step sequence; see
/// [`crate::spline`] for presentation-only smoothing.
pub fn cumulative_precision_recall(
    e_above_hull_true: &[f64],
    e_above_hull_pred: &[f64],
    stability_threshold: f64,
) -> Result<CumulativeCurves> {
    let masks = classify_stable(e_above_hull_true, e_above_hull_pred, stability_threshold)?;

    let mut rank_order: Vec<usize> = (0..e_above_hull_pred.len()).collect();
    rank_order.sort_by(|&a, &b| {
        e_above_hull_pred[a]
            .partial_cmp(&e_above_hull_pred[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n_total_pos = masks.n_actual_pos() as f64;

    let mut precision_pct = Vec::with_capacity(rank_order.len());
    let mut recall_pct = Vec::with_capacity(rank_order.len());
    let mut tp_cum = 0.0;
    let mut fp_cum = 0.0;
    for &idx in &rank_order {
        if masks.true_pos[idx] {
            tp_cum += 1.0;
        }
        if masks.false_pos[idx] {
            fp_cum += 1.0;
        }
        precision_pct.push(tp_cum / (tp_cum + fp_cum) * 100.0);
        recall_pct.push(tp_cum / n_total_pos * 100.0);
    }

    let truncation = argmax_ignore_nan(&recall_pct);

    Ok(CumulativeCurves {
        precision_pct,
        recall_pct,
        rank_order,
        truncation,
    })
}

/// Endpoints of the "optimal recall" overlay: the diagonal from the origin
/// to (number of materials below the known hull, 100%). Represents the best
/// achievable recall trajectory with zero false positives.
pub fn optimal_recall_endpoint(e_above_hull_true: &[f64]) -> (usize, f64) {
    let n_below_hull = e_above_hull_true.iter().filter(|&&t| t < 0.0).count();
    (n_below_hull, 100.0)
}

/// First index of the maximum, skipping NaN. Returns 0 for empty or
/// all-NaN input.
fn argmax_ignore_nan(values: &[f64]) -> usize {
    let mut best_idx = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_nan() && v > best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_model_reaches_full_recall() {
        // Predictions identical to truth: three stable, two unstable.
        let e_true = [-0.2, -0.1, -0.05, 0.1, 0.3];
        let curves = cumulative_precision_recall(&e_true, &e_true, 0.0).unwrap();

        // Ranked most-stable-first, recall climbs 33.3 → 66.7 → 100.
        assert!((curves.recall_pct[0] - 100.0 / 3.0).abs() < 1e-9);
        assert!((curves.recall_pct[2] - 100.0).abs() < 1e-9);
        // Precision stays 100% throughout the stable prefix.
        for i in 0..3 {
            assert!((curves.precision_pct[i] - 100.0).abs() < 1e-9);
        }
        // Truncated at the rank where all stable materials are found.
        assert_eq!(curves.truncation, 2);
    }

    #[test]
    fn test_recall_never_exceeds_100_and_is_monotone() {
        let e_true = [-0.2, 0.1, -0.1, 0.05, -0.3, 0.2];
        let e_pred = [-0.1, -0.05, 0.02, 0.2, -0.25, 0.1];
        let curves = cumulative_precision_recall(&e_true, &e_pred, 0.0).unwrap();

        let mut previous = 0.0;
        for &r in &curves.recall_pct {
            assert!(r <= 100.0 + 1e-9);
            assert!(r >= previous - 1e-9, "recall decreased");
            previous = r;
        }
    }

    #[test]
    fn test_false_positive_lowers_running_precision() {
        // Most-stable-ranked material is a false positive.
        let e_true = [0.1, -0.1];
        let e_pred = [-0.2, -0.1];
        let curves = cumulative_precision_recall(&e_true, &e_pred, 0.0).unwrap();
        assert_eq!(curves.rank_order, vec![0, 1]);
        assert!((curves.precision_pct[0] - 0.0).abs() < 1e-12);
        assert!((curves.precision_pct[1] - 50.0).abs() < 1e-12);
        assert!((curves.recall_pct[1] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_truncated_slices_stop_at_argmax() {
        let e_true = [-0.1, -0.2, 0.1, 0.2, 0.3];
        let e_pred = [-0.1, -0.2, -0.05, 0.2, 0.3];
        let curves = cumulative_precision_recall(&e_true, &e_pred, 0.0).unwrap();
        // Both true positives found by the second-ranked material; the FP
        // that follows adds nothing.
        assert_eq!(curves.truncation, 1);
        assert_eq!(curves.recall_truncated().len(), 1);
        assert_eq!(curves.precision_truncated().len(), 1);
    }

    #[test]
    fn test_optimal_recall_endpoint_counts_below_hull() {
        let e_true = [-0.2, -0.001, 0.0, 0.1];
        assert_eq!(optimal_recall_endpoint(&e_true), (2, 100.0));
    }

    #[test]
    fn test_no_actual_positives_gives_nan_recall() {
        let e_true = [0.1, 0.2];
        let e_pred = [-0.1, 0.3];
        let curves = cumulative_precision_recall(&e_true, &e_pred, 0.0).unwrap();
        assert!(curves.recall_pct.iter().all(|r| r.is_nan()));
    }
}
