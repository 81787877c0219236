//! ROC and precision–recall curves over the predicted-stability ranking.
//!
//! The predicted hull distance acts as the classifier score with *lower =
//! more stable*: sweeping the decision threshold from the most negative
//! prediction upward traces the curves, so materials enter most-stable-first.

use hullbench_core::errors::{HullbenchError, Result};

/// Receiver-operating-characteristic curve plus trapezoidal AUC.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// False-positive rate at each swept threshold (starts at 0).
    pub fpr: Vec<f64>,
    /// True-positive rate at each swept threshold (starts at 0).
    pub tpr: Vec<f64>,
    /// Predicted hull distance at which each (fpr, tpr) point is reached;
    /// NaN for the leading (0, 0) point.
    pub thresholds: Vec<f64>,
    /// Area under the curve; NaN when either class is absent.
    pub auc: f64,
}

/// Precision–recall curve plus trapezoidal area.
#[derive(Debug, Clone, PartialEq)]
pub struct PrCurve {
    /// Recall at each swept threshold (starts at 0).
    pub recall: Vec<f64>,
    /// Precision at each swept threshold (starts at 1 by convention).
    pub precision: Vec<f64>,
    /// Predicted hull distance at which each point is reached; NaN for the
    /// leading point.
    pub thresholds: Vec<f64>,
    /// Area under the curve; NaN when no actual positives exist.
    pub area: f64,
}

fn ranked_positives(
    e_above_hull_true: &[f64],
    e_above_hull_pred: &[f64],
    stability_threshold: f64,
) -> Result<(Vec<bool>, Vec<usize>)> {
    if e_above_hull_true.len() != e_above_hull_pred.len() {
        return Err(HullbenchError::index_mismatch(format!(
            "true series has {} entries, predicted has {}",
            e_above_hull_true.len(),
            e_above_hull_pred.len()
        )));
    }
    let is_positive: Vec<bool> = e_above_hull_true
        .iter()
        .map(|&t| t <= stability_threshold)
        .collect();
    let mut order: Vec<usize> = (0..e_above_hull_pred.len()).collect();
    order.sort_by(|&a, &b| {
        e_above_hull_pred[a]
            .partial_cmp(&e_above_hull_pred[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok((is_positive, order))
}

/// Computes the ROC curve of a stability classifier.
///
/// Ground truth: stable iff true hull distance ≤ `stability_threshold`.
/// Degenerate label distributions (all positive or all negative) yield NaN
/// rates/AUC rather than an error.
pub fn roc_curve(
    e_above_hull_true: &[f64],
    e_above_hull_pred: &[f64],
    stability_threshold: f64,
) -> Result<RocCurve> {
    let (is_positive, order) =
        ranked_positives(e_above_hull_true, e_above_hull_pred, stability_threshold)?;
    let total_pos = is_positive.iter().filter(|&&p| p).count() as f64;
    let total_neg = is_positive.len() as f64 - total_pos;

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresholds = vec![f64::NAN];
    let mut tp = 0.0;
    let mut fp = 0.0;
    for &idx in &order {
        if is_positive[idx] {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        tpr.push(tp / total_pos);
        fpr.push(fp / total_neg);
        thresholds.push(e_above_hull_pred[idx]);
    }

    let auc = trapezoid_area(&fpr, &tpr);
    Ok(RocCurve {
        fpr,
        tpr,
        thresholds,
        auc,
    })
}

/// Computes the precision–recall curve of a stability classifier.
///
/// At sweep rank k every one of the k most-stable-ranked materials is
/// treated as predicted stable, so precision is TP/k and recall is
/// TP/total-positives. The leading point is (recall 0, precision 1) by the
/// usual convention, and the sweep stops at the first rank reaching full
/// recall: later ranks only dilute precision at constant recall.
pub fn precision_recall_curve(
    e_above_hull_true: &[f64],
    e_above_hull_pred: &[f64],
    stability_threshold: f64,
) -> Result<PrCurve> {
    let (is_positive, order) =
        ranked_positives(e_above_hull_true, e_above_hull_pred, stability_threshold)?;
    let total_pos = is_positive.iter().filter(|&&p| p).count() as f64;

    let mut recall = vec![0.0];
    let mut precision = vec![1.0];
    let mut thresholds = vec![f64::NAN];
    let mut tp = 0.0;
    for (rank, &idx) in order.iter().enumerate() {
        if is_positive[idx] {
            tp += 1.0;
        }
        recall.push(tp / total_pos);
        precision.push(tp / (rank as f64 + 1.0));
        thresholds.push(e_above_hull_pred[idx]);
        if total_pos > 0.0 && tp == total_pos {
            break;
        }
    }

    let area = trapezoid_area(&recall, &precision);
    Ok(PrCurve {
        recall,
        precision,
        thresholds,
        area,
    })
}

/// Trapezoid-rule area under (xs, ys). NaN coordinates poison the result,
/// which is exactly the degenerate-input contract.
fn trapezoid_area(xs: &[f64], ys: &[f64]) -> f64 {
    let mut area = 0.0;
    for i in 1..xs.len() {
        area += (xs[i] - xs[i - 1]) * (ys[i] + ys[i - 1]) / 2.0;
    }
    area
}
