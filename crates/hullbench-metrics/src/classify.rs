//! Confusion-bucket classification of stability predictions.

use hullbench_core::errors::{HullbenchError, Result};

/// Four boolean masks partitioning a material index into confusion-matrix
/// buckets. Mutually exclusive and collectively exhaustive by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMasks {
    pub true_pos: Vec<bool>,
    pub false_neg: Vec<bool>,
    pub false_pos: Vec<bool>,
    pub true_neg: Vec<bool>,
}

impl ConfusionMasks {
    pub fn len(&self) -> usize {
        self.true_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.true_pos.is_empty()
    }

    pub fn n_true_pos(&self) -> usize {
        self.true_pos.iter().filter(|&&m| m).count()
    }

    pub fn n_false_neg(&self) -> usize {
        self.false_neg.iter().filter(|&&m| m).count()
    }

    pub fn n_false_pos(&self) -> usize {
        self.false_pos.iter().filter(|&&m| m).count()
    }

    pub fn n_true_neg(&self) -> usize {
        self.true_neg.iter().filter(|&&m| m).count()
    }

    /// Count of actually-stable materials (TP + FN).
    pub fn n_actual_pos(&self) -> usize {
        self.n_true_pos() + self.n_false_neg()
    }
}

/// Classifies each material as true/false positive/negative.
///
/// A material is actually stable iff its true hull distance is ≤
/// `stability_threshold`, and predicted stable iff its predicted hull
/// distance is ≤ the same threshold. Threshold 0 means a material must be
/// directly on or below the known hull; positive values relax the bar;
/// negative values require pulling the hull down by that amount.
///
/// Returns masks in (TP, FN, FP, TN) order. The two inputs must be
/// positionally aligned; a length mismatch fails loudly.
pub fn classify_stable(
    e_above_hull_true: &[f64],
    e_above_hull_pred: &[f64],
    stability_threshold: f64,
) -> Result<ConfusionMasks> {
    if e_above_hull_true.len() != e_above_hull_pred.len() {
        return Err(HullbenchError::index_mismatch(format!(
            "true series has {} entries, predicted has {}",
            e_above_hull_true.len(),
            e_above_hull_pred.len()
        )));
    }

    let n = e_above_hull_true.len();
    let mut masks = ConfusionMasks {
        true_pos: vec![false; n],
        false_neg: vec![false; n],
        false_pos: vec![false; n],
        true_neg: vec![false; n],
    };

    for i in 0..n {
        let actual_pos = e_above_hull_true[i] <= stability_threshold;
        let model_pos = e_above_hull_pred[i] <= stability_threshold;
        match (actual_pos, model_pos) {
            (true, true) => masks.true_pos[i] = true,
            (true, false) => masks.false_neg[i] = true,
            (false, true) => masks.false_pos[i] = true,
            (false, false) => masks.true_neg[i] = true,
        }
    }

    Ok(masks)
}
