//! Scalar classification metrics for one fixed stability threshold.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::ConfusionMasks;

/// Aggregate stability-classification metrics.
///
/// Degenerate denominators (no predicted positives, no actual positives,
/// empty input) yield NaN rather than an error, so per-threshold sweeps
/// never abort. Callers filter NaN when aggregating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetrics {
    /// Fraction of materials that are actually stable (null rate).
    pub prevalence: f64,
    pub precision: f64,
    pub recall: f64,
    /// Precision over prevalence: lift over random guessing.
    pub enrichment: f64,
    pub accuracy: f64,
    pub f1: f64,
    pub n_true_pos: usize,
    pub n_false_neg: usize,
    pub n_false_pos: usize,
    pub n_true_neg: usize,
}

impl StabilityMetrics {
    pub fn from_masks(masks: &ConfusionMasks) -> Self {
        let tp = masks.n_true_pos() as f64;
        let fns = masks.n_false_neg() as f64;
        let fp = masks.n_false_pos() as f64;
        let tn = masks.n_true_neg() as f64;
        let total = tp + fns + fp + tn;

        let prevalence = (tp + fns) / total;
        let precision = tp / (tp + fp);
        let recall = tp / (tp + fns);
        let enrichment = precision / prevalence;
        let accuracy = (tp + tn) / total;
        let f1 = 2.0 * precision * recall / (precision + recall);

        Self {
            prevalence,
            precision,
            recall,
            enrichment,
            accuracy,
            f1,
            n_true_pos: masks.n_true_pos(),
            n_false_neg: masks.n_false_neg(),
            n_false_pos: masks.n_false_pos(),
            n_true_neg: masks.n_true_neg(),
        }
    }

    /// Total number of classified materials.
    pub fn n_total(&self) -> usize {
        self.n_true_pos + self.n_false_neg + self.n_false_pos + self.n_true_neg
    }

    /// Plain metric-name → value mapping for arbitrary rendering or
    /// tracking backends.
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("prevalence".to_string(), self.prevalence),
            ("precision".to_string(), self.precision),
            ("recall".to_string(), self.recall),
            ("enrichment".to_string(), self.enrichment),
            ("accuracy".to_string(), self.accuracy),
            ("f1".to_string(), self.f1),
        ])
    }
}
