//! Paired (true, predicted) energy-above-hull series sharing an index.

use std::collections::BTreeMap;

use hullbench_core::errors::{HullbenchError, Result};

/// A joined pair of hull-distance series for the same materials.
///
/// Construction enforces the index contract: both inputs must cover the
/// same material ids, and rows where either value is NaN are dropped (not
/// imputed) before any metric sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct HullDistPair {
    ids: Vec<String>,
    e_above_hull_true: Vec<f64>,
    e_above_hull_pred: Vec<f64>,
}

impl HullDistPair {
    /// Builds a pair from positionally aligned columns.
    ///
    /// Lengths must agree; NaN rows are excluded.
    pub fn new(ids: Vec<String>, e_true: Vec<f64>, e_pred: Vec<f64>) -> Result<Self> {
        if ids.len() != e_true.len() || ids.len() != e_pred.len() {
            return Err(HullbenchError::index_mismatch(format!(
                "ids/true/pred lengths differ: {} / {} / {}",
                ids.len(),
                e_true.len(),
                e_pred.len()
            )));
        }
        let mut kept_ids = Vec::with_capacity(ids.len());
        let mut kept_true = Vec::with_capacity(ids.len());
        let mut kept_pred = Vec::with_capacity(ids.len());
        for ((id, t), p) in ids.into_iter().zip(e_true).zip(e_pred) {
            if t.is_nan() || p.is_nan() {
                continue;
            }
            kept_ids.push(id);
            kept_true.push(t);
            kept_pred.push(p);
        }
        Ok(Self {
            ids: kept_ids,
            e_above_hull_true: kept_true,
            e_above_hull_pred: kept_pred,
        })
    }

    /// Joins two id-keyed series. The key sets must be identical; a
    /// mismatch fails loudly rather than silently reindexing.
    pub fn join(
        truth: &BTreeMap<String, f64>,
        pred: &BTreeMap<String, f64>,
    ) -> Result<Self> {
        if truth.len() != pred.len() || truth.keys().ne(pred.keys()) {
            let only_truth = truth.keys().filter(|k| !pred.contains_key(*k)).count();
            let only_pred = pred.keys().filter(|k| !truth.contains_key(*k)).count();
            return Err(HullbenchError::index_mismatch(format!(
                "{only_truth} ids only in truth, {only_pred} ids only in predictions"
            )));
        }
        let ids: Vec<String> = truth.keys().cloned().collect();
        let e_true: Vec<f64> = truth.values().copied().collect();
        let e_pred: Vec<f64> = pred.values().copied().collect();
        Self::new(ids, e_true, e_pred)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Ground-truth hull distances (eV/atom).
    pub fn truth(&self) -> &[f64] {
        &self.e_above_hull_true
    }

    /// Model-predicted hull distances (eV/atom).
    pub fn pred(&self) -> &[f64] {
        &self.e_above_hull_pred
    }
}
