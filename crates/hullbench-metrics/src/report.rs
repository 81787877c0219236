//! Tidy prediction tables and per-model benchmark summaries.
//!
//! This is the hand-off surface to excluded collaborators (experiment
//! tracking, site rendering): one ground-truth column, one column per
//! model, all serializable.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use hullbench_core::errors::{HullbenchError, Result};

use crate::classify::classify_stable;
use crate::pair::HullDistPair;
use crate::summary::StabilityMetrics;

/// Tidy table of hull-distance predictions for a set of models.
///
/// Columns are positionally aligned to `ids`; NaN marks a missing
/// prediction and is dropped pairwise when a model is evaluated, never
/// imputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionTable {
    pub ids: Vec<String>,
    /// Ground-truth energy above hull (eV/atom).
    #[serde(with = "nan_as_null::column")]
    pub e_above_hull_true: Vec<f64>,
    /// Model name → predicted energy above hull column.
    #[serde(with = "nan_as_null::columns")]
    pub models: BTreeMap<String, Vec<f64>>,
}

/// JSON has no NaN; missing values are written as `null` and read back as
/// NaN, mirroring how tabular tooling round-trips missing floats.
mod nan_as_null {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    fn pack(values: &[f64]) -> Vec<Option<f64>> {
        values
            .iter()
            .map(|&x| if x.is_nan() { None } else { Some(x) })
            .collect()
    }

    fn unpack(values: Vec<Option<f64>>) -> Vec<f64> {
        values
            .into_iter()
            .map(|x| x.unwrap_or(f64::NAN))
            .collect()
    }

    pub mod column {
        use super::*;

        pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(pack(values))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
            Ok(unpack(Vec::<Option<f64>>::deserialize(deserializer)?))
        }
    }

    pub mod columns {
        use super::*;

        pub fn serialize<S: Serializer>(
            columns: &BTreeMap<String, Vec<f64>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_map(columns.iter().map(|(name, col)| (name, pack(col))))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<BTreeMap<String, Vec<f64>>, D::Error> {
            let raw = BTreeMap::<String, Vec<Option<f64>>>::deserialize(deserializer)?;
            Ok(raw.into_iter().map(|(name, col)| (name, unpack(col))).collect())
        }
    }
}

impl PredictionTable {
    pub fn new(ids: Vec<String>, e_above_hull_true: Vec<f64>) -> Result<Self> {
        if ids.len() != e_above_hull_true.len() {
            return Err(HullbenchError::index_mismatch(format!(
                "{} ids vs {} truth values",
                ids.len(),
                e_above_hull_true.len()
            )));
        }
        Ok(Self {
            ids,
            e_above_hull_true,
            models: BTreeMap::new(),
        })
    }

    /// Adds one model's prediction column. Length must match the index.
    pub fn insert_model(
        &mut self,
        name: impl Into<String>,
        predictions: Vec<f64>,
    ) -> Result<()> {
        if predictions.len() != self.ids.len() {
            return Err(HullbenchError::index_mismatch(format!(
                "model column has {} values for {} ids",
                predictions.len(),
                self.ids.len()
            )));
        }
        self.models.insert(name.into(), predictions);
        Ok(())
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Joined (true, pred) pair for one model, NaN rows dropped.
    pub fn pair_for(&self, model: &str) -> Result<HullDistPair> {
        let predictions = self
            .models
            .get(model)
            .ok_or_else(|| HullbenchError::index_mismatch(format!("unknown model '{model}'")))?;
        HullDistPair::new(
            self.ids.clone(),
            self.e_above_hull_true.clone(),
            predictions.clone(),
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        for (name, column) in &table.models {
            if column.len() != table.ids.len() {
                return Err(HullbenchError::index_mismatch(format!(
                    "model '{name}' column has {} values for {} ids",
                    column.len(),
                    table.ids.len()
                )));
            }
        }
        Ok(table)
    }
}

/// Scalar benchmark summary for every model at one stability threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// RFC 3339 timestamp of report generation.
    pub generated_at: String,
    pub stability_threshold: f64,
    /// Model name → aggregate metrics (NaN-bearing for degenerate models).
    pub model_metrics: BTreeMap<String, StabilityMetrics>,
}

impl BenchmarkReport {
    /// Evaluates every model column against the truth column.
    pub fn from_table(table: &PredictionTable, stability_threshold: f64) -> Result<Self> {
        let mut model_metrics = BTreeMap::new();
        for name in table.model_names() {
            let pair = table.pair_for(name)?;
            let masks = classify_stable(pair.truth(), pair.pred(), stability_threshold)?;
            let metrics = StabilityMetrics::from_masks(&masks);
            log::info!(
                "{name}: {} materials, precision {:.3}, recall {:.3}, F1 {:.3}",
                pair.len(),
                metrics.precision,
                metrics.recall,
                metrics.f1
            );
            model_metrics.insert(name.to_string(), metrics);
        }
        Ok(Self {
            generated_at: Utc::now().to_rfc3339(),
            stability_threshold,
            model_metrics,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
