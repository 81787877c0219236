//! hullbench-metrics — stability-classification metrics and discovery curves
//!
//! Converts paired (true, predicted) energy-above-hull series into the
//! statistics a materials-discovery benchmark reports:
//!
//! - confusion-bucket classification under a configurable stability
//!   threshold ([`classify`])
//! - scalar summaries: precision, recall, enrichment, F1 ([`summary`])
//! - rolling MAE vs. hull distance with standard-error bands ([`rolling`])
//! - cumulative precision/recall over predicted-stability rank
//!   ([`cumulative`]), with presentation-only spline smoothing ([`spline`])
//! - ROC / precision–recall threshold sweeps ([`curves`])
//! - classified hull-distance histograms ([`hist`])
//! - tidy prediction tables and per-model reports ([`report`])
//!
//! Degenerate conditions (zero denominators, empty windows) propagate NaN
//! so batch computations never abort; fatal errors are reserved for index
//! misalignment and data-completeness problems.

pub mod classify;
pub mod cumulative;
pub mod curves;
pub mod hist;
pub mod pair;
pub mod rolling;
pub mod spline;
pub mod summary;
pub mod report;

pub use classify::{classify_stable, ConfusionMasks};
pub use cumulative::{cumulative_precision_recall, optimal_recall_endpoint, CumulativeCurves};
pub use curves::{precision_recall_curve, roc_curve, PrCurve, RocCurve};
pub use hist::{hist_classified_stable_vs_hull_dist, ClassifiedHistogram, WhichEnergy};
pub use pair::HullDistPair;
pub use report::{BenchmarkReport, PredictionTable};
pub use rolling::{rolling_mae_vs_hull_dist, RollingMae, RollingWindow};
pub use summary::StabilityMetrics;
