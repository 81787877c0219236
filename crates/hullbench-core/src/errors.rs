//! Error types for hullbench.
//!
//! Data-completeness, lookup and shape errors are fatal and propagate
//! immediately. Degenerate metric conditions (zero denominators, empty
//! windows) are NOT errors; they propagate as IEEE NaN so batch curve
//! computations never abort on a single bin.

use thiserror::Error;

/// Unified error type for all hullbench operations.
#[derive(Error, Debug)]
pub enum HullbenchError {
    /// Elements present in the composition space with no elemental
    /// reference entry. Always fatal: unnoticed missing references would
    /// silently corrupt every downstream formation energy.
    #[error("missing elemental reference entries for {elements:?}")]
    MissingRefs { elements: Vec<String> },

    /// More single-element groups than distinct elements. Signals a data
    /// inconsistency upstream; unreachable through `elemental_ref_entries`.
    #[error("surplus elemental reference entries beyond composition space: {elements:?}")]
    SurplusRefs { elements: Vec<String> },

    /// An element in a queried composition is absent from the reference table.
    #[error("element '{element}' not found in elemental reference table")]
    MissingElement { element: String },

    /// The bundled default reference file is absent.
    #[error("elemental reference data not found at '{path}', pass elemental references explicitly")]
    RefDataNotFound { path: String },

    /// Two series that must share an index domain do not.
    #[error("series index mismatch: {0}")]
    IndexMismatch(String),

    /// Chemical formula could not be parsed.
    #[error("formula parse error: {0}")]
    Parse(String),

    /// I/O errors (reference file reading/writing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HullbenchError {
    /// Creates a missing-references error from any element collection.
    pub fn missing_refs<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        elements.sort();
        HullbenchError::MissingRefs { elements }
    }

    /// Creates a surplus-references error from any element collection.
    pub fn surplus_refs<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        elements.sort();
        HullbenchError::SurplusRefs { elements }
    }

    /// Creates a missing-element lookup error.
    pub fn missing_element(element: impl Into<String>) -> Self {
        HullbenchError::MissingElement {
            element: element.into(),
        }
    }

    /// Creates an index-mismatch error.
    pub fn index_mismatch(detail: impl Into<String>) -> Self {
        HullbenchError::IndexMismatch(detail.into())
    }

    /// Creates a formula parse error.
    pub fn parse(detail: impl Into<String>) -> Self {
        HullbenchError::Parse(detail.into())
    }
}

/// Result type alias for hullbench operations.
pub type Result<T> = std::result::Result<T, HullbenchError>;
