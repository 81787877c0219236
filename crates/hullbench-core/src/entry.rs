//! Energy entries: a composition paired with a total energy.

use serde::{Deserialize, Serialize};

use crate::composition::Composition;

/// An energy record for one composition.
///
/// `energy` is the total energy of the formula unit (eV); per-atom
/// quantities derive from the composition's atom count. The optional
/// `structure` payload carries a relaxed atomic structure as opaque JSON
/// for callers that need it; the analytical core never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub composition: Composition,
    pub energy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<serde_json::Value>,
}

impl Entry {
    pub fn new(composition: Composition, energy: f64) -> Self {
        Self {
            composition,
            energy,
            structure: None,
        }
    }

    /// Total energy divided by atom count (eV/atom).
    pub fn energy_per_atom(&self) -> f64 {
        self.energy / self.composition.num_atoms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_per_atom() {
        let entry = Entry::new("O2".parse().unwrap(), -2.0);
        assert!((entry.energy_per_atom() - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_serde_round_trip() {
        let entry = Entry::new("Fe2O3".parse().unwrap(), -8.0);
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
        // structure payload is omitted when absent
        assert!(!json.contains("structure"));
    }
}
