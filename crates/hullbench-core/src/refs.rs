//! Elemental reference entries: extraction from an entry pool and the
//! immutable lookup table used by formation-energy computation.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};

use crate::composition::Composition;
use crate::entry::Entry;
use crate::errors::{HullbenchError, Result};

/// Release date of the bundled Materials Project elemental reference set.
pub const DEFAULT_REFS_RELEASE: &str = "2022-09-19";

/// File name of the bundled reference set under a data directory.
pub fn default_refs_filename() -> String {
    format!("mp-elemental-reference-entries-{DEFAULT_REFS_RELEASE}.json")
}

/// On-disk record for one elemental reference: composition plus per-atom
/// energy. The table file is a JSON mapping from element symbol to this.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RefRecord {
    composition: Composition,
    energy_per_atom: f64,
}

/// Immutable mapping from element symbol to its lowest-energy elemental
/// entry.
///
/// Constructed once (from an entry pool via [`elemental_ref_entries`] or
/// from a JSON file) and passed explicitly to formation-energy calls.
/// Never mutated after construction, so shared read access is safe.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementalRefs {
    entries: BTreeMap<String, Entry>,
}

impl ElementalRefs {
    /// Builds a reference table from explicit per-element entries.
    ///
    /// Every entry must be a single-element composition whose element
    /// matches its key; anything else is a data inconsistency.
    pub fn new(entries: BTreeMap<String, Entry>) -> Result<Self> {
        for (symbol, entry) in &entries {
            match entry.composition.single_element() {
                Some(el) if el == symbol => {}
                _ => {
                    return Err(HullbenchError::parse(format!(
                        "reference entry for '{symbol}' has composition '{}', expected pure {symbol}",
                        entry.composition
                    )))
                }
            }
        }
        Ok(Self { entries })
    }

    /// Looks up the reference entry for one element.
    pub fn get(&self, element: &str) -> Result<&Entry> {
        self.entries
            .get(element)
            .ok_or_else(|| HullbenchError::missing_element(element))
    }

    /// Per-atom reference energy for one element (eV/atom).
    pub fn energy_per_atom(&self, element: &str) -> Result<f64> {
        Ok(self.get(element)?.energy_per_atom())
    }

    /// Element symbols covered by this table, in canonical order.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a reference table from a JSON file mapping element symbol to
    /// `{composition, energy_per_atom}` records.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let records: BTreeMap<String, RefRecord> = serde_json::from_reader(BufReader::new(file))?;
        let entries = records
            .into_iter()
            .map(|(symbol, rec)| {
                let energy = rec.energy_per_atom * rec.composition.num_atoms();
                (symbol, Entry::new(rec.composition, energy))
            })
            .collect();
        Self::new(entries)
    }

    /// Writes the table to a JSON file in the same record format.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let records: BTreeMap<&str, RefRecord> = self
            .entries
            .iter()
            .map(|(symbol, entry)| {
                (
                    symbol.as_str(),
                    RefRecord {
                        composition: entry.composition.clone(),
                        energy_per_atom: entry.energy_per_atom(),
                    },
                )
            })
            .collect();
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(BufWriter::new(file), &records)?;
        Ok(())
    }

    /// Loads the bundled default reference set from `data_dir`.
    ///
    /// Absence of the file is a recoverable condition: the error names the
    /// expected location and the caller is expected to supply a reference
    /// table explicitly instead.
    pub fn load_default(data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = data_dir.as_ref().join(default_refs_filename());
        if !path.exists() {
            return Err(HullbenchError::RefDataNotFound {
                path: path.display().to_string(),
            });
        }
        Self::from_json_file(path)
    }
}

/// Extracts the lowest-energy elemental entry for each element in `entries`.
///
/// Entries are grouped by reduced composition; within each group the
/// minimum-energy-per-atom entry is kept (ties broken by first encounter in
/// sort order, acceptable since duplicate minima carry identical energies);
/// only single-element groups become references.
///
/// The number of resulting references must equal the number of distinct
/// elements across all input compositions: fewer means some element has no
/// elemental entry ([`HullbenchError::MissingRefs`]); more should be
/// unreachable and signals upstream data corruption
/// ([`HullbenchError::SurplusRefs`]).
///
/// `verbose` enables informational progress reporting only; it never
/// affects the output.
pub fn elemental_ref_entries(entries: &[Entry], verbose: bool) -> Result<ElementalRefs> {
    let elements: BTreeSet<&str> = entries
        .iter()
        .flat_map(|entry| entry.composition.elements())
        .collect();
    let dim = elements.len();

    if verbose {
        log::info!(
            "sorting {} entries spanning {dim} elements",
            entries.len()
        );
    }

    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.composition.reduction_key().cmp(&b.composition.reduction_key()));

    let progress = if verbose {
        ProgressBar::new(sorted.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut refs: BTreeMap<String, Entry> = BTreeMap::new();
    let mut idx = 0;
    while idx < sorted.len() {
        let key = sorted[idx].composition.reduction_key();
        let mut min_entry = sorted[idx];
        let mut end = idx + 1;
        while end < sorted.len() && sorted[end].composition.reduction_key() == key {
            if sorted[end].energy_per_atom() < min_entry.energy_per_atom() {
                min_entry = sorted[end];
            }
            end += 1;
        }
        if let Some(symbol) = min_entry.composition.single_element() {
            refs.insert(symbol.to_string(), min_entry.clone());
        }
        progress.inc((end - idx) as u64);
        idx = end;
    }
    progress.finish_and_clear();

    if refs.len() < dim {
        let missing: Vec<&str> = elements
            .iter()
            .copied()
            .filter(|el| !refs.contains_key(*el))
            .collect();
        return Err(HullbenchError::missing_refs(missing));
    }
    if refs.len() > dim {
        let extra: Vec<String> = refs
            .keys()
            .filter(|el| !elements.contains(el.as_str()))
            .cloned()
            .collect();
        return Err(HullbenchError::surplus_refs(extra));
    }

    ElementalRefs::new(refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(formula: &str, energy: f64) -> Entry {
        Entry::new(formula.parse().unwrap(), energy)
    }

    #[test]
    fn test_extracts_lowest_energy_elemental_entries() {
        // Fe at 0 eV, Fe2O3 at -8 eV, O2 at -2 eV: expect Fe and O refs,
        // the O ref being the O2 entry at -1 eV/atom.
        let entries = vec![entry("Fe", 0.0), entry("Fe2O3", -8.0), entry("O2", -2.0)];
        let refs = elemental_ref_entries(&entries, false).unwrap();

        assert_eq!(refs.len(), 2);
        assert_eq!(refs.get("Fe").unwrap().energy, 0.0);
        assert!((refs.energy_per_atom("O").unwrap() - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_groups_by_reduced_composition() {
        // O2 and O4 are the same reduced composition; the lower
        // energy-per-atom entry wins.
        let entries = vec![entry("O2", -2.0), entry("O4", -4.8), entry("O", -0.3)];
        let refs = elemental_ref_entries(&entries, false).unwrap();
        assert!((refs.energy_per_atom("O").unwrap() - (-1.2)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        // No elemental Mg entry anywhere in the pool.
        let entries = vec![entry("MgO", -5.0), entry("O2", -2.0)];
        let err = elemental_ref_entries(&entries, false).unwrap_err();
        match err {
            HullbenchError::MissingRefs { elements } => {
                assert_eq!(elements, vec!["Mg".to_string()]);
            }
            other => panic!("expected MissingRefs, got {other:?}"),
        }
    }

    #[test]
    fn test_surplus_branch_is_defensive_only() {
        // The grouping algorithm cannot produce more single-element groups
        // than distinct elements, so the surplus variant is only
        // constructible directly.
        let err = HullbenchError::surplus_refs(["Zz"]);
        assert!(matches!(err, HullbenchError::SurplusRefs { .. }));
    }

    #[test]
    fn test_refs_rejects_mismatched_key() {
        let mut map = BTreeMap::new();
        map.insert("Fe".to_string(), entry("O2", -2.0));
        assert!(ElementalRefs::new(map).is_err());
    }

    #[test]
    fn test_missing_element_lookup() {
        let entries = vec![entry("Fe", 0.0)];
        let refs = elemental_ref_entries(&entries, false).unwrap();
        assert!(matches!(
            refs.get("O"),
            Err(HullbenchError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let entries = vec![entry("Fe", -1.5), entry("O2", -2.0)];
        let refs = elemental_ref_entries(&entries, false).unwrap();

        let dir = std::env::temp_dir().join("hullbench-refs-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(default_refs_filename());
        refs.write_json_file(&path).unwrap();

        let loaded = ElementalRefs::load_default(&dir).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(
            (loaded.energy_per_atom("O").unwrap() - refs.energy_per_atom("O").unwrap()).abs()
                < 1e-12
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_default_names_expected_path() {
        let dir = std::env::temp_dir().join("hullbench-refs-absent");
        let err = ElementalRefs::load_default(&dir).unwrap_err();
        match err {
            HullbenchError::RefDataNotFound { path } => {
                assert!(path.contains(DEFAULT_REFS_RELEASE));
            }
            other => panic!("expected RefDataNotFound, got {other:?}"),
        }
    }
}
