//! Formation-energy computation relative to elemental references.

use crate::composition::Composition;
use crate::entry::Entry;
use crate::errors::Result;
use crate::refs::ElementalRefs;

/// Input to formation-energy computation.
///
/// Both constructors normalize to the same {energy, composition} shape, so
/// downstream code never branches on where the values came from.
#[derive(Debug, Clone, PartialEq)]
pub enum EnergyInput {
    /// Raw total energy (eV) and composition.
    Raw { energy: f64, composition: Composition },
    /// A full domain entry.
    Entry(Entry),
}

impl EnergyInput {
    pub fn from_raw(energy: f64, composition: Composition) -> Self {
        EnergyInput::Raw {
            energy,
            composition,
        }
    }

    pub fn from_entry(entry: &Entry) -> Self {
        EnergyInput::Entry(entry.clone())
    }

    pub fn energy(&self) -> f64 {
        match self {
            EnergyInput::Raw { energy, .. } => *energy,
            EnergyInput::Entry(entry) => entry.energy,
        }
    }

    pub fn composition(&self) -> &Composition {
        match self {
            EnergyInput::Raw { composition, .. } => composition,
            EnergyInput::Entry(entry) => &entry.composition,
        }
    }
}

impl From<Entry> for EnergyInput {
    fn from(entry: Entry) -> Self {
        EnergyInput::Entry(entry)
    }
}

/// Formation energy per atom (eV/atom) of `input` relative to `refs`.
///
/// e_form = (E_total − Σ_el n_el · E_ref(el)) / N_atoms
///
/// Fails if any element of the composition is absent from the reference
/// table. Pure function of its arguments.
pub fn e_form_per_atom(input: &EnergyInput, refs: &ElementalRefs) -> Result<f64> {
    let composition = input.composition();
    let mut reference_sum = 0.0;
    for (element, count) in composition.iter() {
        reference_sum += count * refs.energy_per_atom(element)?;
    }
    Ok((input.energy() - reference_sum) / composition.num_atoms())
}
