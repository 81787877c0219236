//! hullbench-core — formation energies and elemental references
//!
//! Analytical core of a materials-stability benchmark: derives per-atom
//! formation energies for candidate crystal structures relative to
//! elemental reference entries, and builds the reference table itself from
//! a pool of computed entries.
//!
//! ## Design
//!
//! - The reference table is an explicit, immutable value
//!   ([`refs::ElementalRefs`]) passed to every formation-energy call; there
//!   is no process-wide default that loads behind the caller's back.
//! - Data-completeness problems (missing elemental references) are hard
//!   errors that name the offending elements; they are never patched over,
//!   since a silently incomplete table corrupts every downstream number.
//! - All computation is pure and synchronous over in-memory data; the only
//!   I/O is loading/writing the reference JSON file.

pub mod composition;
pub mod energy;
pub mod entry;
pub mod errors;
pub mod refs;

pub use composition::Composition;
pub use energy::{e_form_per_atom, EnergyInput};
pub use entry::Entry;
pub use errors::{HullbenchError, Result};
pub use refs::{elemental_ref_entries, ElementalRefs};
