//! Structure normalization service.
//!
//! [`StructureEngine`] is the contract the normalizer drives: four separable
//! calls, each consuming a molecule value and returning a new one or a typed
//! [`ChemError`]. [`basic::BasicEngine`] is the bundled implementation.

pub mod basic;
pub mod descriptors;

use crate::core::io::smiles::SmilesError;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChemError {
    #[error("Invalid structure notation: {0}")]
    Parse(#[from] SmilesError),

    #[error("Structure contains no atoms")]
    Empty,

    #[error("Atom {index} ({element}) has valence {valence}, which is not allowed")]
    Valence {
        index: usize,
        element: Element,
        valence: u8,
    },

    #[error("Atom {index} ({element}) with formal charge {charge} has no known valence state")]
    UnsupportedChargeState {
        index: usize,
        element: Element,
        charge: i8,
    },

    #[error("Aromatic atom {index} ({element}) is not part of an aromatic ring")]
    NonRingAromaticAtom { index: usize, element: Element },

    #[error("Aromatic bond between atoms {0} and {1} is not in a ring")]
    NonRingAromaticBond(usize, usize),
}

/// Chemistry operations required by the normalization pipeline.
///
/// Implementations must be shareable across worker threads; they hold no
/// per-record state.
pub trait StructureEngine: Send + Sync {
    /// Parses structure notation into an unsanitized molecule.
    fn parse(&self, text: &str) -> Result<Molecule, ChemError>;

    /// Validates valence and aromaticity, assigning implicit hydrogens.
    ///
    /// Sanitizing an already sanitized molecule must return an equal molecule.
    fn sanitize(&self, molecule: Molecule) -> Result<Molecule, ChemError>;

    /// Normalizes the protonation state by dropping removable explicit hydrogens.
    fn deprotonate(&self, molecule: Molecule) -> Result<Molecule, ChemError>;

    /// Removes net formal charge where it can be done by adding or removing hydrogens.
    fn neutralize(&self, molecule: Molecule) -> Result<Molecule, ChemError>;
}
