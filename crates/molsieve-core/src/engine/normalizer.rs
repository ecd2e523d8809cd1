use crate::core::chem::{ChemError, StructureEngine};
use crate::core::models::molecule::Molecule;
use std::fmt;
use thiserror::Error;

/// The fixed stages of structure normalization, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationStage {
    Parse,
    Sanitize,
    Deprotonate,
    Resanitize,
    Neutralize,
}

impl fmt::Display for NormalizationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parse => "parse",
            Self::Sanitize => "sanitize",
            Self::Deprotonate => "deprotonate",
            Self::Resanitize => "re-sanitize",
            Self::Neutralize => "neutralize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Normalization failed at the {stage} stage: {source}")]
pub struct NormalizationError {
    pub stage: NormalizationStage,
    #[source]
    pub source: ChemError,
}

/// Runs the five normalization stages against a [`StructureEngine`].
///
/// The first failing stage ends the run; later stages are never attempted.
/// Deprotonation can leave invalid valences behind, which is why a second
/// sanitization follows it, and neutralization runs last so that every rule
/// sees a neutral species.
pub struct Normalizer<'e, E: StructureEngine + ?Sized> {
    engine: &'e E,
}

impl<'e, E: StructureEngine + ?Sized> Normalizer<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    pub fn normalize(&self, text: &str) -> Result<Molecule, NormalizationError> {
        let parsed = self
            .engine
            .parse(text)
            .map_err(at(NormalizationStage::Parse))?;
        self.renormalize(parsed)
    }

    /// Runs every stage after parsing on an existing molecule.
    pub fn renormalize(&self, molecule: Molecule) -> Result<Molecule, NormalizationError> {
        let sanitized = self
            .engine
            .sanitize(molecule)
            .map_err(at(NormalizationStage::Sanitize))?;
        let deprotonated = self
            .engine
            .deprotonate(sanitized)
            .map_err(at(NormalizationStage::Deprotonate))?;
        let resanitized = self
            .engine
            .sanitize(deprotonated)
            .map_err(at(NormalizationStage::Resanitize))?;
        self.engine
            .neutralize(resanitized)
            .map_err(at(NormalizationStage::Neutralize))
    }
}

fn at(stage: NormalizationStage) -> impl FnOnce(ChemError) -> NormalizationError {
    move |source| NormalizationError { stage, source }
}
