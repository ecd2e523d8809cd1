use super::{ChemError, StructureEngine};
use crate::core::io::smiles;
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use tracing::trace;

/// Graph-only structure engine.
///
/// Works on connectivity, formal charges and hydrogen counts; it does no
/// kekulization, canonicalization or stereo perception. Aromatic atoms are
/// assumed to take part in one π bond unless they are lone-pair donors
/// (O, S, Se, or a neutral three-connected N or P).
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEngine;

impl BasicEngine {
    pub fn new() -> Self {
        Self
    }
}

impl StructureEngine for BasicEngine {
    fn parse(&self, text: &str) -> Result<Molecule, ChemError> {
        Ok(smiles::parse(text)?)
    }

    fn sanitize(&self, mut molecule: Molecule) -> Result<Molecule, ChemError> {
        if molecule.is_empty() {
            return Err(ChemError::Empty);
        }

        let ids = molecule.atom_ids();
        let index_of = |id: AtomId| ids.iter().position(|&other| other == id).unwrap_or(0);

        let ring_flags = molecule.ring_bond_flags();
        for (bond, &in_ring) in molecule.bonds().iter().zip(&ring_flags) {
            if bond.order == BondOrder::Aromatic && !in_ring {
                return Err(ChemError::NonRingAromaticBond(
                    index_of(bond.atom1_id),
                    index_of(bond.atom2_id),
                ));
            }
        }

        let mut assignments = Vec::with_capacity(ids.len());
        for (index, &id) in ids.iter().enumerate() {
            let Some(atom) = molecule.atom(id) else {
                continue;
            };

            if atom.aromatic {
                let aromatic_bonds = molecule
                    .bonds_of(id)
                    .filter(|(_, bond)| bond.order == BondOrder::Aromatic)
                    .count();
                if aromatic_bonds < 2 {
                    return Err(ChemError::NonRingAromaticAtom {
                        index,
                        element: atom.element,
                    });
                }
            }

            let allowed = atom.element.allowed_valences(atom.formal_charge).ok_or(
                ChemError::UnsupportedChargeState {
                    index,
                    element: atom.element,
                    charge: atom.formal_charge,
                },
            )?;

            let used = used_valence(&molecule, id, atom);
            let max_allowed = allowed.iter().copied().max().unwrap_or(0);

            if atom.bracket {
                if used > max_allowed {
                    return Err(ChemError::Valence {
                        index,
                        element: atom.element,
                        valence: used,
                    });
                }
                continue;
            }

            let target = allowed.iter().copied().filter(|&v| v >= used).min().ok_or(
                ChemError::Valence {
                    index,
                    element: atom.element,
                    valence: used,
                },
            )?;
            assignments.push((id, target - used));
        }

        for (id, hydrogens) in assignments {
            if let Some(atom) = molecule.atom_mut(id) {
                atom.hydrogen_count = hydrogens;
            }
        }
        Ok(molecule)
    }

    fn deprotonate(&self, mut molecule: Molecule) -> Result<Molecule, ChemError> {
        if molecule.is_empty() {
            return Err(ChemError::Empty);
        }

        let removable: Vec<(AtomId, AtomId)> = molecule
            .atoms_iter()
            .filter(|(_, atom)| atom.is_hydrogen() && atom.formal_charge == 0 && atom.isotope.is_none())
            .filter_map(|(id, _)| {
                let mut neighbors = molecule.neighbors(id);
                match (neighbors.next(), neighbors.next()) {
                    (Some(heavy), None) if molecule.atom(heavy).is_some_and(Atom::is_heavy) => {
                        Some((id, heavy))
                    }
                    _ => None,
                }
            })
            .collect();

        for &(_, heavy) in &removable {
            if let Some(atom) = molecule.atom_mut(heavy) {
                atom.hydrogen_count = atom.hydrogen_count.saturating_add(1);
            }
        }
        molecule.remove_atoms(removable.into_iter().map(|(hydrogen, _)| hydrogen));
        trace!(atoms = molecule.atom_count(), "Explicit hydrogens folded.");
        Ok(molecule)
    }

    fn neutralize(&self, mut molecule: Molecule) -> Result<Molecule, ChemError> {
        let ids = molecule.atom_ids();

        for &id in &ids {
            if let Some(atom) = molecule.atom_mut(id) {
                if atom.formal_charge > 0 && atom.hydrogen_count > 0 {
                    let removed = atom.hydrogen_count.min(atom.formal_charge.unsigned_abs());
                    atom.hydrogen_count -= removed;
                    atom.formal_charge -= removed as i8;
                }
            }
        }

        let remaining_positive: i32 = molecule
            .atoms_iter()
            .map(|(_, atom)| i32::from(atom.formal_charge.max(0)))
            .sum();
        let total_negative: i32 = molecule
            .atoms_iter()
            .map(|(_, atom)| i32::from(atom.formal_charge.min(0)).abs())
            .sum();

        let mut budget = total_negative - remaining_positive;
        for &id in &ids {
            if budget <= 0 {
                break;
            }
            if let Some(atom) = molecule.atom_mut(id) {
                if atom.formal_charge < 0 {
                    let added = i32::from(atom.formal_charge).abs().min(budget);
                    atom.formal_charge += added as i8;
                    atom.hydrogen_count = atom.hydrogen_count.saturating_add(added as u8);
                    budget -= added;
                }
            }
        }

        self.sanitize(molecule)
    }
}

/// Valence consumed by bonds, fixed hydrogens and, for aromatic atoms, the π bond.
fn used_valence(molecule: &Molecule, id: AtomId, atom: &Atom) -> u8 {
    let mut used = molecule.bond_valence(id);
    if atom.bracket {
        used = used.saturating_add(atom.hydrogen_count);
    }
    if atom.aromatic && !is_lone_pair_donor(atom, used) {
        used = used.saturating_add(1);
    }
    used
}

fn is_lone_pair_donor(atom: &Atom, used: u8) -> bool {
    match atom.element {
        Element::O | Element::S | Element::Se => atom.formal_charge == 0,
        Element::N | Element::P => atom.formal_charge == 0 && used == 3,
        _ => false,
    }
}
