//! Descriptors computed directly from the molecular graph.
//!
//! All functions expect a sanitized molecule, so that implicit hydrogen counts
//! are populated.

use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

/// Average molecular weight in g/mol, implicit hydrogens included.
pub fn molecular_weight(molecule: &Molecule) -> f64 {
    let hydrogen = Element::H.average_mass();
    molecule
        .atoms_iter()
        .map(|(_, atom)| atom.element.average_mass() + f64::from(atom.hydrogen_count) * hydrogen)
        .sum()
}

pub fn heavy_atom_count(molecule: &Molecule) -> usize {
    molecule.atoms_iter().filter(|(_, a)| a.is_heavy()).count()
}

/// Lipinski donor count: hydrogens attached to nitrogen or oxygen.
pub fn hbond_donors(molecule: &Molecule) -> usize {
    molecule
        .atoms_iter()
        .filter(|(_, a)| matches!(a.element, Element::N | Element::O))
        .map(|(id, _)| molecule.total_hydrogens(id))
        .sum()
}

/// Lipinski acceptor count: nitrogen plus oxygen atoms.
pub fn hbond_acceptors(molecule: &Molecule) -> usize {
    molecule.count_element(Element::N) + molecule.count_element(Element::O)
}

/// Number of independent rings (cyclomatic number of the graph).
pub fn ring_count(molecule: &Molecule) -> usize {
    (molecule.bonds().len() + molecule.fragment_count()).saturating_sub(molecule.atom_count())
}

/// Single, acyclic bonds between two non-terminal heavy atoms, excluding
/// bonds next to a triple bond.
pub fn rotatable_bonds(molecule: &Molecule) -> usize {
    let ring_flags = molecule.ring_bond_flags();
    let rotatable_end = |id| {
        molecule.atom(id).is_some_and(|a| a.is_heavy())
            && molecule.heavy_degree(id) > 1
            && !molecule
                .bonds_of(id)
                .any(|(_, bond)| bond.order == BondOrder::Triple)
    };

    molecule
        .bonds()
        .iter()
        .zip(ring_flags)
        .filter(|(bond, in_ring)| {
            bond.order == BondOrder::Single
                && !in_ring
                && rotatable_end(bond.atom1_id)
                && rotatable_end(bond.atom2_id)
        })
        .count()
}

pub fn halogen_count(molecule: &Molecule) -> usize {
    molecule
        .atoms_iter()
        .filter(|(_, a)| a.element.is_halogen())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chem::StructureEngine;
    use crate::core::chem::basic::BasicEngine;

    fn mol(text: &str) -> Molecule {
        let engine = BasicEngine::new();
        engine.sanitize(engine.parse(text).unwrap()).unwrap()
    }

    #[test]
    fn molecular_weight_of_ethanol() {
        let weight = molecular_weight(&mol("CCO"));
        assert!((weight - 46.069).abs() < 0.01, "got {weight}");
    }

    #[test]
    fn donors_and_acceptors_of_glycine() {
        let glycine = mol("NCC(=O)O");
        assert_eq!(hbond_donors(&glycine), 3);
        assert_eq!(hbond_acceptors(&glycine), 3);
        assert_eq!(heavy_atom_count(&glycine), 5);
    }

    #[test]
    fn ring_count_handles_fused_and_disconnected_systems() {
        assert_eq!(ring_count(&mol("CCO")), 0);
        assert_eq!(ring_count(&mol("c1ccccc1")), 1);
        assert_eq!(ring_count(&mol("c1ccc2ccccc2c1")), 2);
        assert_eq!(ring_count(&mol("C1CC1.C1CC1")), 2);
    }

    #[test]
    fn rotatable_bonds_skip_terminal_ring_and_alkyne_bonds() {
        assert_eq!(rotatable_bonds(&mol("CCCC")), 1);
        assert_eq!(rotatable_bonds(&mol("c1ccccc1CC")), 1);
        assert_eq!(rotatable_bonds(&mol("CC#CC")), 0);
        assert_eq!(rotatable_bonds(&mol("C1CCCCC1")), 0);
    }

    #[test]
    fn halogens_are_counted() {
        assert_eq!(halogen_count(&mol("FC(Cl)(Br)I")), 4);
    }
}
