//! Built-in filter rules.

use super::rule::Rule;
use crate::core::chem::descriptors;
use crate::core::models::element::Element;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

/// Mozziconacci et al. counts: rotatable bonds, rings, oxygens, nitrogens
/// and halogens.
#[derive(Debug, Clone, Copy, Default)]
pub struct MozziconacciFilter;

impl MozziconacciFilter {
    pub const NAME: &'static str = "MozziconacciFilter";
    const MAX_ROTATABLE_BONDS: usize = 15;
    const MAX_RINGS: usize = 6;
    const MIN_OXYGENS: usize = 1;
    const MIN_NITROGENS: usize = 1;
    const MAX_HALOGENS: usize = 7;
}

impl Rule for MozziconacciFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, molecule: Molecule) -> bool {
        descriptors::rotatable_bonds(&molecule) <= Self::MAX_ROTATABLE_BONDS
            && descriptors::ring_count(&molecule) <= Self::MAX_RINGS
            && molecule.count_element(Element::O) >= Self::MIN_OXYGENS
            && molecule.count_element(Element::N) >= Self::MIN_NITROGENS
            && descriptors::halogen_count(&molecule) <= Self::MAX_HALOGENS
    }
}

/// The count-based terms of Lipinski's rule of five.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleOfFiveCountsFilter;

impl RuleOfFiveCountsFilter {
    pub const NAME: &'static str = "RuleOfFiveCountsFilter";
    const MAX_MOLECULAR_WEIGHT: f64 = 500.0;
    const MAX_DONORS: usize = 5;
    const MAX_ACCEPTORS: usize = 10;
}

impl Rule for RuleOfFiveCountsFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, molecule: Molecule) -> bool {
        descriptors::molecular_weight(&molecule) <= Self::MAX_MOLECULAR_WEIGHT
            && descriptors::hbond_donors(&molecule) <= Self::MAX_DONORS
            && descriptors::hbond_acceptors(&molecule) <= Self::MAX_ACCEPTORS
    }
}

/// Filter families from the wider screening toolchain that this catalogue
/// does not implement, each paired with the built-in rule checking the nearest
/// subset of its criteria.
///
/// The family names are not registered, so requesting one is an unknown name.
/// The lipophilicity, polar-surface and SMARTS-catalogue terms these families
/// rely on have no counterpart in the graph-only descriptors.
pub const RELATED_FAMILIES: &[(&str, &str)] = &[
    ("LipinskiStrictFilter", RuleOfFiveCountsFilter::NAME),
    ("LipinskiLenientFilter", RuleOfFiveCountsFilter::NAME),
    ("GhoseFilter", RuleOfFiveCountsFilter::NAME),
    ("GhoseModifiedFilter", RuleOfFiveCountsFilter::NAME),
    ("VandeWaterbeemdFilter", RuleOfFiveCountsFilter::NAME),
    ("PAINSFilter", ReactiveGroupFilter::NAME),
    ("NIHFilter", ReactiveGroupFilter::NAME),
    ("BRENKFilter", ReactiveGroupFilter::NAME),
];

/// The built-in rule closest to an unimplemented filter family, if `name` is one.
pub fn closest_builtin(name: &str) -> Option<&'static str> {
    RELATED_FAMILIES
        .iter()
        .find(|(family, _)| *family == name)
        .map(|&(_, builtin)| builtin)
}

/// Denylist of reactive functional groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactiveGroupFilter;

impl ReactiveGroupFilter {
    pub const NAME: &'static str = "ReactiveGroupFilter";
}

impl Rule for ReactiveGroupFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, molecule: Molecule) -> bool {
        !(has_peroxide(&molecule)
            || has_disulfide(&molecule)
            || has_acyl_halide(&molecule)
            || has_aldehyde(&molecule)
            || has_isocyanate(&molecule))
    }
}

fn element_of(molecule: &Molecule, id: AtomId) -> Option<Element> {
    molecule.atom(id).map(|a| a.element)
}

fn has_single_bond_between(molecule: &Molecule, a: Element, b: Element) -> bool {
    molecule.bonds().iter().any(|bond| {
        bond.order == BondOrder::Single
            && element_of(molecule, bond.atom1_id) == Some(a)
            && element_of(molecule, bond.atom2_id) == Some(b)
    })
}

fn has_peroxide(molecule: &Molecule) -> bool {
    has_single_bond_between(molecule, Element::O, Element::O)
}

fn has_disulfide(molecule: &Molecule) -> bool {
    has_single_bond_between(molecule, Element::S, Element::S)
}

/// Carbons double-bonded to a non-aromatic oxygen.
fn carbonyl_carbons(molecule: &Molecule) -> impl Iterator<Item = AtomId> + '_ {
    molecule
        .atoms_iter()
        .filter(|(_, atom)| atom.element == Element::C && !atom.aromatic)
        .filter(move |&(id, _)| {
            molecule.bonds_of(id).any(|(partner, bond)| {
                bond.order == BondOrder::Double && element_of(molecule, partner) == Some(Element::O)
            })
        })
        .map(|(id, _)| id)
}

fn has_acyl_halide(molecule: &Molecule) -> bool {
    carbonyl_carbons(molecule).any(|carbon| {
        molecule.bonds_of(carbon).any(|(partner, bond)| {
            bond.order == BondOrder::Single
                && element_of(molecule, partner).is_some_and(Element::is_halogen)
        })
    })
}

fn has_aldehyde(molecule: &Molecule) -> bool {
    carbonyl_carbons(molecule).any(|carbon| {
        molecule.total_hydrogens(carbon) > 0
            && molecule
                .bonds_of(carbon)
                .filter(|(_, bond)| bond.order == BondOrder::Single)
                .all(|(partner, _)| {
                    matches!(element_of(molecule, partner), Some(Element::C | Element::H))
                })
    })
}

fn has_isocyanate(molecule: &Molecule) -> bool {
    carbonyl_carbons(molecule).any(|carbon| {
        molecule.bonds_of(carbon).any(|(partner, bond)| {
            bond.order == BondOrder::Double && element_of(molecule, partner) == Some(Element::N)
        })
    })
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
    fn mozziconacci_requires_nitrogen_and_oxygen() {
        let rule = MozziconacciFilter;
        assert!(!rule.evaluate(mol("c1ccccc1")));
        assert!(!rule.evaluate(mol("CCO")));
        assert!(rule.evaluate(mol("NCC(=O)O")));
    }

    #[test]
    fn mozziconacci_limits_flexibility() {
        let long_chain = format!("N{}O", "C".repeat(20));
        assert!(!MozziconacciFilter.evaluate(mol(&long_chain)));
        let short_chain = format!("N{}O", "C".repeat(5));
        assert!(MozziconacciFilter.evaluate(mol(&short_chain)));
    }

    #[test]
    fn mozziconacci_limits_halogens() {
        assert!(!MozziconacciFilter.evaluate(mol("NC(F)(F)C(F)(F)C(F)(F)C(F)(F)O")));
    }

    #[test]
    fn rule_of_five_counts() {
        assert!(RuleOfFiveCountsFilter.evaluate(mol("CC(=O)Oc1ccccc1C(=O)O")));
        let many_donors = "OCC(O)C(O)C(O)C(O)C(O)CO";
        assert!(!RuleOfFiveCountsFilter.evaluate(mol(many_donors)));
        let heavy = "C".repeat(40);
        assert!(!RuleOfFiveCountsFilter.evaluate(mol(&heavy)));
    }

    #[test]
    fn reactive_groups_are_detected() {
        for text in ["COOC", "CSSC", "CC(=O)Cl", "CC=O", "CN=C=O"] {
            assert!(!ReactiveGroupFilter.evaluate(mol(text)), "{text}");
        }
    }

    #[test]
    fn benign_carbonyls_pass_reactive_group_filter() {
        for text in ["CC(=O)O", "CC(=O)N", "CC(=O)C", "OC=O", "c1ccccc1"] {
            assert!(ReactiveGroupFilter.evaluate(mol(text)), "{text}");
        }
    }

    #[test]
    fn related_families_point_at_registered_rules() {
        let registry = crate::core::filters::registry::FilterRegistry::with_defaults();
        for &(family, builtin) in RELATED_FAMILIES {
            assert!(!registry.contains(family), "{family}");
            assert!(registry.contains(builtin), "{builtin}");
        }
        assert_eq!(closest_builtin("PAINSFilter"), Some(ReactiveGroupFilter::NAME));
        assert_eq!(closest_builtin(MozziconacciFilter::NAME), None);
    }
}
