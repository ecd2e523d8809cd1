//! Parser for a pragmatic subset of SMILES line notation.
//!
//! The parser only builds the molecular graph; it performs no chemistry
//! checks. Valence validation and implicit hydrogen assignment happen later,
//! during sanitization.

use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("Structure notation is empty")]
    Empty,
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Unknown element '{symbol}' at position {pos}")]
    UnknownElement { symbol: String, pos: usize },
    #[error("Bracket atom opened at position {0} is never closed")]
    UnclosedBracket(usize),
    #[error("Unbalanced parentheses at position {0}")]
    UnbalancedParentheses(usize),
    #[error("Bond at position {0} is not followed by an atom")]
    DanglingBond(usize),
    #[error("Ring closure {0} is never closed")]
    UnclosedRing(u16),
    #[error("Ring closure {label} at position {pos} would bond an atom to itself or duplicate a bond")]
    InvalidRingClosure { label: u16, pos: usize },
    #[error("Ring closure {0} has conflicting bond orders")]
    ConflictingRingBond(u16),
}

/// Parses `text` into an unsanitized molecule.
pub fn parse(text: &str) -> Result<Molecule, SmilesError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::Empty);
    }
    Parser::new(trimmed).run()
}

struct RingOpening {
    atom: AtomId,
    order: Option<BondOrder>,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    molecule: Molecule,
    previous: Option<AtomId>,
    branches: Vec<Option<AtomId>>,
    pending_bond: Option<(BondOrder, usize)>,
    rings: HashMap<u16, RingOpening>,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            molecule: Molecule::new(),
            previous: None,
            branches: Vec::new(),
            pending_bond: None,
            rings: HashMap::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn unexpected(&self) -> SmilesError {
        SmilesError::UnexpectedChar {
            ch: self.peek().unwrap_or(' '),
            pos: self.pos,
        }
    }

    fn run(mut self) -> Result<Molecule, SmilesError> {
        while let Some(c) = self.peek() {
            match c {
                '(' => {
                    if self.previous.is_none() || self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    self.branches.push(self.previous);
                    self.pos += 1;
                }
                ')' => {
                    if let Some((_, bond_pos)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond(bond_pos));
                    }
                    let Some(anchor) = self.branches.pop() else {
                        return Err(SmilesError::UnbalancedParentheses(self.pos));
                    };
                    self.previous = anchor;
                    self.pos += 1;
                }
                '-' | '=' | '#' | ':' | '/' | '\\' => {
                    if self.previous.is_none() || self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    self.pending_bond = Some((bond_order_for(c), self.pos));
                    self.pos += 1;
                }
                '.' => {
                    if let Some((_, bond_pos)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond(bond_pos));
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                '0'..='9' | '%' => self.ring_closure()?,
                '[' => {
                    let atom = self.bracket_atom()?;
                    self.attach(atom);
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.attach(atom);
                }
            }
        }

        if let Some((_, bond_pos)) = self.pending_bond {
            return Err(SmilesError::DanglingBond(bond_pos));
        }
        if !self.branches.is_empty() {
            return Err(SmilesError::UnbalancedParentheses(self.pos));
        }
        if let Some(&label) = self.rings.keys().min() {
            return Err(SmilesError::UnclosedRing(label));
        }
        if self.molecule.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok(self.molecule)
    }

    fn attach(&mut self, atom: Atom) {
        let id = self.molecule.add_atom(atom);
        if let Some(previous) = self.previous {
            let order = match self.pending_bond.take() {
                Some((order, _)) => order,
                None => self.implicit_order(previous, id),
            };
            // Both atoms exist and differ, so the bond is always created.
            let _ = self.molecule.add_bond(previous, id, order);
        }
        self.previous = Some(id);
    }

    fn implicit_order(&self, a: AtomId, b: AtomId) -> BondOrder {
        let aromatic = |id| self.molecule.atom(id).is_some_and(|atom: &Atom| atom.aromatic);
        if aromatic(a) && aromatic(b) {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn ring_closure(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let Some(current) = self.previous else {
            return Err(self.unexpected());
        };

        let label = if self.peek() == Some('%') {
            let digits: Option<u16> = match (self.peek_at(1), self.peek_at(2)) {
                (Some(a), Some(b)) => a
                    .to_digit(10)
                    .zip(b.to_digit(10))
                    .map(|(a, b)| (a * 10 + b) as u16),
                _ => None,
            };
            let Some(label) = digits else {
                return Err(self.unexpected());
            };
            self.pos += 3;
            label
        } else {
            let label = self.peek().and_then(|c| c.to_digit(10)).unwrap_or(0) as u16;
            self.pos += 1;
            label
        };

        let order = self.pending_bond.take().map(|(order, _)| order);
        match self.rings.remove(&label) {
            None => {
                self.rings.insert(
                    label,
                    RingOpening {
                        atom: current,
                        order,
                    },
                );
            }
            Some(opening) => {
                if opening.atom == current
                    || self.molecule.bond_between(opening.atom, current).is_some()
                {
                    return Err(SmilesError::InvalidRingClosure { label, pos: start });
                }
                let order = match (opening.order, order) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::ConflictingRingBond(label));
                    }
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => self.implicit_order(opening.atom, current),
                };
                let _ = self.molecule.add_bond(opening.atom, current, order);
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom, SmilesError> {
        let c = self.peek().ok_or(SmilesError::Empty)?;
        let two_letter = match (c, self.peek_at(1)) {
            ('C', Some('l')) => Some(Element::Cl),
            ('B', Some('r')) => Some(Element::Br),
            _ => None,
        };
        if let Some(element) = two_letter {
            self.pos += 2;
            return Ok(Atom::new(element));
        }

        let atom = match c {
            'B' => Atom::new(Element::B),
            'C' => Atom::new(Element::C),
            'N' => Atom::new(Element::N),
            'O' => Atom::new(Element::O),
            'P' => Atom::new(Element::P),
            'S' => Atom::new(Element::S),
            'F' => Atom::new(Element::F),
            'I' => Atom::new(Element::I),
            'b' => Atom::new(Element::B).with_aromatic(true),
            'c' => Atom::new(Element::C).with_aromatic(true),
            'n' => Atom::new(Element::N).with_aromatic(true),
            'o' => Atom::new(Element::O).with_aromatic(true),
            'p' => Atom::new(Element::P).with_aromatic(true),
            's' => Atom::new(Element::S).with_aromatic(true),
            _ => return Err(self.unexpected()),
        };
        self.pos += 1;
        Ok(atom)
    }

    fn bracket_atom(&mut self) -> Result<Atom, SmilesError> {
        let open = self.pos;
        self.pos += 1;

        let isotope = self.read_number();

        let symbol_pos = self.pos;
        let (element, aromatic) = self.bracket_symbol().map_err(|e| match e {
            SmilesError::UnexpectedChar { .. } if self.peek().is_none() => {
                SmilesError::UnclosedBracket(open)
            }
            other => other,
        })?;
        if self.pos == symbol_pos {
            return Err(self.unexpected());
        }

        while self.peek() == Some('@') {
            self.pos += 1;
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some('H') {
            self.pos += 1;
            hydrogens = self.read_number().map_or(1, |n| n.min(u8::MAX as u32) as u8);
        }

        let charge = self.read_charge();

        if self.peek() == Some(':') {
            self.pos += 1;
            let _atom_class = self.read_number();
        }

        match self.peek() {
            Some(']') => self.pos += 1,
            Some(_) => return Err(self.unexpected()),
            None => return Err(SmilesError::UnclosedBracket(open)),
        }

        let mut atom = Atom::bracket(element, hydrogens, charge).with_aromatic(aromatic);
        atom.isotope = isotope.and_then(|n| u16::try_from(n).ok());
        Ok(atom)
    }

    fn bracket_symbol(&mut self) -> Result<(Element, bool), SmilesError> {
        let Some(first) = self.peek() else {
            return Err(self.unexpected());
        };
        let start = self.pos;

        if first.is_ascii_lowercase() {
            let second = self.peek_at(1);
            let (symbol, len) = match (first, second) {
                ('s', Some('e')) => ("Se", 2),
                ('a', Some('s')) => ("As", 2),
                ('b', _) => ("B", 1),
                ('c', _) => ("C", 1),
                ('n', _) => ("N", 1),
                ('o', _) => ("O", 1),
                ('p', _) => ("P", 1),
                ('s', _) => ("S", 1),
                _ => return Err(self.unexpected()),
            };
            self.pos += len;
            let element = symbol.parse().map_err(|_| SmilesError::UnknownElement {
                symbol: symbol.to_string(),
                pos: start,
            })?;
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(self.unexpected());
        }

        let symbol = match self.peek_at(1) {
            Some(second) if second.is_ascii_lowercase() => {
                self.pos += 2;
                format!("{first}{second}")
            }
            _ => {
                self.pos += 1;
                first.to_string()
            }
        };
        let element = symbol
            .parse()
            .map_err(|_| SmilesError::UnknownElement { symbol, pos: start })?;
        Ok((element, false))
    }

    fn read_number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            self.pos += 1;
        }
        value
    }

    fn read_charge(&mut self) -> i8 {
        let sign = match self.peek() {
            Some('+') => 1i8,
            Some('-') => -1i8,
            _ => return 0,
        };
        self.pos += 1;

        if let Some(magnitude) = self.read_number() {
            return sign.saturating_mul(magnitude.min(i8::MAX as u32) as i8);
        }

        let symbol = if sign > 0 { '+' } else { '-' };
        let mut magnitude = 1i8;
        while self.peek() == Some(symbol) {
            magnitude = magnitude.saturating_add(1);
            self.pos += 1;
        }
        sign * magnitude
    }
}

fn bond_order_for(symbol: char) -> BondOrder {
    match symbol {
        '=' => BondOrder::Double,
        '#' => BondOrder::Triple,
        ':' => BondOrder::Aromatic,
        _ => BondOrder::Single,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(mol: &Molecule) -> Vec<Element> {
        mol.atoms_iter().map(|(_, a)| a.element).collect()
    }

    #[test]
    fn parses_linear_chain_with_default_single_bonds() {
        let mol = parse("CCO").unwrap();
        assert_eq!(elements(&mol), vec![Element::C, Element::C, Element::O]);
        assert_eq!(mol.bonds().len(), 2);
        assert!(mol.bonds().iter().all(|b| b.order == BondOrder::Single));
    }

    #[test]
    fn parses_explicit_bond_orders() {
        let mol = parse("C=CC#N").unwrap();
        let orders: Vec<_> = mol.bonds().iter().map(|b| b.order).collect();
        assert_eq!(
            orders,
            vec![BondOrder::Double, BondOrder::Single, BondOrder::Triple]
        );
    }

    #[test]
    fn parses_two_letter_organic_atoms() {
        let mol = parse("ClCBr").unwrap();
        assert_eq!(elements(&mol), vec![Element::Cl, Element::C, Element::Br]);
    }

    #[test]
    fn parses_branches() {
        let mol = parse("CC(C)(C)O").unwrap();
        let ids = mol.atom_ids();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.degree(ids[1]), 4);
    }

    #[test]
    fn aromatic_ring_closure_uses_aromatic_bonds() {
        let mol = parse("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bonds().len(), 6);
        assert!(mol.bonds().iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(mol.ring_bond_flags().iter().all(|&ring| ring));
    }

    #[test]
    fn kekule_ring_keeps_explicit_orders() {
        let mol = parse("C1=CC=CC=C1").unwrap();
        let doubles = mol
            .bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 3);
        assert_eq!(mol.bonds().len(), 6);
    }

    #[test]
    fn percent_ring_labels_are_supported() {
        let mol = parse("C%10CCC%10").unwrap();
        assert_eq!(mol.bonds().len(), 4);
    }

    #[test]
    fn ring_bond_order_can_be_given_on_either_side() {
        let mol = parse("C=1CCC1").unwrap();
        let ids = mol.atom_ids();
        assert_eq!(
            mol.bond_between(ids[0], ids[3]).unwrap().order,
            BondOrder::Double
        );
    }

    #[test]
    fn bracket_atoms_carry_charge_hydrogens_and_isotope() {
        let mol = parse("[13CH3][NH3+]").unwrap();
        let atoms: Vec<_> = mol.atoms_iter().map(|(_, a)| a.clone()).collect();
        assert_eq!(atoms[0].isotope, Some(13));
        assert_eq!(atoms[0].hydrogen_count, 3);
        assert!(atoms[0].bracket);
        assert_eq!(atoms[1].element, Element::N);
        assert_eq!(atoms[1].hydrogen_count, 3);
        assert_eq!(atoms[1].formal_charge, 1);
    }

    #[test]
    fn charge_forms_are_equivalent() {
        for text in ["[O--]", "[O-2]"] {
            let mol = parse(text).unwrap();
            let (_, atom) = mol.atoms_iter().next().unwrap();
            assert_eq!(atom.formal_charge, -2);
        }
    }

    #[test]
    fn chirality_and_atom_class_are_ignored() {
        let mol = parse("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 6);
        let mol = parse("[CH3:1]C").unwrap();
        assert_eq!(mol.atom_count(), 2);
    }

    #[test]
    fn aromatic_bracket_atoms_are_flagged() {
        let mol = parse("c1cc[nH]c1").unwrap();
        let nitrogen = mol
            .atoms_iter()
            .find(|(_, a)| a.element == Element::N)
            .map(|(_, a)| a.clone())
            .unwrap();
        assert!(nitrogen.aromatic);
        assert_eq!(nitrogen.hydrogen_count, 1);
    }

    #[test]
    fn dot_separates_fragments() {
        let mol = parse("CC(=O)[O-].[Na+]").unwrap();
        assert_eq!(mol.fragment_count(), 2);
        assert_eq!(mol.net_charge(), 0);
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(parse("   "), Err(SmilesError::Empty));
        assert!(matches!(
            parse("not-a-structure"),
            Err(SmilesError::UnexpectedChar { ch: 't', pos: 2 })
        ));
        assert!(matches!(
            parse("C$C"),
            Err(SmilesError::UnexpectedChar { ch: '$', pos: 1 })
        ));
    }

    #[test]
    fn rejects_structural_errors() {
        assert_eq!(parse("C1CC"), Err(SmilesError::UnclosedRing(1)));
        assert_eq!(parse("CC(C"), Err(SmilesError::UnbalancedParentheses(4)));
        assert_eq!(parse("CC)C"), Err(SmilesError::UnbalancedParentheses(2)));
        assert_eq!(parse("CC="), Err(SmilesError::DanglingBond(2)));
        assert_eq!(parse("[CH4"), Err(SmilesError::UnclosedBracket(0)));
        assert!(matches!(
            parse("C11"),
            Err(SmilesError::InvalidRingClosure { label: 1, .. })
        ));
        assert!(matches!(
            parse("C12CC12"),
            Err(SmilesError::InvalidRingClosure { label: 2, .. })
        ));
        assert_eq!(parse("C=1CCC#1"), Err(SmilesError::ConflictingRingBond(1)));
    }

    #[test]
    fn rejects_unknown_bracket_elements() {
        assert!(matches!(
            parse("[Zz]"),
            Err(SmilesError::UnknownElement { .. })
        ));
    }
}
