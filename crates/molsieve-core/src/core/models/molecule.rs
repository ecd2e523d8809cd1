use super::atom::Atom;
use super::element::Element;
use super::ids::AtomId;
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::VecDeque;

/// A molecular graph: atoms connected by bonds.
///
/// `Molecule` is a plain value type. Every normalization stage consumes one
/// molecule and produces a new one, and filter rules receive their own clone,
/// so no two consumers ever observe each other's modifications.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    /// Primary storage for atoms using a slot map for stable IDs across removals.
    atoms: SlotMap<AtomId, Atom>,
    /// List of all bonds in the molecule.
    bonds: Vec<Bond>,
    /// Cached adjacency list: neighbour ID and index of the connecting bond.
    adjacency: SecondaryMap<AtomId, Vec<(AtomId, usize)>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an atom and returns its stable ID.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Connects two atoms.
    ///
    /// Adding a bond that already exists is a no-op.
    ///
    /// # Return
    ///
    /// Returns `None` if either atom does not exist or both IDs are the same.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }
        if self.bond_between(atom1_id, atom2_id).is_some() {
            return Some(());
        }

        let index = self.bonds.len();
        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.adjacency.get_mut(atom1_id)?.push((atom2_id, index));
        self.adjacency.get_mut(atom2_id)?.push((atom1_id, index));
        Some(())
    }

    /// Removes an atom together with every bond that touches it.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;
        self.bonds.retain(|bond| !bond.contains(atom_id));
        self.rebuild_adjacency();
        Some(atom)
    }

    /// Removes several atoms and their bonds, rebuilding the adjacency once.
    ///
    /// IDs that are not present are skipped. Returns the number of atoms removed.
    pub fn remove_atoms(&mut self, atom_ids: impl IntoIterator<Item = AtomId>) -> usize {
        let removed = atom_ids
            .into_iter()
            .filter(|&id| self.atoms.remove(id).is_some())
            .count();
        if removed > 0 {
            let atoms = &self.atoms;
            self.bonds.retain(|bond| {
                atoms.contains_key(bond.atom1_id) && atoms.contains_key(bond.atom2_id)
            });
            self.rebuild_adjacency();
        }
        removed
    }

    fn rebuild_adjacency(&mut self) {
        self.adjacency.clear();
        for id in self.atoms.keys() {
            self.adjacency.insert(id, Vec::new());
        }
        for (index, bond) in self.bonds.iter().enumerate() {
            if let Some(list) = self.adjacency.get_mut(bond.atom1_id) {
                list.push((bond.atom2_id, index));
            }
            if let Some(list) = self.adjacency.get_mut(bond.atom2_id) {
                list.push((bond.atom1_id, index));
            }
        }
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.atoms.keys().collect()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond_between(&self, atom1_id: AtomId, atom2_id: AtomId) -> Option<&Bond> {
        self.adjacency
            .get(atom1_id)?
            .iter()
            .find(|(neighbor, _)| *neighbor == atom2_id)
            .and_then(|&(_, index)| self.bonds.get(index))
    }

    /// Iterates over the neighbours of an atom.
    pub fn neighbors(&self, atom_id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.adjacency
            .get(atom_id)
            .into_iter()
            .flatten()
            .map(|&(neighbor, _)| neighbor)
    }

    /// Iterates over `(neighbour, bond)` pairs of an atom.
    pub fn bonds_of(&self, atom_id: AtomId) -> impl Iterator<Item = (AtomId, &Bond)> + '_ {
        self.adjacency
            .get(atom_id)
            .into_iter()
            .flatten()
            .filter_map(|&(neighbor, index)| self.bonds.get(index).map(|bond| (neighbor, bond)))
    }

    pub fn degree(&self, atom_id: AtomId) -> usize {
        self.adjacency.get(atom_id).map_or(0, Vec::len)
    }

    /// Number of bonded neighbours that are not hydrogen atoms.
    pub fn heavy_degree(&self, atom_id: AtomId) -> usize {
        self.neighbors(atom_id)
            .filter(|&n| self.atoms.get(n).is_some_and(Atom::is_heavy))
            .count()
    }

    /// Sum of bond valence contributions around an atom (hydrogen counts excluded).
    pub fn bond_valence(&self, atom_id: AtomId) -> u8 {
        self.bonds_of(atom_id)
            .map(|(_, bond)| bond.order.valence_contribution())
            .fold(0u8, u8::saturating_add)
    }

    /// Hydrogens attached to an atom, whether counted on the atom or explicit.
    pub fn total_hydrogens(&self, atom_id: AtomId) -> usize {
        let counted = self.atoms.get(atom_id).map_or(0, |a| usize::from(a.hydrogen_count));
        let explicit = self
            .neighbors(atom_id)
            .filter(|&n| self.atoms.get(n).is_some_and(Atom::is_hydrogen))
            .count();
        counted + explicit
    }

    pub fn net_charge(&self) -> i32 {
        self.atoms.values().map(|a| i32::from(a.formal_charge)).sum()
    }

    pub fn count_element(&self, element: Element) -> usize {
        self.atoms.values().filter(|a| a.element == element).count()
    }

    /// Flags every bond that lies on a ring, indexed like [`Molecule::bonds`].
    ///
    /// A bond is acyclic exactly when it is a bridge of the graph. The search
    /// keeps its own stack, so chain length is not bounded by the thread stack.
    pub fn ring_bond_flags(&self) -> Vec<bool> {
        let mut in_ring = vec![true; self.bonds.len()];
        let mut discovery: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut low: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut timer = 0;
        // (atom, bond it was entered through, next adjacency slot to visit)
        let mut stack: Vec<(AtomId, Option<usize>, usize)> = Vec::new();

        for start in self.atoms.keys() {
            if discovery.contains_key(start) {
                continue;
            }
            discovery.insert(start, timer);
            low.insert(start, timer);
            timer += 1;
            stack.push((start, None, 0));

            while let Some(frame) = stack.last_mut() {
                let (atom_id, parent_bond, cursor) = *frame;
                let edges = self.adjacency.get(atom_id).map_or(&[][..], Vec::as_slice);

                if let Some(&(next, bond_index)) = edges.get(cursor) {
                    frame.2 += 1;
                    if Some(bond_index) == parent_bond {
                        continue;
                    }
                    if let Some(&seen) = discovery.get(next) {
                        low[atom_id] = low[atom_id].min(seen);
                    } else {
                        discovery.insert(next, timer);
                        low.insert(next, timer);
                        timer += 1;
                        stack.push((next, Some(bond_index), 0));
                    }
                    continue;
                }

                stack.pop();
                if let (Some(bond_index), Some(&(parent, _, _))) = (parent_bond, stack.last()) {
                    let child_low = low[atom_id];
                    low[parent] = low[parent].min(child_low);
                    if child_low > discovery[parent] {
                        in_ring[bond_index] = false;
                    }
                }
            }
        }
        in_ring
    }

    /// Number of disconnected fragments.
    pub fn fragment_count(&self) -> usize {
        let mut visited: SecondaryMap<AtomId, ()> = SecondaryMap::new();
        let mut fragments = 0;
        for start in self.atoms.keys() {
            if visited.contains_key(start) {
                continue;
            }
            fragments += 1;
            let mut queue = VecDeque::from([start]);
            visited.insert(start, ());
            while let Some(current) = queue.pop_front() {
                for next in self.neighbors(current) {
                    if visited.insert(next, ()).is_none() {
                        queue.push_back(next);
                    }
                }
            }
        }
        fragments
    }
}

impl PartialEq for Molecule {
    fn eq(&self, other: &Self) -> bool {
        self.atoms.len() == other.atoms.len()
            && self.atoms.iter().eq(other.atoms.iter())
            && self.bonds == other.bonds
    }
}

impl Eq for Molecule {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethanol() -> (Molecule, [AtomId; 3]) {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C));
        let c2 = mol.add_atom(Atom::new(Element::C));
        let o = mol.add_atom(Atom::new(Element::O));
        mol.add_bond(c1, c2, BondOrder::Single).unwrap();
        mol.add_bond(c2, o, BondOrder::Single).unwrap();
        (mol, [c1, c2, o])
    }

    fn cyclopropane_with_tail() -> Molecule {
        let mut mol = Molecule::new();
        let ids: Vec<_> = (0..4).map(|_| mol.add_atom(Atom::new(Element::C))).collect();
        mol.add_bond(ids[0], ids[1], BondOrder::Single).unwrap();
        mol.add_bond(ids[1], ids[2], BondOrder::Single).unwrap();
        mol.add_bond(ids[2], ids[0], BondOrder::Single).unwrap();
        mol.add_bond(ids[2], ids[3], BondOrder::Single).unwrap();
        mol
    }

    #[test]
    fn atoms_and_bonds_are_accessible() {
        let (mol, [c1, c2, o]) = ethanol();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bonds().len(), 2);
        assert_eq!(mol.degree(c2), 2);
        assert!(mol.bond_between(c1, c2).is_some());
        assert!(mol.bond_between(c1, o).is_none());
        assert_eq!(mol.neighbors(o).collect::<Vec<_>>(), vec![c2]);
    }

    #[test]
    fn add_bond_rejects_self_bonds_and_is_idempotent() {
        let (mut mol, [c1, c2, _]) = ethanol();
        assert!(mol.add_bond(c1, c1, BondOrder::Single).is_none());
        assert!(mol.add_bond(c1, c2, BondOrder::Double).is_some());
        assert_eq!(mol.bonds().len(), 2);
        assert_eq!(mol.bond_between(c1, c2).unwrap().order, BondOrder::Single);
    }

    #[test]
    fn remove_atom_drops_its_bonds_and_keeps_other_ids_valid() {
        let (mut mol, [c1, c2, o]) = ethanol();
        let removed = mol.remove_atom(c1).unwrap();
        assert_eq!(removed.element, Element::C);
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bonds().len(), 1);
        assert!(mol.bond_between(c2, o).is_some());
        assert_eq!(mol.degree(c2), 1);
        assert!(mol.atom(c1).is_none());
    }

    #[test]
    fn ring_bonds_exclude_bridges() {
        let mol = cyclopropane_with_tail();
        assert_eq!(mol.ring_bond_flags(), vec![true, true, true, false]);
    }

    #[test]
    fn chain_has_no_ring_bonds() {
        let (mol, _) = ethanol();
        assert_eq!(mol.ring_bond_flags(), vec![false, false]);
    }

    #[test]
    fn fused_rings_and_linkers_are_told_apart() {
        // Two fused three-rings joined to a lone ring by a two-bond linker.
        let mut mol = Molecule::new();
        let ids: Vec<_> = (0..9).map(|_| mol.add_atom(Atom::new(Element::C))).collect();
        let bonds = [
            (0, 1), (1, 2), (2, 0), (1, 3), (3, 2),
            (3, 4), (4, 5),
            (5, 6), (6, 7), (7, 8), (8, 5),
        ];
        for (a, b) in bonds {
            mol.add_bond(ids[a], ids[b], BondOrder::Single).unwrap();
        }
        assert_eq!(
            mol.ring_bond_flags(),
            vec![true, true, true, true, true, false, false, true, true, true, true]
        );
    }

    #[test]
    fn very_long_chain_is_searched_on_a_small_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let mut mol = Molecule::new();
                let mut previous = mol.add_atom(Atom::new(Element::C));
                for _ in 1..100_000 {
                    let next = mol.add_atom(Atom::new(Element::C));
                    mol.add_bond(previous, next, BondOrder::Single).unwrap();
                    previous = next;
                }
                mol.ring_bond_flags()
            })
            .unwrap();
        let flags = handle.join().unwrap();
        assert_eq!(flags.len(), 99_999);
        assert!(flags.iter().all(|&ring| !ring));
    }

    #[test]
    fn remove_atoms_drops_every_touching_bond_at_once() {
        let mol = cyclopropane_with_tail();
        let ids = mol.atom_ids();
        let mut trimmed = mol.clone();
        assert_eq!(trimmed.remove_atoms([ids[0], ids[3], ids[0]]), 2);
        assert_eq!(trimmed.atom_count(), 2);
        assert_eq!(trimmed.bonds().len(), 1);
        assert!(trimmed.bond_between(ids[1], ids[2]).is_some());
        assert_eq!(trimmed.degree(ids[2]), 1);
        assert_eq!(trimmed.ring_bond_flags(), vec![false]);

        let mut untouched = mol.clone();
        assert_eq!(untouched.remove_atoms(Vec::new()), 0);
        assert_eq!(untouched, mol);
    }

    #[test]
    fn fragments_are_counted() {
        let (mut mol, _) = ethanol();
        assert_eq!(mol.fragment_count(), 1);
        mol.add_atom(Atom::bracket(Element::Na, 0, 1));
        assert_eq!(mol.fragment_count(), 2);
        assert_eq!(mol.net_charge(), 1);
    }

    #[test]
    fn hydrogens_are_counted_on_atoms_and_as_neighbours() {
        let (mut mol, [_, _, o]) = ethanol();
        mol.atom_mut(o).unwrap().hydrogen_count = 1;
        let h = mol.add_atom(Atom::bracket(Element::H, 0, 0));
        mol.add_bond(o, h, BondOrder::Single).unwrap();
        assert_eq!(mol.total_hydrogens(o), 2);
        assert_eq!(mol.heavy_degree(o), 1);
    }

    #[test]
    fn clones_compare_equal_until_modified() {
        let (mol, [c1, _, _]) = ethanol();
        let mut copy = mol.clone();
        assert_eq!(mol, copy);
        copy.atom_mut(c1).unwrap().formal_charge = 1;
        assert_ne!(mol, copy);
    }
}
