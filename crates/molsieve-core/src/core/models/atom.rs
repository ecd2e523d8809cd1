use super::element::Element;

/// An atom in a molecular graph.
///
/// Hydrogens are usually not stored as separate atoms; they are carried as a
/// count on the heavy atom they are attached to. Atoms written in bracket
/// notation keep their hydrogen count as given, while for all other atoms the
/// count is derived from the default valence during sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The chemical element.
    pub element: Element,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Number of hydrogens attached to this atom that are not explicit atoms.
    pub hydrogen_count: u8,
    /// Whether the atom was declared aromatic.
    pub aromatic: bool,
    /// Whether the hydrogen count is fixed (bracket atom) rather than implicit.
    pub bracket: bool,
    /// Optional isotope mass number.
    pub isotope: Option<u16>,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom whose hydrogens will be implied.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            hydrogen_count: 0,
            aromatic: false,
            bracket: false,
            isotope: None,
        }
    }

    /// Creates a bracket atom with a fixed hydrogen count and charge.
    pub fn bracket(element: Element, hydrogen_count: u8, formal_charge: i8) -> Self {
        Self {
            element,
            formal_charge,
            hydrogen_count,
            aromatic: false,
            bracket: true,
            isotope: None,
        }
    }

    pub fn with_aromatic(mut self, aromatic: bool) -> Self {
        self.aromatic = aromatic;
        self
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }

    pub fn is_heavy(&self) -> bool {
        !self.is_hydrogen()
    }
}
