use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical elements understood by the structure models.
///
/// The set covers the organic subset, common halogens and the counter-ions
/// that routinely appear in vendor screening libraries (salts are written as
/// disconnected fragments such as `[Na+]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    He,
    Li,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    As,
    Se,
    Br,
    Kr,
    I,
    Xe,
}

#[rustfmt::skip]
static ELEMENT_SYMBOLS: Map<&'static str, Element> = phf_map! {
    "H" => Element::H, "He" => Element::He, "Li" => Element::Li,
    "B" => Element::B, "C" => Element::C, "N" => Element::N,
    "O" => Element::O, "F" => Element::F, "Ne" => Element::Ne,
    "Na" => Element::Na, "Mg" => Element::Mg, "Si" => Element::Si,
    "P" => Element::P, "S" => Element::S, "Cl" => Element::Cl,
    "Ar" => Element::Ar, "K" => Element::K, "Ca" => Element::Ca,
    "As" => Element::As, "Se" => Element::Se, "Br" => Element::Br,
    "Kr" => Element::Kr, "I" => Element::I, "Xe" => Element::Xe,
};

// Allowed valences keyed by atomic number. Charged atoms are looked up under
// their isoelectronic neighbour (atomic number minus formal charge).
#[rustfmt::skip]
static VALENCES_BY_ATOMIC_NUMBER: Map<u8, &'static [u8]> = phf_map! {
    1u8 => &[1], 2u8 => &[0], 3u8 => &[1],
    5u8 => &[3], 6u8 => &[4], 7u8 => &[3, 5], 8u8 => &[2], 9u8 => &[1], 10u8 => &[0],
    11u8 => &[1], 12u8 => &[2], 14u8 => &[4], 15u8 => &[3, 5], 16u8 => &[2, 4, 6],
    17u8 => &[1], 18u8 => &[0], 19u8 => &[1], 20u8 => &[2],
    33u8 => &[3, 5], 34u8 => &[2, 4, 6], 35u8 => &[1], 36u8 => &[0],
    53u8 => &[1, 3, 5], 54u8 => &[0],
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown element symbol: '{0}'")]
pub struct UnknownElementError(pub String);

impl Element {
    pub fn atomic_number(self) -> u8 {
        match self {
            Self::H => 1,
            Self::He => 2,
            Self::Li => 3,
            Self::B => 5,
            Self::C => 6,
            Self::N => 7,
            Self::O => 8,
            Self::F => 9,
            Self::Ne => 10,
            Self::Na => 11,
            Self::Mg => 12,
            Self::Si => 14,
            Self::P => 15,
            Self::S => 16,
            Self::Cl => 17,
            Self::Ar => 18,
            Self::K => 19,
            Self::Ca => 20,
            Self::As => 33,
            Self::Se => 34,
            Self::Br => 35,
            Self::Kr => 36,
            Self::I => 53,
            Self::Xe => 54,
        }
    }

    /// Standard atomic weight in g/mol.
    pub fn average_mass(self) -> f64 {
        match self {
            Self::H => 1.008,
            Self::He => 4.003,
            Self::Li => 6.941,
            Self::B => 10.812,
            Self::C => 12.011,
            Self::N => 14.007,
            Self::O => 15.999,
            Self::F => 18.998,
            Self::Ne => 20.180,
            Self::Na => 22.990,
            Self::Mg => 24.305,
            Self::Si => 28.086,
            Self::P => 30.974,
            Self::S => 32.067,
            Self::Cl => 35.453,
            Self::Ar => 39.948,
            Self::K => 39.098,
            Self::Ca => 40.078,
            Self::As => 74.922,
            Self::Se => 78.971,
            Self::Br => 79.904,
            Self::Kr => 83.798,
            Self::I => 126.904,
            Self::Xe => 131.293,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::H => "H",
            Self::He => "He",
            Self::Li => "Li",
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::F => "F",
            Self::Ne => "Ne",
            Self::Na => "Na",
            Self::Mg => "Mg",
            Self::Si => "Si",
            Self::P => "P",
            Self::S => "S",
            Self::Cl => "Cl",
            Self::Ar => "Ar",
            Self::K => "K",
            Self::Ca => "Ca",
            Self::As => "As",
            Self::Se => "Se",
            Self::Br => "Br",
            Self::Kr => "Kr",
            Self::I => "I",
            Self::Xe => "Xe",
        }
    }

    pub fn is_halogen(self) -> bool {
        matches!(self, Self::F | Self::Cl | Self::Br | Self::I)
    }

    /// Allowed valences for this element carrying `formal_charge`, or `None`
    /// when the charge state has no isoelectronic entry in the table.
    pub fn allowed_valences(self, formal_charge: i8) -> Option<&'static [u8]> {
        let shifted = i16::from(self.atomic_number()) - i16::from(formal_charge);
        let key = u8::try_from(shifted).ok()?;
        VALENCES_BY_ATOMIC_NUMBER.get(&key).copied()
    }
}

impl FromStr for Element {
    type Err = UnknownElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ELEMENT_SYMBOLS
            .get(s)
            .copied()
            .ok_or_else(|| UnknownElementError(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
