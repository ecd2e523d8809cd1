//! # Core Models Module
//!
//! Plain value types describing candidate molecules and their structures.
//!
//! - [`record`] - A batch record: structure notation, identifier and opaque extra fields
//! - [`element`] - Element table with masses and allowed valences
//! - [`atom`] - Atoms with charge, hydrogen count and aromaticity
//! - [`topology`] - Bonds and bond orders
//! - [`molecule`] - The molecular graph handed between normalization stages and rules
//! - [`ids`] - Stable atom identifiers

pub mod atom;
pub mod element;
pub mod ids;
pub mod molecule;
pub mod record;
pub mod topology;
