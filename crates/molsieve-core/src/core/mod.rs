//! # Core Module
//!
//! Stateless building blocks of the screening pipeline.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Atoms, bonds, molecular graphs and batch records
//! - **File I/O** ([`io`]) - The SMILES subset parser and tab-separated batch files
//! - **Chemistry** ([`chem`]) - The structure normalization service contract, its
//!   bundled implementation and graph descriptors
//! - **Filters** ([`filters`]) - The rule trait, the built-in catalogue and the registry
//!   that builds a run's selection

pub mod chem;
pub mod filters;
pub mod io;
pub mod models;
