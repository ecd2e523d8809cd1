pub mod artifacts;
pub mod batch;
pub mod smiles;
