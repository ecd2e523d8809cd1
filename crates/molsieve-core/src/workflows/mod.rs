//! # Workflows Module
//!
//! User-facing procedures built on the `engine` and `core` layers.
//!
//! - **Screening** ([`screen`]) - The end-to-end run: seed loading, filter selection,
//!   classification, output files and the optional 3-D reconciliation
//! - **Classification** ([`classify`]) - Fan-out of a batch to a work distributor and
//!   partitioning of the results into outcome buckets
//! - **Reporting** ([`report`]) - Bucket counts and the pass percentage
//! - **Reconciliation** ([`reconcile`]) - Pairing conformer artefacts with passed records

pub mod classify;
pub mod reconcile;
pub mod report;
pub mod screen;
