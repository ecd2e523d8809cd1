//! # molsieve
//!
//! Classification of candidate molecules against drug-likeness and structural
//! filter rules.
//!
//! Each record of a batch is normalized (parse, sanitize, deprotonate,
//! re-sanitize, neutralize) and then checked against the rules selected for
//! the run. Records end up in exactly one of three buckets: passed, failed a
//! filter, or failed normalization.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Molecular data models, the SMILES parser and
//!   batch-file I/O, the structure normalization service and the filter rule
//!   registry.
//!
//! - **[`engine`]: The Logic Core.** The normalizer and rule evaluator applied to
//!   every record, run settings, progress events and the work distributors that
//!   execute records serially or on a thread pool.
//!
//! - **[`workflows`]: The Public API.** Batch classification, the summary
//!   reporter, the end-to-end screening run and 3-D artefact reconciliation.

pub mod core;
pub mod engine;
pub mod workflows;
