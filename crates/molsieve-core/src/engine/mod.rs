//! # Engine Module
//!
//! Per-record processing and the machinery around it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run settings and the policies that resolve
//!   unknown filter names, duplicate identifiers and verdict combination
//! - **Normalization** ([`normalizer`]) - The five-stage, short-circuiting structure pipeline
//! - **Evaluation** ([`evaluator`]) - Isolated rule application and verdict combination
//! - **Outcomes** ([`outcome`]) - The three classification buckets
//! - **Work Distribution** ([`distributor`]) - Serial and thread-pool executors behind one trait
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Run-level errors

pub mod config;
pub mod distributor;
pub mod error;
pub mod evaluator;
pub mod normalizer;
pub mod outcome;
pub mod progress;
