//! Filter rules and the registry that selects them for a run.
//!
//! A [`rule::Rule`] is a named, stateless predicate over a sanitized, neutral
//! molecule. The [`registry::FilterRegistry`] maps rule names to factories and
//! turns the names requested for a run into an immutable [`rule::Selection`]
//! that is shared read-only by every worker.

pub mod catalogue;
pub mod registry;
pub mod rule;
