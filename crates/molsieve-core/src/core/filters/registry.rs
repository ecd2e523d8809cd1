use super::catalogue::{
    MozziconacciFilter, ReactiveGroupFilter, RuleOfFiveCountsFilter, closest_builtin,
};
use super::rule::{Rule, RuleFactory, Selection};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A filter named '{0}' is already registered")]
    DuplicateName(String),
    #[error("Unknown filter name(s): {}", .0.join(", "))]
    UnknownNames(Vec<String>),
}

/// What to do with requested filter names that match no registered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFilterPolicy {
    /// Fail before any record is processed.
    #[default]
    Reject,
    /// Log a warning per unknown name and continue without it.
    Warn,
}

/// Explicit table of rule factories, keyed by rule name.
///
/// New rules are added with [`FilterRegistry::register`]; nothing is
/// discovered implicitly.
pub struct FilterRegistry {
    factories: Vec<(String, RuleFactory)>,
}

impl FilterRegistry {
    /// A registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// A registry holding the built-in catalogue.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.insert_factory(Box::new(|| Box::new(MozziconacciFilter) as Box<dyn Rule>));
        registry.insert_factory(Box::new(|| Box::new(RuleOfFiveCountsFilter) as Box<dyn Rule>));
        registry.insert_factory(Box::new(|| Box::new(ReactiveGroupFilter) as Box<dyn Rule>));
        registry
    }

    fn insert_factory(&mut self, factory: RuleFactory) -> Option<&str> {
        let name = factory().name().to_string();
        if self.contains(&name) {
            return None;
        }
        self.factories.push((name, factory));
        self.factories.last().map(|(name, _)| name.as_str())
    }

    /// Registers a rule factory under the name reported by the rule it builds.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a rule with the same name
    /// is already registered.
    pub fn register<F>(&mut self, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Rule> + Send + Sync + 'static,
    {
        let name = factory().name().to_string();
        match self.insert_factory(Box::new(factory)) {
            Some(_) => {
                debug!(filter = %name, "Registered filter.");
                Ok(())
            }
            None => Err(RegistryError::DuplicateName(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.iter().any(|(known, _)| known == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the active selection for a run.
    ///
    /// `None` means no filtering was requested and yields `None`. Otherwise
    /// every registered rule is instantiated and kept iff its name was
    /// requested. Requested names that match nothing are handled per `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownNames`] under
    /// [`UnknownFilterPolicy::Reject`] when any requested name is unknown.
    pub fn build_selection(
        &self,
        requested: Option<&[String]>,
        policy: UnknownFilterPolicy,
    ) -> Result<Option<Selection>, RegistryError> {
        let Some(requested) = requested else {
            return Ok(None);
        };
        let requested: BTreeSet<&str> = requested.iter().map(String::as_str).collect();

        let unknown: Vec<String> = requested
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| name.to_string())
            .collect();
        for name in &unknown {
            if let Some(builtin) = closest_builtin(name) {
                warn!(
                    filter = %name,
                    closest = builtin,
                    "Filter family has no built-in implementation; request the closest built-in instead."
                );
            }
        }
        if !unknown.is_empty() {
            match policy {
                UnknownFilterPolicy::Reject => return Err(RegistryError::UnknownNames(unknown)),
                UnknownFilterPolicy::Warn => {
                    for name in &unknown {
                        warn!(filter = %name, "Requested filter is not registered; ignoring it.");
                    }
                }
            }
        }

        let selection: Selection = self
            .factories
            .iter()
            .map(|(_, factory)| factory())
            .filter(|rule| requested.contains(rule.name()))
            .collect();
        debug!(filters = ?selection, "Filter selection built.");
        Ok(Some(selection))
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
