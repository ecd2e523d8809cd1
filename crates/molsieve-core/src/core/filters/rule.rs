use crate::core::models::molecule::Molecule;
use std::collections::BTreeMap;
use std::fmt;

/// A named drug-likeness or structural-liability predicate.
///
/// `evaluate` receives its own copy of the structure, so an implementation
/// may modify it freely without affecting any other rule.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    /// Returns `true` when the molecule passes the rule.
    fn evaluate(&self, molecule: Molecule) -> bool;
}

/// Constructor for a rule, as stored by the registry.
pub type RuleFactory = Box<dyn Fn() -> Box<dyn Rule> + Send + Sync>;

/// The active rules of a run, keyed by name.
///
/// Built once and never modified afterwards.
#[derive(Default)]
pub struct Selection {
    rules: BTreeMap<String, Box<dyn Rule>>,
}

impl Selection {
    pub(crate) fn insert(&mut self, rule: Box<dyn Rule>) {
        self.rules.insert(rule.name().to_string(), rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.values().map(|rule| rule.as_ref())
    }
}

impl FromIterator<Box<dyn Rule>> for Selection {
    fn from_iter<I: IntoIterator<Item = Box<dyn Rule>>>(iter: I) -> Self {
        let mut selection = Self::default();
        for rule in iter {
            selection.insert(rule);
        }
        selection
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
