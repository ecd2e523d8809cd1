use super::config::CombinationPolicy;
use crate::core::chem::StructureEngine;
use crate::core::filters::rule::Selection;
use crate::core::models::molecule::Molecule;
use tracing::trace;

/// Applies every rule of `selection` to `molecule` and combines the verdicts.
///
/// An absent or empty selection passes without consulting the engine.
/// Otherwise the molecule is sanitized once more first; if that fails, no
/// rule can pass and the result is `false`. Each rule receives its own clone
/// of the structure, and all rules are evaluated even after a failure so that
/// `policy` sees the full failure count.
pub fn evaluate_all<E: StructureEngine + ?Sized>(
    engine: &E,
    molecule: &Molecule,
    selection: Option<&Selection>,
    policy: CombinationPolicy,
) -> bool {
    let Some(selection) = selection.filter(|s| !s.is_empty()) else {
        return true;
    };

    let checked = match engine.sanitize(molecule.clone()) {
        Ok(checked) => checked,
        Err(err) => {
            trace!(error = %err, "Structure failed the pre-evaluation sanitize check.");
            return false;
        }
    };

    let failures = selection
        .rules()
        .filter(|rule| {
            let passed = rule.evaluate(checked.clone());
            if !passed {
                trace!(filter = rule.name(), "Rule rejected structure.");
            }
            !passed
        })
        .count();

    policy.accepts(failures)
}
