use crate::error::Result;
use molsieve::core::filters::catalogue::RELATED_FAMILIES;
use molsieve::core::filters::registry::FilterRegistry;
use std::fmt::Write;

pub fn run() -> Result<()> {
    print!("{}", listing(&FilterRegistry::with_defaults()));
    Ok(())
}

fn listing(registry: &FilterRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Registered filters ({}):", registry.len());
    for name in registry.names() {
        let _ = writeln!(out, "  {}", name);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Not built in (closest built-in filter):");
    for (family, builtin) in RELATED_FAMILIES {
        let _ = writeln!(out, "  {:<24}{}", family, builtin);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_builtins_and_their_unimplemented_relatives() {
        let text = listing(&FilterRegistry::with_defaults());
        assert!(text.starts_with("Registered filters (3):\n  MozziconacciFilter\n"));
        assert!(text.contains("  PAINSFilter             ReactiveGroupFilter\n"));
        assert!(text.contains("  LipinskiStrictFilter    RuleOfFiveCountsFilter\n"));
    }
}
