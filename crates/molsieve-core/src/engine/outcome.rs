use std::fmt;

/// Classification result of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The structure could not be parsed or normalized.
    SanitizeFailed,
    /// The structure is valid but the selected rules rejected it.
    FilterFailed,
    Passed,
}

impl Outcome {
    pub fn from_verdict(passed: bool) -> Self {
        if passed { Self::Passed } else { Self::FilterFailed }
    }

    pub fn is_passed(self) -> bool {
        self == Self::Passed
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SanitizeFailed => "sanitize-failed",
            Self::FilterFailed => "filter-failed",
            Self::Passed => "passed",
        })
    }
}
