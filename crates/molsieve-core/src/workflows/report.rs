use std::fmt;
use tracing::info;

/// Bucket counts of a classified batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub filter_failed: usize,
    pub sanitize_failed: usize,
}

impl Summary {
    /// Records that did not pass, for either reason.
    pub fn failed(&self) -> usize {
        self.filter_failed + self.sanitize_failed
    }

    /// `100 * passed / total`, or `0.0` for an empty batch.
    pub fn percent_passed(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.passed as f64 / self.total as f64
    }

    pub fn log(&self) {
        info!(
            total = self.total,
            passed = self.passed,
            filter_failed = self.filter_failed,
            sanitize_failed = self.sanitize_failed,
            percent_passed = format_args!("{:.2}", self.percent_passed()),
            "Screening summary."
        );
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records screened:      {}", self.total)?;
        writeln!(f, "Passed all filters:    {}", self.passed)?;
        writeln!(f, "Failed a filter:       {}", self.filter_failed)?;
        writeln!(f, "Failed sanitization:   {}", self.sanitize_failed)?;
        write!(f, "Percent passed:        {:.2}%", self.percent_passed())
    }
}
