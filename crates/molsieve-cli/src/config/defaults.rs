use molsieve::engine::config::{DuplicateIdPolicy, ExecutionMode, UnknownFilterPolicy};

pub struct DefaultsConfig {
    pub mode: ExecutionMode,
    pub unknown_names: UnknownFilterPolicy,
    pub duplicate_ids: DuplicateIdPolicy,
    /// Only consulted when the lenient combination is selected without a limit.
    pub lenient_max_failures: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            unknown_names: UnknownFilterPolicy::Reject,
            duplicate_ids: DuplicateIdPolicy::Warn,
            lenient_max_failures: 1,
        }
    }
}
