pub use crate::core::filters::registry::UnknownFilterPolicy;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How work items are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    Serial,
    /// Shared-memory worker pool.
    #[default]
    Parallel,
}

/// How per-rule verdicts are combined into one pass/fail result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinationPolicy {
    /// Every selected rule must pass.
    #[default]
    Strict,
    /// At most `max_failures` selected rules may fail.
    Lenient { max_failures: usize },
}

impl CombinationPolicy {
    pub fn accepts(self, failures: usize) -> bool {
        match self {
            Self::Strict => failures == 0,
            Self::Lenient { max_failures } => failures <= max_failures,
        }
    }
}

/// What to do when a batch repeats an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateIdPolicy {
    Allow,
    #[default]
    Warn,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// `None` disables filtering altogether.
    pub requested: Option<Vec<String>>,
    pub unknown_names: UnknownFilterPolicy,
    pub combination: CombinationPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    pub mode: ExecutionMode,
    /// Worker count for parallel mode; `None` lets the pool decide.
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningConfig {
    pub seed_path: PathBuf,
    pub output_dir: PathBuf,
    pub filters: FilterConfig,
    pub execution: ExecutionConfig,
    pub duplicate_ids: DuplicateIdPolicy,
    /// Directory of per-record 3-D artefacts to reconcile after screening.
    pub conformer_dir: Option<PathBuf>,
}

#[derive(Default)]
pub struct ScreeningConfigBuilder {
    seed_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    requested_filters: Option<Vec<String>>,
    unknown_filters: Option<UnknownFilterPolicy>,
    combination: Option<CombinationPolicy>,
    mode: Option<ExecutionMode>,
    threads: Option<usize>,
    duplicate_ids: Option<DuplicateIdPolicy>,
    conformer_dir: Option<PathBuf>,
}

impl ScreeningConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_path(mut self, path: PathBuf) -> Self {
        self.seed_path = Some(path);
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn filters(mut self, names: Vec<String>) -> Self {
        self.requested_filters = Some(names);
        self
    }
    pub fn unknown_filters(mut self, policy: UnknownFilterPolicy) -> Self {
        self.unknown_filters = Some(policy);
        self
    }
    pub fn combination(mut self, policy: CombinationPolicy) -> Self {
        self.combination = Some(policy);
        self
    }
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }
    pub fn duplicate_ids(mut self, policy: DuplicateIdPolicy) -> Self {
        self.duplicate_ids = Some(policy);
        self
    }
    pub fn conformer_dir(mut self, path: PathBuf) -> Self {
        self.conformer_dir = Some(path);
        self
    }

    pub fn build(self) -> Result<ScreeningConfig, ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "threads",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(ScreeningConfig {
            seed_path: self
                .seed_path
                .ok_or(ConfigError::MissingParameter("seed_path"))?,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            filters: FilterConfig {
                requested: self.requested_filters,
                unknown_names: self.unknown_filters.unwrap_or_default(),
                combination: self.combination.unwrap_or_default(),
            },
            execution: ExecutionConfig {
                mode: self.mode.unwrap_or_default(),
                threads: self.threads,
            },
            duplicate_ids: self.duplicate_ids.unwrap_or_default(),
            conformer_dir: self.conformer_dir,
        })
    }
}
