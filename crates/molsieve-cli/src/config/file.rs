use crate::error::{CliError, Result};
use molsieve::engine::config as core_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileUnknownNames {
    Reject,
    Warn,
}

impl From<FileUnknownNames> for core_config::UnknownFilterPolicy {
    fn from(p: FileUnknownNames) -> Self {
        match p {
            FileUnknownNames::Reject => Self::Reject,
            FileUnknownNames::Warn => Self::Warn,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileCombination {
    Strict,
    Lenient,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileExecutionMode {
    Serial,
    Parallel,
}

impl From<FileExecutionMode> for core_config::ExecutionMode {
    fn from(m: FileExecutionMode) -> Self {
        match m {
            FileExecutionMode::Serial => Self::Serial,
            FileExecutionMode::Parallel => Self::Parallel,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileDuplicateIds {
    Allow,
    Warn,
    Reject,
}

impl From<FileDuplicateIds> for core_config::DuplicateIdPolicy {
    fn from(p: FileDuplicateIds) -> Self {
        match p {
            FileDuplicateIds::Allow => Self::Allow,
            FileDuplicateIds::Warn => Self::Warn,
            FileDuplicateIds::Reject => Self::Reject,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFiltersConfig {
    pub names: Option<Vec<String>>,
    pub unknown_names: Option<FileUnknownNames>,
    pub combination: Option<FileCombination>,
    pub max_failures: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileExecutionConfig {
    pub mode: Option<FileExecutionMode>,
    pub threads: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileRecordsConfig {
    pub duplicate_ids: Option<FileDuplicateIds>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub conformer_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub filters: Option<FileFiltersConfig>,
    pub execution: Option<FileExecutionConfig>,
    pub records: Option<FileRecordsConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
