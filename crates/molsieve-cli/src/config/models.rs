use molsieve::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    /// The TOML file that contributed to this configuration, if any.
    pub config_file: Option<PathBuf>,
    pub core_config: core_config::ScreeningConfig,
}
