use super::defaults::DefaultsConfig;
use super::file::{FileCombination, FileConfig, FileFiltersConfig};
use super::models::AppConfig;
use crate::cli::ScreenArgs;
use crate::error::{CliError, Result};
use molsieve::engine::config as core_config;
use serde::de::{DeserializeOwned, IntoDeserializer, value};
use std::path::PathBuf;

/// Merges built-in defaults, the optional config file, `-S` overrides and
/// command-line flags, in increasing order of precedence.
pub fn build_config(args: &ScreenArgs, threads: Option<usize>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let filters_file = file_config.filters.take().unwrap_or_default();
    let execution_file = file_config.execution.take().unwrap_or_default();
    let records_file = file_config.records.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let requested = if args.no_filters {
        None
    } else if !args.filters.is_empty() {
        Some(args.filters.clone())
    } else {
        filters_file.names.clone()
    };

    let unknown_filters = if args.allow_unknown_filters {
        core_config::UnknownFilterPolicy::Warn
    } else {
        filters_file
            .unknown_names
            .map(Into::into)
            .unwrap_or(defaults.unknown_names)
    };

    let combination = merge_combination(args.max_failures, &filters_file, &defaults)?;

    let mode = args
        .mode
        .map(Into::into)
        .or(execution_file.mode.map(Into::into))
        .unwrap_or(defaults.mode);

    let duplicate_ids = records_file
        .duplicate_ids
        .map(Into::into)
        .unwrap_or(defaults.duplicate_ids);

    let mut builder = core_config::ScreeningConfigBuilder::new()
        .seed_path(args.input.clone())
        .output_dir(args.output.clone())
        .unknown_filters(unknown_filters)
        .combination(combination)
        .mode(mode)
        .duplicate_ids(duplicate_ids);

    if let Some(names) = requested {
        builder = builder.filters(names);
    }
    if let Some(n) = threads.or(execution_file.threads) {
        builder = builder.threads(n);
    }
    if let Some(dir) = args.conformer_dir.clone().or(output_file.conformer_dir) {
        builder = builder.conformer_dir(dir);
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        config_file: args.config.clone(),
        core_config,
    })
}

fn merge_combination(
    cli_max_failures: Option<usize>,
    file: &FileFiltersConfig,
    defaults: &DefaultsConfig,
) -> Result<core_config::CombinationPolicy> {
    if let Some(max_failures) = cli_max_failures {
        return Ok(lenient_or_strict(max_failures));
    }
    match (file.combination, file.max_failures) {
        (Some(FileCombination::Strict), Some(_)) => Err(CliError::Config(
            "`max-failures` requires `combination = \"lenient\"`".to_string(),
        )),
        (Some(FileCombination::Strict), None) | (None, None) => {
            Ok(core_config::CombinationPolicy::Strict)
        }
        (Some(FileCombination::Lenient), limit) => Ok(core_config::CombinationPolicy::Lenient {
            max_failures: limit.unwrap_or(defaults.lenient_max_failures),
        }),
        (None, Some(limit)) => Ok(lenient_or_strict(limit)),
    }
}

fn lenient_or_strict(max_failures: usize) -> core_config::CombinationPolicy {
    if max_failures == 0 {
        core_config::CombinationPolicy::Strict
    } else {
        core_config::CombinationPolicy::Lenient { max_failures }
    }
}

fn parse_choice<T: DeserializeOwned>(key: &str, value_str: &str) -> Result<T> {
    let de: value::StrDeserializer<'_, value::Error> = value_str.into_deserializer();
    T::deserialize(de).map_err(|e| {
        CliError::Config(format!("Invalid value for {}: {} ({})", key, value_str, e))
    })
}

fn parse_integer(key: &str, value_str: &str) -> Result<usize> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "filters.names" => {
                let names = value_str
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect();
                config.filters.get_or_insert_with(Default::default).names = Some(names);
            }
            "filters.unknown-names" => {
                config.filters.get_or_insert_with(Default::default).unknown_names =
                    Some(parse_choice(key, value_str)?);
            }
            "filters.combination" => {
                config.filters.get_or_insert_with(Default::default).combination =
                    Some(parse_choice(key, value_str)?);
            }
            "filters.max-failures" => {
                config.filters.get_or_insert_with(Default::default).max_failures =
                    Some(parse_integer(key, value_str)?);
            }
            "execution.mode" => {
                config.execution.get_or_insert_with(Default::default).mode =
                    Some(parse_choice(key, value_str)?);
            }
            "execution.threads" => {
                config.execution.get_or_insert_with(Default::default).threads =
                    Some(parse_integer(key, value_str)?);
            }
            "records.duplicate-ids" => {
                config.records.get_or_insert_with(Default::default).duplicate_ids =
                    Some(parse_choice(key, value_str)?);
            }
            "output.conformer-dir" => {
                config.output.get_or_insert_with(Default::default).conformer_dir =
                    Some(PathBuf::from(value_str));
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;
    use molsieve::engine::config::{
        CombinationPolicy, DuplicateIdPolicy, ExecutionMode, UnknownFilterPolicy,
    };
    use std::fs;
    use tempfile::tempdir;

    fn base_screen_args() -> ScreenArgs {
        ScreenArgs {
            input: PathBuf::from("seed.smi"),
            output: PathBuf::from("out"),
            ..Default::default()
        }
    }

    fn write_config(dir: &tempfile::TempDir, toml: &str) -> PathBuf {
        let path = dir.path().join("molsieve.toml");
        fs::write(&path, toml).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = build_config(&base_screen_args(), None).expect("build ok");
        let cfg = app.core_config;

        assert_eq!(cfg.seed_path, PathBuf::from("seed.smi"));
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.filters.requested, None);
        assert_eq!(cfg.filters.unknown_names, UnknownFilterPolicy::Reject);
        assert_eq!(cfg.filters.combination, CombinationPolicy::Strict);
        assert_eq!(cfg.execution.mode, ExecutionMode::Parallel);
        assert_eq!(cfg.execution.threads, None);
        assert_eq!(cfg.duplicate_ids, DuplicateIdPolicy::Warn);
        assert_eq!(cfg.conformer_dir, None);
        assert!(app.config_file.is_none());
    }

    #[test]
    fn build_config_reads_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [filters]
            names = ["MozziconacciFilter"]
            unknown-names = "warn"
            combination = "lenient"
            max-failures = 2

            [execution]
            mode = "serial"
            threads = 3

            [records]
            duplicate-ids = "reject"

            [output]
            conformer-dir = "pdbs"
            "#,
        );
        let mut args = base_screen_args();
        args.config = Some(path.clone());

        let app = build_config(&args, None).expect("build ok");
        let cfg = app.core_config;

        assert_eq!(app.config_file, Some(path));
        assert_eq!(
            cfg.filters.requested,
            Some(vec!["MozziconacciFilter".to_string()])
        );
        assert_eq!(cfg.filters.unknown_names, UnknownFilterPolicy::Warn);
        assert_eq!(
            cfg.filters.combination,
            CombinationPolicy::Lenient { max_failures: 2 }
        );
        assert_eq!(cfg.execution.mode, ExecutionMode::Serial);
        assert_eq!(cfg.execution.threads, Some(3));
        assert_eq!(cfg.duplicate_ids, DuplicateIdPolicy::Reject);
        assert_eq!(cfg.conformer_dir, Some(PathBuf::from("pdbs")));
    }

    #[test]
    fn cli_overrides_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [filters]
            names = ["MozziconacciFilter"]
            [execution]
            mode = "serial"
            threads = 3
            "#,
        );
        let mut args = base_screen_args();
        args.config = Some(path);
        args.filters = vec!["ReactiveGroupFilter".to_string()];
        args.mode = Some(ModeArg::Parallel);
        args.max_failures = Some(1);
        args.allow_unknown_filters = true;
        args.conformer_dir = Some(PathBuf::from("elsewhere"));

        let cfg = build_config(&args, Some(8)).expect("build ok").core_config;

        assert_eq!(
            cfg.filters.requested,
            Some(vec!["ReactiveGroupFilter".to_string()])
        );
        assert_eq!(cfg.filters.unknown_names, UnknownFilterPolicy::Warn);
        assert_eq!(
            cfg.filters.combination,
            CombinationPolicy::Lenient { max_failures: 1 }
        );
        assert_eq!(cfg.execution.mode, ExecutionMode::Parallel);
        assert_eq!(cfg.execution.threads, Some(8));
        assert_eq!(cfg.conformer_dir, Some(PathBuf::from("elsewhere")));
    }

    #[test]
    fn no_filters_flag_overrides_file_names() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, "[filters]\nnames = [\"MozziconacciFilter\"]\n");
        let mut args = base_screen_args();
        args.config = Some(path);
        args.no_filters = true;

        let cfg = build_config(&args, None).expect("build ok").core_config;
        assert_eq!(cfg.filters.requested, None);
    }

    #[test]
    fn zero_max_failures_is_strict() {
        let mut args = base_screen_args();
        args.max_failures = Some(0);

        let cfg = build_config(&args, None).expect("build ok").core_config;
        assert_eq!(cfg.filters.combination, CombinationPolicy::Strict);
    }

    #[test]
    fn strict_combination_with_limit_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            "[filters]\ncombination = \"strict\"\nmax-failures = 2\n",
        );
        let mut args = base_screen_args();
        args.config = Some(path);

        assert!(matches!(
            build_config(&args, None),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn set_values_override_file_layer() {
        let mut args = base_screen_args();
        args.set_values = vec![
            "filters.names=MozziconacciFilter, ReactiveGroupFilter".to_string(),
            "filters.unknown-names=warn".to_string(),
            "filters.combination=lenient".to_string(),
            "filters.max-failures=1".to_string(),
            "execution.mode=serial".to_string(),
            "execution.threads=2".to_string(),
            "records.duplicate-ids=allow".to_string(),
            "output.conformer-dir=pdbs".to_string(),
        ];

        let cfg = build_config(&args, None).expect("build ok").core_config;

        assert_eq!(
            cfg.filters.requested,
            Some(vec![
                "MozziconacciFilter".to_string(),
                "ReactiveGroupFilter".to_string()
            ])
        );
        assert_eq!(cfg.filters.unknown_names, UnknownFilterPolicy::Warn);
        assert_eq!(
            cfg.filters.combination,
            CombinationPolicy::Lenient { max_failures: 1 }
        );
        assert_eq!(cfg.execution.mode, ExecutionMode::Serial);
        assert_eq!(cfg.execution.threads, Some(2));
        assert_eq!(cfg.duplicate_ids, DuplicateIdPolicy::Allow);
        assert_eq!(cfg.conformer_dir, Some(PathBuf::from("pdbs")));
    }

    #[test]
    fn set_values_reject_bad_input() {
        for bad in [
            "execution.mode",
            "execution.mode=distributed",
            "execution.threads=many",
            "logging.level=debug",
        ] {
            let mut args = base_screen_args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args, None), Err(CliError::Config(_))),
                "expected a config error for {bad}"
            );
        }
    }

    #[test]
    fn zero_threads_is_a_config_error() {
        let args = base_screen_args();
        assert!(matches!(
            build_config(&args, Some(0)),
            Err(CliError::Config(_))
        ));
    }
}
