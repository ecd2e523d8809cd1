use clap::{Args, Parser, Subcommand, ValueEnum};
use molsieve::engine::config::ExecutionMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "molsieve - classify candidate molecules against drug-likeness and structural filter rules.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of worker threads for parallel classification.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize and classify every record of a seed batch, writing passed and failed batches.
    Screen(ScreenArgs),
    /// List the names of the registered filter rules.
    Filters,
    /// Attach externally generated 3-D conformer artefacts to a passed batch.
    Reconcile(ReconcileArgs),
}

/// Arguments for the `screen` subcommand.
#[derive(Args, Debug, Default)]
pub struct ScreenArgs {
    // --- Core Arguments ---
    /// Path to the seed batch (one `structure<TAB>identifier` record per line).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory receiving initial.smi, passed.smi and failed.smi.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Filter Overrides ---
    /// Apply the named filter rule. Can be used multiple times.
    #[arg(short = 'f', long = "filter", value_name = "NAME", conflicts_with = "no_filters")]
    pub filters: Vec<String>,

    /// Disable filtering entirely; every structure that normalizes passes.
    #[arg(long)]
    pub no_filters: bool,

    /// Tolerate up to N failing rules per structure instead of requiring all to pass.
    #[arg(long, value_name = "INT")]
    pub max_failures: Option<usize>,

    /// Drop unknown filter names with a warning instead of aborting the run.
    #[arg(long)]
    pub allow_unknown_filters: bool,

    // --- Execution Overrides ---
    /// Choose how records are distributed across workers.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Reconcile passed records against the PDB artefacts in this directory.
    #[arg(long, value_name = "DIR")]
    pub conformer_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S execution.mode=serial
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `reconcile` subcommand.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Path to a passed batch produced by `screen`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub passed: PathBuf,

    /// Directory holding `<short-id>__<variant>.pdb` artefacts.
    #[arg(short = 'd', long = "pdb-dir", required = true, value_name = "DIR")]
    pub pdb_dir: PathBuf,

    /// Path for the reconciled batch.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Serial,
    Parallel,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Serial => ExecutionMode::Serial,
            ModeArg::Parallel => ExecutionMode::Parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn screen_collects_repeated_filters_and_globals() {
        let cli = Cli::try_parse_from([
            "molsieve",
            "-vv",
            "-j",
            "4",
            "screen",
            "-i",
            "seed.smi",
            "-o",
            "out",
            "-f",
            "MozziconacciFilter",
            "--filter",
            "ReactiveGroupFilter",
            "--mode",
            "serial",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Screen(args) = cli.command else {
            panic!("expected the screen subcommand");
        };
        assert_eq!(args.input, PathBuf::from("seed.smi"));
        assert_eq!(
            args.filters,
            vec!["MozziconacciFilter".to_string(), "ReactiveGroupFilter".to_string()]
        );
        assert_eq!(args.mode, Some(ModeArg::Serial));
        assert!(!args.no_filters);
    }

    #[test]
    fn no_filters_conflicts_with_explicit_filters() {
        let result = Cli::try_parse_from([
            "molsieve",
            "screen",
            "-i",
            "seed.smi",
            "-o",
            "out",
            "-f",
            "MozziconacciFilter",
            "--no-filters",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["molsieve", "-q", "-v", "filters"]).is_err());
    }

    #[test]
    fn reconcile_requires_all_paths() {
        assert!(Cli::try_parse_from(["molsieve", "reconcile", "-p", "passed.smi"]).is_err());

        let cli = Cli::try_parse_from([
            "molsieve",
            "reconcile",
            "-p",
            "passed.smi",
            "-d",
            "pdbs",
            "-o",
            "passed_3d.smi",
        ])
        .unwrap();
        let Commands::Reconcile(args) = cli.command else {
            panic!("expected the reconcile subcommand");
        };
        assert_eq!(args.pdb_dir, PathBuf::from("pdbs"));
    }
}
