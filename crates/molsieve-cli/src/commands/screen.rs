use crate::cli::ScreenArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::ui::{CliProgressHandler, UiEvent};
use molsieve::{
    core::{chem::basic::BasicEngine, filters::registry::FilterRegistry},
    engine::progress::ProgressReporter,
    workflows,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run(
    args: ScreenArgs,
    threads: Option<usize>,
    ui_sender: mpsc::UnboundedSender<UiEvent>,
) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app_config = build_config(&args, threads)?;
    if let Some(path) = &app_config.config_file {
        info!("Configuration file: {}", path.display());
    }
    let config = app_config.core_config;

    let registry = FilterRegistry::with_defaults();
    let engine = BasicEngine::new();

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Screening {}...", config.seed_path.display());
    info!("Invoking the core screening workflow...");

    let report = tokio::task::block_in_place(|| {
        workflows::screen::run(&config, &registry, &engine, &reporter)
    })?;

    if report.summary.total == 0 {
        warn!("Seed batch contained no records.");
    }

    println!("{}", report.summary);
    println!("Passed records written to: {}", report.outputs.passed.display());
    println!("Failed records written to: {}", report.outputs.failed.display());
    if let Some(path) = &report.outputs.reconciled {
        println!("Reconciled 3-D records written to: {}", path.display());
    }

    Ok(())
}
