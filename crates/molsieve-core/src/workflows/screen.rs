use super::classify::{ClassifiedBatch, classify_batch};
use super::reconcile::reconcile;
use super::report::Summary;
use crate::core::chem::StructureEngine;
use crate::core::filters::registry::FilterRegistry;
use crate::core::io::batch::BatchFile;
use crate::core::models::record::Record;
use crate::engine::config::{DuplicateIdPolicy, ScreeningConfig};
use crate::engine::distributor::{Distributor, WorkDistributor};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

pub const INITIAL_FILE: &str = "initial.smi";
pub const PASSED_FILE: &str = "passed.smi";
pub const FAILED_FILE: &str = "failed.smi";
pub const RECONCILED_FILE: &str = "passed_3d.smi";

/// Files written by a screening run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub initial: PathBuf,
    pub passed: PathBuf,
    pub failed: PathBuf,
    pub reconciled: Option<PathBuf>,
}

impl OutputFiles {
    fn in_dir(dir: &Path) -> Self {
        Self {
            initial: dir.join(INITIAL_FILE),
            passed: dir.join(PASSED_FILE),
            failed: dir.join(FAILED_FILE),
            reconciled: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreeningReport {
    pub summary: Summary,
    pub batch: ClassifiedBatch,
    pub outputs: OutputFiles,
}

/// Runs a complete screening: load, select, classify, write, summarize and,
/// when a conformer directory is configured, reconcile.
///
/// Nothing is dispatched or written unless the seed file exists, the filter
/// selection resolves and the identifier policy is satisfied.
#[instrument(skip_all, name = "screening_workflow")]
pub fn run<E: StructureEngine + ?Sized>(
    config: &ScreeningConfig,
    registry: &FilterRegistry,
    engine: &E,
    reporter: &ProgressReporter,
) -> Result<ScreeningReport, EngineError> {
    // === Phase 1: Load the seed batch and resolve the filter selection ===
    reporter.report(Progress::PhaseStart { name: "Loading" });
    if !config.seed_path.is_file() {
        return Err(EngineError::MissingSeedFile(config.seed_path.clone()));
    }

    let selection = registry.build_selection(
        config.filters.requested.as_deref(),
        config.filters.unknown_names,
    )?;
    match &selection {
        None => info!("No filters requested; every valid structure will pass."),
        Some(selection) if selection.is_empty() => {
            warn!("None of the requested filters is registered; every valid structure will pass.")
        }
        Some(selection) => info!(filters = ?selection, "Filters selected."),
    }

    let records = BatchFile::read_from_path(&config.seed_path)
        .map_err(EngineError::batch(&config.seed_path))?;
    info!(records = records.len(), seed = %config.seed_path.display(), "Seed batch loaded.");
    check_duplicates(&records, config.duplicate_ids)?;

    let mut outputs = OutputFiles::in_dir(&config.output_dir);
    fs::create_dir_all(&config.output_dir).map_err(|source| EngineError::OutputDirectory {
        path: config.output_dir.clone(),
        source,
    })?;
    BatchFile::write_to_path(&records, &outputs.initial)
        .map_err(EngineError::batch(&outputs.initial))?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Classify ===
    let distributor = Distributor::from_mode(config.execution.mode, config.execution.threads)?;
    let batch = classify_batch(
        records,
        selection.as_ref(),
        engine,
        &distributor,
        config.filters.combination,
        reporter,
    );
    distributor.shutdown();

    // === Phase 3: Persist buckets and summarize ===
    reporter.report(Progress::PhaseStart {
        name: "Writing Results",
    });
    BatchFile::write_to_path(batch.passed(), &outputs.passed)
        .map_err(EngineError::batch(&outputs.passed))?;
    BatchFile::write_to_path(batch.failed(), &outputs.failed)
        .map_err(EngineError::batch(&outputs.failed))?;
    let summary = batch.summary();
    summary.log();
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Reconcile 3-D artefacts (optional) ===
    if let Some(conformer_dir) = &config.conformer_dir {
        reporter.report(Progress::PhaseStart {
            name: "Reconciliation",
        });
        let reconciled = reconcile(batch.passed(), conformer_dir)?;
        let path = config.output_dir.join(RECONCILED_FILE);
        BatchFile::write_to_path(&reconciled, &path).map_err(EngineError::batch(&path))?;
        outputs.reconciled = Some(path);
        reporter.report(Progress::PhaseFinish);
    }

    Ok(ScreeningReport {
        summary,
        batch,
        outputs,
    })
}

fn check_duplicates(records: &[Record], policy: DuplicateIdPolicy) -> Result<(), EngineError> {
    if policy == DuplicateIdPolicy::Allow {
        return Ok(());
    }
    let duplicates: Vec<String> = records
        .iter()
        .map(Record::identifier)
        .duplicates()
        .map(str::to_string)
        .collect();
    if duplicates.is_empty() {
        return Ok(());
    }

    match policy {
        DuplicateIdPolicy::Reject => Err(EngineError::DuplicateIdentifiers(duplicates)),
        _ => {
            warn!(
                count = duplicates.len(),
                ids = %duplicates.join(", "),
                "Seed batch repeats identifiers; only the first occurrence is reconciled."
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> Vec<Record> {
        ids.iter().map(|id| Record::bare("C", id)).collect()
    }

    #[test]
    fn duplicates_are_rejected_under_reject_policy() {
        let err = check_duplicates(&records(&["a", "b", "a", "b", "a"]), DuplicateIdPolicy::Reject)
            .unwrap_err();
        match err {
            EngineError::DuplicateIdentifiers(ids) => assert_eq!(ids, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicates_pass_under_warn_and_allow() {
        let batch = records(&["a", "a"]);
        assert!(check_duplicates(&batch, DuplicateIdPolicy::Warn).is_ok());
        assert!(check_duplicates(&batch, DuplicateIdPolicy::Allow).is_ok());
    }

    #[test]
    fn unique_ids_pass_every_policy() {
        let batch = records(&["a", "b"]);
        assert!(check_duplicates(&batch, DuplicateIdPolicy::Reject).is_ok());
    }
}
