use super::report::Summary;
use crate::core::chem::StructureEngine;
use crate::core::filters::rule::Selection;
use crate::core::models::record::Record;
use crate::engine::config::CombinationPolicy;
use crate::engine::distributor::WorkDistributor;
use crate::engine::evaluator::evaluate_all;
use crate::engine::normalizer::Normalizer;
use crate::engine::outcome::Outcome;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use tracing::{debug, info, instrument};

/// A batch partitioned into outcome buckets.
///
/// Every input record lands in exactly one bucket. Within a bucket, records
/// keep their input order no matter in which order the work items finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedBatch {
    passed: Vec<(usize, Record)>,
    filter_failed: Vec<(usize, Record)>,
    sanitize_failed: Vec<(usize, Record)>,
}

impl ClassifiedBatch {
    fn bucket_mut(&mut self, outcome: Outcome) -> &mut Vec<(usize, Record)> {
        match outcome {
            Outcome::Passed => &mut self.passed,
            Outcome::FilterFailed => &mut self.filter_failed,
            Outcome::SanitizeFailed => &mut self.sanitize_failed,
        }
    }

    pub fn bucket(&self, outcome: Outcome) -> impl Iterator<Item = &Record> {
        let bucket = match outcome {
            Outcome::Passed => &self.passed,
            Outcome::FilterFailed => &self.filter_failed,
            Outcome::SanitizeFailed => &self.sanitize_failed,
        };
        bucket.iter().map(|(_, record)| record)
    }

    pub fn passed(&self) -> impl Iterator<Item = &Record> {
        self.bucket(Outcome::Passed)
    }

    pub fn filter_failed(&self) -> impl Iterator<Item = &Record> {
        self.bucket(Outcome::FilterFailed)
    }

    pub fn sanitize_failed(&self) -> impl Iterator<Item = &Record> {
        self.bucket(Outcome::SanitizeFailed)
    }

    /// Filter and sanitize failures merged back into input order.
    pub fn failed(&self) -> impl Iterator<Item = &Record> {
        self.filter_failed
            .iter()
            .merge_by(&self.sanitize_failed, |a, b| a.0 < b.0)
            .map(|(_, record)| record)
    }

    /// Outcome of the first record carrying `identifier`.
    pub fn outcome_of(&self, identifier: &str) -> Option<Outcome> {
        [Outcome::Passed, Outcome::FilterFailed, Outcome::SanitizeFailed]
            .into_iter()
            .filter_map(|outcome| {
                let bucket = match outcome {
                    Outcome::Passed => &self.passed,
                    Outcome::FilterFailed => &self.filter_failed,
                    Outcome::SanitizeFailed => &self.sanitize_failed,
                };
                bucket
                    .iter()
                    .find(|(_, record)| record.identifier() == identifier)
                    .map(|(seq, _)| (*seq, outcome))
            })
            .min_by_key(|&(seq, _)| seq)
            .map(|(_, outcome)| outcome)
    }

    pub fn len(&self) -> usize {
        self.passed.len() + self.filter_failed.len() + self.sanitize_failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.len(),
            passed: self.passed.len(),
            filter_failed: self.filter_failed.len(),
            sanitize_failed: self.sanitize_failed.len(),
        }
    }
}

/// Normalizes and evaluates one record.
pub fn classify_record<E: StructureEngine + ?Sized>(
    engine: &E,
    record: &Record,
    selection: Option<&Selection>,
    policy: CombinationPolicy,
) -> Outcome {
    match Normalizer::new(engine).normalize(record.structure()) {
        Ok(molecule) => Outcome::from_verdict(evaluate_all(engine, &molecule, selection, policy)),
        Err(err) => {
            debug!(id = record.identifier(), error = %err, "Record failed normalization.");
            Outcome::SanitizeFailed
        }
    }
}

/// Classifies every record of a batch through `distributor`.
///
/// Each record becomes one work item tagged with its input position; results
/// are partitioned by the returned `(item, outcome)` pairs, never by the
/// order in which the distributor hands them back.
#[instrument(skip_all, name = "classify_batch", fields(records = records.len()))]
pub fn classify_batch<E, D>(
    records: Vec<Record>,
    selection: Option<&Selection>,
    engine: &E,
    distributor: &D,
    policy: CombinationPolicy,
    reporter: &ProgressReporter,
) -> ClassifiedBatch
where
    E: StructureEngine + ?Sized,
    D: WorkDistributor,
{
    reporter.report(Progress::PhaseStart {
        name: "Classification",
    });
    reporter.report(Progress::TaskStart {
        total_steps: records.len() as u64,
    });

    let items: Vec<(usize, Record)> = records.into_iter().enumerate().collect();
    let results = distributor.run(items, |(_, record)| {
        let outcome = classify_record(engine, record, selection, policy);
        reporter.report(Progress::TaskIncrement);
        outcome
    });

    reporter.report(Progress::TaskFinish);

    let mut batch = ClassifiedBatch::default();
    for (item, outcome) in results {
        batch.bucket_mut(outcome).push(item);
    }
    for outcome in [Outcome::Passed, Outcome::FilterFailed, Outcome::SanitizeFailed] {
        batch.bucket_mut(outcome).sort_by_key(|(seq, _)| *seq);
    }

    info!(
        passed = batch.passed.len(),
        filter_failed = batch.filter_failed.len(),
        sanitize_failed = batch.sanitize_failed.len(),
        "Classification finished."
    );
    reporter.report(Progress::PhaseFinish);
    batch
}
