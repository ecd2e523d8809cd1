use crate::core::io::artifacts::{find_artifacts, read_final_structure, variant_name};
use crate::core::io::batch::BatchFile;
use crate::core::models::record::Record;
use crate::engine::error::EngineError;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Pairs each passed record with the structures of its 3-D artefacts.
///
/// Output records read `structure, identifier, variant`, following the order
/// of `passed` and, per record, the artefact file names. An identifier that
/// occurs more than once is reconciled only for its first occurrence.
#[instrument(skip_all, name = "reconcile_workflow")]
pub fn reconcile<'a>(
    passed: impl IntoIterator<Item = &'a Record>,
    conformer_dir: &Path,
) -> Result<Vec<Record>, EngineError> {
    let mut seen = HashSet::new();
    let mut reconciled = Vec::new();

    for record in passed {
        let identifier = record.identifier();
        if !seen.insert(identifier) {
            debug!(id = identifier, "Identifier already reconciled; skipping repeat.");
            continue;
        }

        let artifacts = find_artifacts(conformer_dir, identifier)?;
        if artifacts.is_empty() {
            debug!(id = identifier, "No conformer artefacts found.");
        }
        for path in artifacts {
            match read_final_structure(&path)? {
                Some(structure) => reconciled.push(
                    Record::bare(&structure, identifier).with_field(variant_name(&path)),
                ),
                None => warn!(
                    path = %path.display(),
                    "Artefact lacks a final-structure remark; skipping it."
                ),
            }
        }
    }

    info!(entries = reconciled.len(), "Reconciliation finished.");
    Ok(reconciled)
}

/// Reads a passed batch file, reconciles it and writes the result.
///
/// Returns the number of records written.
pub fn reconcile_file(
    passed_path: &Path,
    conformer_dir: &Path,
    output_path: &Path,
) -> Result<usize, EngineError> {
    if !passed_path.is_file() {
        return Err(EngineError::MissingSeedFile(passed_path.to_path_buf()));
    }
    let passed = BatchFile::read_from_path(passed_path).map_err(EngineError::batch(passed_path))?;
    let reconciled = reconcile(&passed, conformer_dir)?;
    BatchFile::write_to_path(&reconciled, output_path).map_err(EngineError::batch(output_path))?;
    Ok(reconciled.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn artefact(dir: &Path, name: &str, first_line: &str) {
        fs::write(dir.join(name), format!("{first_line}\nEND\n")).unwrap();
    }

    #[test]
    fn pairs_artifacts_with_original_identifiers() {
        let dir = tempdir().unwrap();
        artefact(dir.path(), "mol_a__2.pdb", "REMARK Final SMILES string: CC[NH3+]");
        artefact(dir.path(), "mol_a__1.pdb", "REMARK Final SMILES string: CCN");
        artefact(dir.path(), "mol_b__1.pdb", "REMARK Final SMILES string: c1ccccc1");

        let passed = vec![
            Record::bare("c1ccccc1", "(gen2)mol_b"),
            Record::bare("CCN", "mol_a"),
        ];
        let out = reconcile(&passed, dir.path()).unwrap();
        let rows: Vec<Vec<String>> = out.iter().map(|r| r.fields().to_vec()).collect();
        assert_eq!(
            rows,
            vec![
                vec!["c1ccccc1".to_string(), "(gen2)mol_b".into(), "mol_b__1".into()],
                vec!["CCN".to_string(), "mol_a".into(), "mol_a__1".into()],
                vec!["CC[NH3+]".to_string(), "mol_a".into(), "mol_a__2".into()],
            ]
        );
    }

    #[test]
    fn skips_artifacts_without_remark_and_repeated_ids() {
        let dir = tempdir().unwrap();
        artefact(dir.path(), "m__1.pdb", "HEADER no remark here");
        artefact(dir.path(), "m__2.pdb", "REMARK Final SMILES string: CO");

        let passed = vec![Record::bare("CO", "m"), Record::bare("OC", "m")];
        let out = reconcile(&passed, dir.path()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].structure(), "CO");
    }

    #[test]
    fn reconcile_file_writes_tab_separated_output() {
        let dir = tempdir().unwrap();
        let pdbs = dir.path().join("pdbs");
        fs::create_dir(&pdbs).unwrap();
        artefact(&pdbs, "x__1.pdb", "REMARK Final SMILES string: CCO");
        let passed = dir.path().join("passed.smi");
        fs::write(&passed, "CCO\tx\n").unwrap();
        let output = dir.path().join("passed_3d.smi");

        let written = reconcile_file(&passed, &pdbs, &output).unwrap();
        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "CCO\tx\tx__1\n");
    }

    #[test]
    fn missing_passed_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = reconcile_file(
            &dir.path().join("absent.smi"),
            dir.path(),
            &dir.path().join("out.smi"),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::MissingSeedFile(_)));
    }
}
