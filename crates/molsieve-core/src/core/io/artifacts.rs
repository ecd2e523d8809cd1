//! Per-record 3-D artefacts produced by an external conformer generator.
//!
//! Artefacts are PDB files named `<short-id>__<variant>.pdb`, whose first line
//! records the final structure notation of the generated conformer.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FINAL_STRUCTURE_PREFIX: &str = "REMARK Final SMILES string: ";
const ARTIFACT_EXTENSION: &str = ".pdb";
const VARIANT_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Conformer directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("Failed to read conformer artefact '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// The part of an identifier used in artefact file names: everything after
/// its last `)`.
pub fn short_id(identifier: &str) -> &str {
    identifier.rsplit(')').next().unwrap_or(identifier)
}

/// Artefact files belonging to `identifier`, sorted by file name.
pub fn find_artifacts(dir: &Path, identifier: &str) -> Result<Vec<PathBuf>, ReconcileError> {
    if !dir.is_dir() {
        return Err(ReconcileError::MissingDirectory(dir.to_path_buf()));
    }
    let prefix = format!("{}{VARIANT_SEPARATOR}", short_id(identifier));
    let io_err = |source| ReconcileError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(ARTIFACT_EXTENSION));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Reads the final structure notation from the first line of an artefact.
///
/// Returns `Ok(None)` when the first line does not carry the expected remark.
pub fn read_final_structure(path: &Path) -> Result<Option<String>, ReconcileError> {
    let io_err = |source| ReconcileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let first_line = BufReader::new(file).lines().next().transpose().map_err(io_err)?;

    Ok(first_line.and_then(|line| {
        line.strip_prefix(FINAL_STRUCTURE_PREFIX)
            .map(|rest| rest.trim().to_string())
    }))
}

/// File name of an artefact without its extension, used as the variant column
/// of reconciled output.
pub fn variant_name(path: &Path) -> String {
    path.file_stem()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
