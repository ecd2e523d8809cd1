use crate::cli::ReconcileArgs;
use crate::error::Result;
use molsieve::workflows::reconcile::reconcile_file;
use tracing::info;

pub async fn run(args: ReconcileArgs) -> Result<()> {
    info!(
        "Reconciling {} against artefacts in {}",
        args.passed.display(),
        args.pdb_dir.display()
    );

    let written = tokio::task::block_in_place(|| {
        reconcile_file(&args.passed, &args.pdb_dir, &args.output)
    })?;

    println!(
        "✓ {} reconciled record(s) written to: {}",
        written,
        args.output.display()
    );
    Ok(())
}
