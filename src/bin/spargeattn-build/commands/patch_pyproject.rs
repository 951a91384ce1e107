//! `spargeattn-build patch-pyproject` command

use anyhow::Result;

use crate::cli::PatchPyprojectArgs;
use spargeattn_build::ops::patch_pyproject::patch_pyproject;

pub fn execute(args: PatchPyprojectArgs) -> Result<()> {
    let outcome = patch_pyproject(
        &args.manifest_path,
        &args.pytorch_version,
        &args.cuda_version,
    )?;

    println!(
        "Updated {} for PyTorch {} with CUDA {} ({})",
        args.manifest_path.display(),
        args.pytorch_version,
        args.cuda_version,
        outcome
    );

    Ok(())
}
