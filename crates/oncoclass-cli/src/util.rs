use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use oncoclass_mutations::reference::ReferenceGeneSets;

/// Inputs are read tab-separated, so only tab-separated extensions pass.
pub fn validate_tsv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("txt") => {}
        _ => anyhow::bail!("File must be tab-separated with a .tsv or .txt extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Load the oncogene and TSG lists (and optionally the SMG list).
pub fn load_reference(
    oncogenes: &Path,
    tsgs: &Path,
    smgs: Option<&Path>,
) -> Result<ReferenceGeneSets> {
    let reference = ReferenceGeneSets::from_files(oncogenes, tsgs, smgs).with_context(|| {
        format!(
            "Failed to load reference gene lists {} / {}",
            oncogenes.display(),
            tsgs.display()
        )
    })?;
    log::info!(
        "Reference lists: {} oncogenes, {} TSGs, {} SMGs",
        reference.oncogenes().len(),
        reference.tsgs().len(),
        reference.smgs().len()
    );
    Ok(reference)
}
