//! Checksum command: compute the digest of a file.

use anyhow::{bail, Context, Result};
use artifetch_core::checksum::{self, ChecksumAlgorithm};
use std::path::Path;

/// Compute and print `<digest>  <path>` for the given file.
pub async fn run_checksum(path: &Path, checksum_type: &str) -> Result<()> {
    let algorithm: ChecksumAlgorithm = checksum_type.parse()?;
    if algorithm.is_none() {
        bail!("checksum type 'none' has no digest");
    }
    let digest = checksum::digest_path(algorithm, path)
        .with_context(|| format!("reading {}", path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
