//! `artifetch resolve`: validate an artifact description and print its checksum.

use anyhow::{Context, Result};
use artifetch_core::config::{ArtifactConfig, FetchConfig};
use artifetch_core::transport::CurlTransport;
use std::path::Path;

pub async fn run_resolve(cfg: &FetchConfig, artifact: &Path) -> Result<()> {
    let artifact_cfg = ArtifactConfig::load(artifact)?;
    let transport = CurlTransport::new(cfg.curl_options());

    let prepared = tokio::task::spawn_blocking(move || artifact_cfg.prepare(&transport))
        .await
        .context("resolve task failed")?
        .context("invalid artifact configuration")?;

    for w in &prepared.warnings {
        eprintln!("warning: {}", w);
    }
    match prepared.checksum.directive() {
        Some(directive) => println!("{}", directive),
        None => println!("{}", prepared.checksum.algorithm),
    }
    for url in prepared.qualified_urls()? {
        tracing::debug!(%url, "qualified source");
    }
    Ok(())
}
