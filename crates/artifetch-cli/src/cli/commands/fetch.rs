//! `artifetch fetch`: resolve, qualify, and fetch one artifact.

use anyhow::{Context, Result};
use artifetch_core::cache::CacheDir;
use artifetch_core::config::{ArtifactConfig, FetchConfig};
use artifetch_core::control::AbortToken;
use artifetch_core::fetch::{FetchOutcome, MirrorFetcher};
use artifetch_core::progress::ProgressSink;
use artifetch_core::transport::CurlTransport;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::progress::StderrSink;

/// Command-line values that take precedence over the artifact file.
#[derive(Debug, Default)]
pub struct FetchOverrides {
    pub target_path: Option<PathBuf>,
    pub description: Option<String>,
}

impl FetchOverrides {
    fn apply(self, artifact: &mut ArtifactConfig) {
        if self.target_path.is_some() {
            artifact.target_path = self.target_path;
        }
        if self.description.is_some() {
            artifact.description = self.description;
        }
    }
}

pub async fn run_fetch(cfg: &FetchConfig, artifact: &Path, overrides: FetchOverrides) -> Result<()> {
    let mut artifact_cfg = ArtifactConfig::load(artifact)?;
    overrides.apply(&mut artifact_cfg);

    let cache = CacheDir::from_env(cfg).context("resolving cache directory")?;
    tracing::debug!(cache = %cache.root().display(), "using cache directory");

    let abort = AbortToken::new();
    let interrupt = tokio::spawn({
        let abort = abort.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted; aborting transfer");
                abort.abort();
            }
        }
    });

    let sink = Arc::new(StderrSink::new());
    let transport = CurlTransport::new(cfg.curl_options())
        .with_abort(abort.clone())
        .with_progress(sink.clone());

    let result = tokio::task::spawn_blocking(move || -> Result<FetchOutcome> {
        let prepared = artifact_cfg
            .prepare(&transport)
            .context("invalid artifact configuration")?;
        for w in &prepared.warnings {
            sink.say(&format!("warning: {}", w));
        }
        let urls = prepared.qualified_urls()?;
        let fetcher = MirrorFetcher::new(transport, cache)
            .with_progress(sink)
            .with_abort(abort)
            .with_description(prepared.description.clone());
        Ok(fetcher.fetch(&urls, &prepared.target)?)
    })
    .await;
    interrupt.abort();

    let outcome = result.context("fetch task failed")??;
    tracing::info!(url = %outcome.url, path = %outcome.local_path.display(), "fetch complete");
    println!("{}", outcome.local_path.display());
    Ok(())
}
