//! Mirror fetcher: tries each qualified URL in order, under an exclusive lock
//! on the target, until one retrieval succeeds.
//!
//! Mirrors are tried strictly one after another, never concurrently. The only
//! coordination between independent invocations (other threads or other
//! processes sharing the cache) is the `<target>.lock` file.

mod error;
mod target;

pub use error::{AttemptError, FetchError, MirrorFailure};
pub use target::{TargetDescriptor, DEFAULT_EXTENSION};

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::CacheDir;
use crate::control::AbortToken;
use crate::lock;
use crate::progress::{NoopSink, ProgressSink};
use crate::transport::{Transport, TransportError};

/// Successful fetch: where the artifact is and which URL produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub local_path: PathBuf,
    pub url: String,
}

/// Retrieves an artifact from the first working mirror.
pub struct MirrorFetcher<T> {
    transport: T,
    cache: CacheDir,
    progress: Arc<dyn ProgressSink>,
    description: String,
    abort: AbortToken,
}

impl<T: Transport> MirrorFetcher<T> {
    pub fn new(transport: T, cache: CacheDir) -> Self {
        Self {
            transport,
            cache,
            progress: Arc::new(NoopSink),
            description: "artifact".to_string(),
            abort: AbortToken::new(),
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Token checked before each attempt; share it with the transport so a
    /// running transfer stops too.
    pub fn with_abort(mut self, abort: AbortToken) -> Self {
        self.abort = abort;
        self
    }

    /// Short description used in the "Retrieving ..." notice (e.g. "ISO").
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Tries `qualified_urls` in order and stops at the first success.
    ///
    /// Per URL: derive the target path, lock `<target>.lock`, retrieve, unlock.
    /// A failed attempt is recorded and the next URL is tried; once all have
    /// failed the error lists every attempt. A lock failure or an abort ends
    /// the loop immediately.
    pub fn fetch(
        &self,
        qualified_urls: &[String],
        target: &TargetDescriptor,
    ) -> Result<FetchOutcome, FetchError> {
        self.progress
            .say(&format!("Retrieving {}", self.description));

        let mut attempts = Vec::new();
        for url in qualified_urls {
            if self.abort.is_aborted() {
                tracing::info!(url = %url, "abort requested, not trying remaining mirrors");
                return Err(FetchError::Aborted);
            }

            let target_path = match target.path_for(url, &self.cache) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(url = %url, "cannot resolve cache path: {}", e);
                    attempts.push(MirrorFailure {
                        url: url.clone(),
                        error: AttemptError::CachePath(e),
                    });
                    continue;
                }
            };

            let lock_file = lock::lock_path(&target_path);
            tracing::debug!(url = %url, lock = %lock_file.display(), "acquiring lock for attempt");
            let result = lock::with_exclusive_lock(&lock_file, || {
                self.progress.say(&format!("Trying {}", url));
                self.transport.get_file(&target_path, url)
            })?;

            match result {
                Ok(()) => {
                    self.progress
                        .say(&format!("{} => {}", url, target_path.display()));
                    return Ok(FetchOutcome {
                        local_path: target_path,
                        url: url.clone(),
                    });
                }
                Err(TransportError::Aborted) => {
                    tracing::info!(url = %url, "transfer aborted");
                    return Err(FetchError::Aborted);
                }
                Err(e) => {
                    tracing::warn!(url = %url, "mirror failed: {}", e);
                    attempts.push(MirrorFailure {
                        url: url.clone(),
                        error: AttemptError::Transport(e),
                    });
                }
            }
        }

        Err(FetchError::AllMirrorsExhausted { attempts })
    }
}
