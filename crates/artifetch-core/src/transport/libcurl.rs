//! libcurl-backed transport (http, https, file, and anything else curl speaks).
//!
//! Streams the body into `<dst>.part`, verifies the `checksum` directive, then
//! renames onto `dst`. Runs in the current thread; call from `spawn_blocking`
//! if used from async code.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{Transport, TransportError};
use crate::checksum::ExpectedDigest;
use crate::control::AbortToken;
use crate::progress::{ProgressSink, TransferStats};
use crate::storage::{self, PartFile};
use crate::url_model::split_checksum;

/// Per-transfer curl settings (usually built from `FetchConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer limit; `None` means unbounded.
    pub timeout: Option<Duration>,
    /// Abort when slower than this many bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirections: u32,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Some(Duration::from_secs(3600)),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_redirections: 10,
        }
    }
}

/// [`Transport`] implemented with the `curl` crate.
#[derive(Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
    abort: Option<AbortToken>,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self {
            options,
            abort: None,
            progress: None,
        }
    }

    /// Stop transfers once `token` is set.
    pub fn with_abort(mut self, token: AbortToken) -> Self {
        self.abort = Some(token);
        self
    }

    /// Report byte progress to `sink`.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Runs the transfer, streaming into `part`.
    fn perform(&self, url: &url::Url, part: &mut PartFile) -> Result<(), TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(self.options.max_redirections)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.low_speed_limit(self.options.low_speed_limit)?;
        easy.low_speed_time(self.options.low_speed_time)?;
        if let Some(t) = self.options.timeout {
            easy.timeout(t)?;
        }
        easy.progress(true)?;

        let started = Instant::now();
        let mut write_err: Option<std::io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match part.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.progress_function(|dltotal, dlnow, _, _| {
                if self.abort.as_ref().is_some_and(AbortToken::is_aborted) {
                    return false;
                }
                if let Some(sink) = &self.progress {
                    let stats = TransferStats {
                        bytes_done: dlnow as u64,
                        total_bytes: (dltotal > 0.0).then_some(dltotal as u64),
                        elapsed_secs: started.elapsed().as_secs_f64(),
                    };
                    sink.transfer(url.as_str(), &stats);
                }
                true
            })?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if let Some(io) = write_err {
                return Err(TransportError::Io(io));
            }
            if e.is_aborted_by_callback() {
                return Err(TransportError::Aborted);
            }
            return Err(TransportError::Curl(e));
        }

        if matches!(url.scheme(), "http" | "https") {
            let code = easy.response_code()?;
            if !(200..300).contains(&code) {
                return Err(TransportError::Http(code));
            }
        }
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn get_file(&self, dst: &Path, url: &str) -> Result<(), TransportError> {
        let (request_url, directive) =
            split_checksum(url).map_err(|source| TransportError::InvalidUrl {
                url: url.to_string(),
                source,
            })?;
        let expected = directive
            .as_deref()
            .map(ExpectedDigest::from_directive)
            .transpose()?;

        if let Some(exp) = &expected {
            if dst.is_file() {
                match exp.check_path(dst)? {
                    Ok(()) => {
                        tracing::info!(dst = %dst.display(), "existing file matches checksum; reusing");
                        return Ok(());
                    }
                    Err(actual) => {
                        tracing::debug!(dst = %dst.display(), %actual, "existing file does not match; downloading again");
                    }
                }
            }
        }

        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut part = PartFile::create(&storage::temp_path(dst))?;
        tracing::debug!(url = %request_url, part = %part.temp_path().display(), "transfer started");

        if let Err(e) = self.perform(&request_url, &mut part) {
            part.discard();
            return Err(e);
        }
        if let Err(e) = part.sync() {
            part.discard();
            return Err(e.into());
        }

        if let Some(exp) = &expected {
            let verdict = match exp.check_path(part.temp_path()) {
                Ok(v) => v,
                Err(e) => {
                    part.discard();
                    return Err(e.into());
                }
            };
            if let Err(actual) = verdict {
                part.discard();
                return Err(TransportError::ChecksumMismatch {
                    algorithm: exp.algorithm,
                    expected: exp.digest.clone(),
                    actual,
                });
            }
            tracing::debug!(algorithm = %exp.algorithm, "checksum verified");
        }

        let bytes = part.bytes_written();
        part.finalize(dst)?;
        tracing::info!(dst = %dst.display(), bytes, "transfer complete");
        Ok(())
    }
}
