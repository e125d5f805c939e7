//! Fetch errors: per-mirror failures and the aggregate returned when every
//! mirror has been tried.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::lock::LockError;
use crate::transport::TransportError;

/// Why one mirror attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("cannot resolve cache path")]
    CachePath(#[source] io::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// One failed mirror: the URL tried and what went wrong.
#[derive(Debug)]
pub struct MirrorFailure {
    pub url: String,
    pub error: AttemptError,
}

impl fmt::Display for MirrorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.error)?;
        let mut source = self.error.source();
        while let Some(e) = source {
            write!(f, ": {}", e)?;
            source = e.source();
        }
        Ok(())
    }
}

/// Error returned by [`MirrorFetcher::fetch`](super::MirrorFetcher::fetch).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The lock file could not be created or locked. Not a network problem;
    /// remaining mirrors are not tried.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// The caller aborted; remaining mirrors are not tried.
    #[error("fetch aborted")]
    Aborted,

    /// Every mirror failed. Lists each attempt in order.
    #[error("downloading failed for all {} url(s): {}", .attempts.len(), summarize(.attempts))]
    AllMirrorsExhausted { attempts: Vec<MirrorFailure> },
}

fn summarize(attempts: &[MirrorFailure]) -> String {
    if attempts.is_empty() {
        return "no urls to try".to_string();
    }
    attempts
        .iter()
        .enumerate()
        .map(|(i, a)| format!("[{}] {}", i + 1, a))
        .collect::<Vec<_>>()
        .join("; ")
}
