//! Transport error type.

use crate::checksum::{ChecksumAlgorithm, DirectiveError};

/// Error returned by a single retrieval (curl failure, HTTP error, checksum
/// mismatch, or local I/O). One mirror failing with any of these is recovered
/// by moving on to the next mirror.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid checksum directive")]
    InvalidChecksum(#[from] DirectiveError),
    /// Curl reported an error (timeout, connection, unsupported scheme, etc.).
    #[error("curl")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The downloaded bytes do not hash to the expected digest.
    #[error("{algorithm} checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        algorithm: ChecksumAlgorithm,
        expected: String,
        actual: String,
    },
    /// Disk/storage failure (e.g. disk full, permission denied).
    #[error("storage")]
    Io(#[from] std::io::Error),
    /// Stopped through the abort token.
    #[error("transfer aborted")]
    Aborted,
}
