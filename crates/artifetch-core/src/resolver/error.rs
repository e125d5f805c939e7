//! Configuration errors raised while resolving sources and checksums.

use crate::checksum::{ChecksumAlgorithm, DirectiveError, UnknownAlgorithm};
use crate::transport::TransportError;

/// Fatal configuration problem. Reported before any artifact transfer starts;
/// never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("only one of single_url or urls may be specified")]
    BothUrlForms,

    #[error("one of single_url or urls must be specified")]
    NoUrls,

    #[error("checksum_type must be specified")]
    MissingChecksumType,

    #[error(transparent)]
    UnsupportedChecksumType(#[from] UnknownAlgorithm),

    #[error("a checksum or checksum_url is required for checksum type {0} (large downloads must be verified)")]
    ChecksumRequired(ChecksumAlgorithm),

    /// The resolved value is not a hex digest of the algorithm's length.
    #[error("invalid checksum")]
    InvalidChecksum(#[source] DirectiveError),

    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The remote checksum manifest could not be downloaded.
    #[error("failed to download checksum file {url}")]
    ManifestFetch {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to read checksum file {url}")]
    ManifestRead {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// No manifest line names the artifact under any candidate key.
    #[error("no checksum for {filename:?}, {rel_path:?} or {abs_path:?} found at: {manifest_url}")]
    ManifestNoMatch {
        filename: String,
        rel_path: String,
        abs_path: String,
        manifest_url: String,
    },
}
