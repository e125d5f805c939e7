//! Checksum algorithms, checksum specifications, and on-demand file digests.
//!
//! Digests are computed in bounded chunks so that multi-gigabyte images are
//! never held in memory.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

const BUF_SIZE: usize = 64 * 1024;

/// Supported checksum algorithms. `None` disables verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    None,
}

impl ChecksumAlgorithm {
    /// Lower-case name, as written in configs, manifests and `checksum=` directives.
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Sha384 => "sha384",
            ChecksumAlgorithm::Sha512 => "sha512",
            ChecksumAlgorithm::None => "none",
        }
    }

    pub fn is_none(self) -> bool {
        self == ChecksumAlgorithm::None
    }

    /// Length of the hex digest, `None` for [`ChecksumAlgorithm::None`].
    pub fn hex_len(self) -> Option<usize> {
        match self {
            ChecksumAlgorithm::Md5 => Some(32),
            ChecksumAlgorithm::Sha1 => Some(40),
            ChecksumAlgorithm::Sha256 => Some(64),
            ChecksumAlgorithm::Sha384 => Some(96),
            ChecksumAlgorithm::Sha512 => Some(128),
            ChecksumAlgorithm::None => None,
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a checksum type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported checksum type {0:?}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for ChecksumAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(ChecksumAlgorithm::Md5),
            "sha1" => Ok(ChecksumAlgorithm::Sha1),
            "sha256" => Ok(ChecksumAlgorithm::Sha256),
            "sha384" => Ok(ChecksumAlgorithm::Sha384),
            "sha512" => Ok(ChecksumAlgorithm::Sha512),
            "none" => Ok(ChecksumAlgorithm::None),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Checksum requirement for an artifact.
///
/// After resolution, `value` is set and lower-cased whenever `algorithm` is not
/// `none`. `manifest_url` only records where the value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumSpec {
    pub algorithm: ChecksumAlgorithm,
    pub value: Option<String>,
    pub manifest_url: Option<String>,
}

impl ChecksumSpec {
    /// No verification.
    pub fn none() -> Self {
        Self {
            algorithm: ChecksumAlgorithm::None,
            value: None,
            manifest_url: None,
        }
    }

    /// Inline digest; the value is lower-cased.
    pub fn inline(algorithm: ChecksumAlgorithm, value: &str) -> Self {
        Self {
            algorithm,
            value: Some(value.trim().to_ascii_lowercase()),
            manifest_url: None,
        }
    }

    /// The `<algorithm>:<value>` directive embedded into source URLs.
    /// `None` when verification is disabled or no value is known.
    pub fn directive(&self) -> Option<String> {
        if self.algorithm.is_none() {
            return None;
        }
        self.value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| format!("{}:{}", self.algorithm, v))
    }
}

/// A parsed `<algorithm>:<hexdigest>` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest {
    pub algorithm: ChecksumAlgorithm,
    pub digest: String,
}

/// Why a `checksum=` directive could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    #[error("checksum directive {0:?} is not of the form <type>:<digest>")]
    Malformed(String),
    #[error(transparent)]
    Algorithm(#[from] UnknownAlgorithm),
    #[error("checksum type 'none' cannot be used in a checksum directive")]
    NoneAlgorithm,
    #[error("{algorithm} digest must be {expected} hex characters, got {digest:?}")]
    BadDigest {
        algorithm: ChecksumAlgorithm,
        expected: usize,
        digest: String,
    },
}

impl ExpectedDigest {
    /// Parses `sha256:abc...`. The digest must be hex of the algorithm's length.
    pub fn from_directive(directive: &str) -> Result<Self, DirectiveError> {
        let (alg, digest) = directive
            .split_once(':')
            .ok_or_else(|| DirectiveError::Malformed(directive.to_string()))?;
        let algorithm: ChecksumAlgorithm = alg.parse()?;
        let expected = algorithm.hex_len().ok_or(DirectiveError::NoneAlgorithm)?;
        let digest = digest.trim().to_ascii_lowercase();
        if digest.len() != expected || hex::decode(&digest).is_err() {
            return Err(DirectiveError::BadDigest {
                algorithm,
                expected,
                digest,
            });
        }
        Ok(Self { algorithm, digest })
    }

    /// Hashes `path` and compares. Returns the actual digest on mismatch.
    pub fn check_path(&self, path: &Path) -> io::Result<Result<(), String>> {
        let actual = digest_path(self.algorithm, path)?;
        if actual == self.digest {
            Ok(Ok(()))
        } else {
            Ok(Err(actual))
        }
    }
}

/// Compute the digest of a file and return it as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn digest_path(algorithm: ChecksumAlgorithm, path: &Path) -> io::Result<String> {
    match algorithm {
        ChecksumAlgorithm::Md5 => hash_file::<Md5>(path),
        ChecksumAlgorithm::Sha1 => hash_file::<Sha1>(path),
        ChecksumAlgorithm::Sha256 => hash_file::<Sha256>(path),
        ChecksumAlgorithm::Sha384 => hash_file::<Sha384>(path),
        ChecksumAlgorithm::Sha512 => hash_file::<Sha512>(path),
        ChecksumAlgorithm::None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "checksum type 'none' has no digest",
        )),
    }
}

fn hash_file<D: Digest>(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
