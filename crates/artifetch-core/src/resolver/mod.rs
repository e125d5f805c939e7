//! Checksum resolver: validates the source and checksum configuration of an
//! artifact and produces a single normalized checksum.
//!
//! Runs once during configuration validation, before the artifact itself is
//! fetched. The only network access is an optional download of a remote
//! checksum manifest through the [`Transport`].

mod error;
mod manifest;

pub use error::ConfigError;
pub use manifest::{find_checksum, ManifestKeys};

use std::fs::File;
use std::io::BufReader;

use crate::checksum::{ChecksumAlgorithm, ChecksumSpec, ExpectedDigest};
use crate::transport::Transport;

/// Warning emitted for checksum type `none`.
pub const NO_CHECKSUM_WARNING: &str = "A checksum type of 'none' was specified. Since artifacts \
     such as disk images are large, a checksum is highly recommended.";

/// Candidate source URLs as written in the configuration.
///
/// `single_url` is a convenience alias; [`SourceSpec::normalize`] folds it into
/// `urls` so that one canonical list exists downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSpec {
    pub single_url: Option<String>,
    pub urls: Vec<String>,
}

impl SourceSpec {
    /// Prepends `single_url` to `urls` and clears it. Blank entries are dropped.
    /// Exactly one of the two forms must be populated.
    pub fn normalize(&mut self) -> Result<(), ConfigError> {
        let single = self
            .single_url
            .take()
            .filter(|u| !u.trim().is_empty());
        self.urls.retain(|u| !u.trim().is_empty());
        match single {
            Some(_) if !self.urls.is_empty() => Err(ConfigError::BothUrlForms),
            Some(u) => {
                self.urls.insert(0, u);
                Ok(())
            }
            None if self.urls.is_empty() => Err(ConfigError::NoUrls),
            None => Ok(()),
        }
    }
}

/// Raw checksum fields as written in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumInput {
    pub checksum_type: String,
    pub checksum: Option<String>,
    pub checksum_url: Option<String>,
}

/// Output of [`ChecksumResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Canonical, non-empty list of source URLs, highest priority first.
    pub sources: Vec<String>,
    pub checksum: ChecksumSpec,
    /// Advisory messages for the user; never fatal.
    pub warnings: Vec<String>,
}

/// Resolves checksum specifications, fetching remote manifests through `transport`.
pub struct ChecksumResolver<'a> {
    transport: &'a dyn Transport,
}

impl<'a> ChecksumResolver<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Validates `source` and `input` and resolves the checksum value.
    ///
    /// Rules apply in order and the first failure is returned:
    /// URL forms, checksum type, then value (`none` → warning only; inline
    /// value → accepted; manifest URL → fetched and parsed; otherwise an error).
    /// A resolved value must be hex of the algorithm's digest length.
    pub fn resolve(
        &self,
        mut source: SourceSpec,
        input: &ChecksumInput,
    ) -> Result<Resolved, ConfigError> {
        source.normalize()?;

        let type_name = input.checksum_type.trim();
        if type_name.is_empty() {
            return Err(ConfigError::MissingChecksumType);
        }
        let algorithm: ChecksumAlgorithm = type_name.parse()?;

        let mut warnings = Vec::new();
        let value = non_empty(&input.checksum);
        let manifest_url = non_empty(&input.checksum_url);

        let checksum = if algorithm.is_none() {
            warnings.push(NO_CHECKSUM_WARNING.to_string());
            ChecksumSpec::none()
        } else if let Some(value) = value {
            if let Some(url) = manifest_url {
                warnings.push(format!(
                    "checksum is set; ignoring checksum_url {}",
                    url
                ));
            }
            ChecksumSpec::inline(algorithm, value)
        } else if let Some(url) = manifest_url {
            let digest = self.checksum_from_manifest(&source.urls[0], url, algorithm)?;
            tracing::info!(manifest = url, %algorithm, "resolved checksum from manifest");
            ChecksumSpec {
                algorithm,
                value: Some(digest.to_ascii_lowercase()),
                manifest_url: Some(url.to_string()),
            }
        } else {
            return Err(ConfigError::ChecksumRequired(algorithm));
        };
        if let Some(directive) = checksum.directive() {
            ExpectedDigest::from_directive(&directive).map_err(ConfigError::InvalidChecksum)?;
        }

        Ok(Resolved {
            sources: source.urls,
            checksum,
            warnings,
        })
    }

    /// Downloads the manifest into a scratch directory (removed on return) and
    /// looks up the entry for `artifact_url`.
    fn checksum_from_manifest(
        &self,
        artifact_url: &str,
        manifest_url: &str,
        algorithm: ChecksumAlgorithm,
    ) -> Result<String, ConfigError> {
        let keys = ManifestKeys::new(artifact_url, manifest_url)?;
        let read_err = |source| ConfigError::ManifestRead {
            url: manifest_url.to_string(),
            source,
        };

        let scratch = tempfile::tempdir().map_err(read_err)?;
        let dst = scratch.path().join("checksums");
        tracing::debug!(manifest = manifest_url, dst = %dst.display(), "downloading checksum manifest");
        self.transport
            .get_file(&dst, manifest_url)
            .map_err(|source| ConfigError::ManifestFetch {
                url: manifest_url.to_string(),
                source,
            })?;

        let file = File::open(&dst).map_err(read_err)?;
        find_checksum(BufReader::new(file), &keys, algorithm, manifest_url)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
