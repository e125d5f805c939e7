//! Checksum manifest parsing.
//!
//! Two historical line formats are understood:
//!
//! - BSD style: `SHA256 (debian.iso) = 0123abcd...`
//! - standard (coreutils) style: `0123abcd...  debian.iso`, optionally with a
//!   `*` before the name marking binary mode.
//!
//! Manifest authors refer to files by bare name, by path relative to the
//! manifest, or by absolute path, so an entry matches on any of those keys.

use std::io::BufRead;

use super::error::ConfigError;
use crate::checksum::ChecksumAlgorithm;
use crate::url_model::{
    absolute_url_path, decoded_path, filename_from_url_path, parent_dir, parse_source,
    relative_path,
};

/// The names under which a manifest may list the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestKeys {
    pub filename: Option<String>,
    pub rel_path: Option<String>,
    pub abs_path: Option<String>,
}

impl ManifestKeys {
    /// Keys for `artifact_url` as seen from a manifest served at `manifest_url`.
    /// A key that cannot be computed is left out.
    pub fn new(artifact_url: &str, manifest_url: &str) -> Result<Self, ConfigError> {
        let artifact = parse_source(artifact_url).map_err(|source| ConfigError::InvalidUrl {
            url: artifact_url.to_string(),
            source,
        })?;
        let manifest = parse_source(manifest_url).map_err(|source| ConfigError::InvalidUrl {
            url: manifest_url.to_string(),
            source,
        })?;

        let path = decoded_path(&artifact);
        let filename = filename_from_url_path(artifact.as_str());

        let abs_path = absolute_url_path(&path);
        if abs_path.is_none() {
            tracing::debug!(%path, "unable to make artifact path absolute");
        }
        let rel_path = abs_path
            .as_deref()
            .and_then(|abs| relative_path(&parent_dir(&decoded_path(&manifest)), abs));
        if rel_path.is_none() {
            tracing::debug!(manifest = %manifest, "unable to relativize artifact path; continuing without it");
        }

        Ok(Self {
            filename,
            rel_path,
            abs_path,
        })
    }

    fn matches(&self, name: &str) -> bool {
        self.filename.as_deref() == Some(name)
            || self.abs_path.as_deref() == Some(name)
            || self.rel_path.as_deref().is_some_and(|rel| {
                name == rel || name.strip_prefix("./") == Some(rel)
            })
    }

    fn no_match(&self, manifest_url: &str) -> ConfigError {
        ConfigError::ManifestNoMatch {
            filename: self.filename.clone().unwrap_or_default(),
            rel_path: self.rel_path.clone().unwrap_or_default(),
            abs_path: self.abs_path.clone().unwrap_or_default(),
            manifest_url: manifest_url.to_string(),
        }
    }
}

/// Scans `reader` line by line and returns the digest listed for the artifact.
///
/// The first matching line wins. Reaching the end without a match is an error
/// naming every candidate key so a naming mismatch can be diagnosed.
pub fn find_checksum<R: BufRead>(
    mut reader: R,
    keys: &ManifestKeys,
    algorithm: ChecksumAlgorithm,
    manifest_url: &str,
) -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| ConfigError::ManifestRead {
                url: manifest_url.to_string(),
                source,
            })?;
        if n == 0 {
            return Err(keys.no_match(manifest_url));
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(digest) = match_line(&line, keys, algorithm) {
            return Ok(digest);
        }
    }
}

fn match_line(line: &str, keys: &ManifestKeys, algorithm: ChecksumAlgorithm) -> Option<String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [alg, name, _, digest] => {
            let name = name.strip_prefix('(')?.strip_suffix(')')?;
            (alg.eq_ignore_ascii_case(algorithm.as_str()) && keys.matches(name))
                .then(|| digest.to_string())
        }
        [digest, name] => {
            let name = name.strip_prefix('*').unwrap_or(name);
            keys.matches(name).then(|| digest.to_string())
        }
        _ => None,
    }
}
