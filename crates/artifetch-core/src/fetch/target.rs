//! Where a fetched artifact lands.

use std::io;
use std::path::PathBuf;

use crate::cache::CacheDir;
use crate::url_model::cache_file_name;

/// Extension forced onto cache file names when none is configured.
pub const DEFAULT_EXTENSION: &str = "iso";

/// Target of a fetch: an explicit path, or a content-derived cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub explicit_path: Option<PathBuf>,
    /// Lower-case, without a leading dot. Empty means no suffix.
    pub forced_extension: String,
}

impl Default for TargetDescriptor {
    fn default() -> Self {
        Self {
            explicit_path: None,
            forced_extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl TargetDescriptor {
    /// Normalizes raw config values: an empty path counts as unset, the
    /// extension defaults to `iso` and is lower-cased.
    pub fn new(explicit_path: Option<PathBuf>, extension: Option<&str>) -> Self {
        let explicit_path = explicit_path.filter(|p| !p.as_os_str().is_empty());
        let forced_extension = match extension.map(str::trim) {
            Some(ext) if !ext.is_empty() => ext.trim_start_matches('.').to_ascii_lowercase(),
            _ => DEFAULT_EXTENSION.to_string(),
        };
        Self {
            explicit_path,
            forced_extension,
        }
    }

    /// Path for one attempt at `qualified_url`.
    ///
    /// The explicit path wins (relative paths live under the cache root).
    /// Otherwise the name is derived from the qualified URL, so each mirror and
    /// each checksum gets its own cache entry.
    pub fn path_for(&self, qualified_url: &str, cache: &CacheDir) -> io::Result<PathBuf> {
        match &self.explicit_path {
            Some(p) => cache.resolve(p),
            None => cache.resolve(cache_file_name(qualified_url, &self.forced_extension)),
        }
    }
}
