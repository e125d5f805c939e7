//! Process-wide cache directory for fetched artifacts.
//!
//! Root precedence: `ARTIFETCH_CACHE_DIR`, then `cache_dir` from the global
//! config, then the XDG cache home (`~/.cache/artifetch`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::FetchConfig;

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "ARTIFETCH_CACHE_DIR";

/// Resolves relative file names to absolute paths under the cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    /// Cache rooted at `root`. A relative root is made absolute against the
    /// current directory.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self { root })
    }

    /// Cache root chosen from the environment, then `cfg`, then XDG.
    pub fn from_env(cfg: &FetchConfig) -> io::Result<Self> {
        if let Some(dir) = std::env::var_os(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
            return Self::new(dir);
        }
        if let Some(dir) = &cfg.cache_dir {
            return Self::new(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("artifetch")?;
        Self::new(xdg_dirs.get_cache_home())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for `name` under the root, creating intermediate
    /// directories. An absolute `name` is returned unchanged (its parent is
    /// still created).
    pub fn resolve(&self, name: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.root.join(name.as_ref());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}
