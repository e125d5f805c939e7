use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checksum::ChecksumSpec;
use crate::fetch::TargetDescriptor;
use crate::resolver::{ChecksumInput, ChecksumResolver, ConfigError, SourceSpec};
use crate::transport::{CurlOptions, Transport};
use crate::url_model;

/// Global configuration loaded from `~/.config/artifetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Cache root; overridden by `ARTIFETCH_CACHE_DIR`, XDG cache home when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    /// Whole-transfer limit in seconds; 0 disables it.
    pub timeout_secs: u64,
    /// Transfers slower than this (bytes/s) for `low_speed_time_secs` are aborted.
    pub low_speed_limit: u32,
    pub low_speed_time_secs: u64,
    pub max_redirections: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            max_redirections: 10,
        }
    }
}

impl FetchConfig {
    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            low_speed_limit: self.low_speed_limit,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            max_redirections: self.max_redirections,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artifetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    load_or_init_at(&config_path()?)
}

/// [`load_or_init`] against an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FetchConfig> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

/// Per-artifact configuration: where to get it and how to verify it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Used in the "Retrieving ..." notice.
    pub description: Option<String>,
    pub checksum: Option<String>,
    pub checksum_url: Option<String>,
    pub checksum_type: String,
    pub urls: Vec<String>,
    #[serde(alias = "url")]
    pub single_url: Option<String>,
    pub target_path: Option<PathBuf>,
    pub target_extension: Option<String>,
}

/// Validated artifact, ready to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedArtifact {
    pub description: String,
    pub sources: Vec<String>,
    pub checksum: ChecksumSpec,
    pub target: TargetDescriptor,
    pub warnings: Vec<String>,
}

impl ArtifactConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading artifact config {}", path.display()))?;
        let cfg = toml::from_str(&data)
            .with_context(|| format!("parsing artifact config {}", path.display()))?;
        Ok(cfg)
    }

    /// Runs the checksum resolver (which may download a manifest through
    /// `transport`) and fills in target defaults.
    pub fn prepare(&self, transport: &dyn Transport) -> Result<PreparedArtifact, ConfigError> {
        let source = SourceSpec {
            single_url: self.single_url.clone(),
            urls: self.urls.clone(),
        };
        let input = ChecksumInput {
            checksum_type: self.checksum_type.clone(),
            checksum: self.checksum.clone(),
            checksum_url: self.checksum_url.clone(),
        };
        let resolved = ChecksumResolver::new(transport).resolve(source, &input)?;
        for w in &resolved.warnings {
            tracing::warn!("{}", w);
        }

        Ok(PreparedArtifact {
            description: self
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "artifact".to_string()),
            sources: resolved.sources,
            checksum: resolved.checksum,
            target: TargetDescriptor::new(
                self.target_path.clone(),
                self.target_extension.as_deref(),
            ),
            warnings: resolved.warnings,
        })
    }
}

impl PreparedArtifact {
    /// Source URLs with the checksum directive embedded, in priority order.
    pub fn qualified_urls(&self) -> Result<Vec<String>, ConfigError> {
        url_model::qualify(&self.sources, &self.checksum)
    }
}
