//! CLI for the artifetch artifact fetcher.

mod commands;

use anyhow::Result;
use artifetch_core::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_checksum, run_fetch, run_resolve, FetchOverrides};

/// Top-level CLI for artifetch.
#[derive(Debug, Parser)]
#[command(name = "artifetch")]
#[command(about = "artifetch: checksum-verified artifact fetcher with mirror fallback", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve the checksum and fetch an artifact from the first working mirror.
    Fetch {
        /// Artifact description (TOML).
        artifact: PathBuf,

        /// Store the artifact here instead of a checksum-derived cache name.
        #[arg(long, value_name = "PATH")]
        target_path: Option<PathBuf>,

        /// Name shown in the "Retrieving ..." notice.
        #[arg(long)]
        description: Option<String>,
    },

    /// Validate an artifact description and print its resolved checksum.
    Resolve {
        /// Artifact description (TOML).
        artifact: PathBuf,
    },

    /// Compute the digest of a local file.
    Checksum {
        /// Path to the file.
        path: PathBuf,

        /// Digest algorithm: md5, sha1, sha256, sha384 or sha512.
        #[arg(long = "type", default_value = "sha256", value_name = "ALGORITHM")]
        checksum_type: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                artifact,
                target_path,
                description,
            } => {
                let overrides = FetchOverrides {
                    target_path,
                    description,
                };
                run_fetch(&cfg, &artifact, overrides).await?;
            }
            CliCommand::Resolve { artifact } => run_resolve(&cfg, &artifact).await?,
            CliCommand::Checksum {
                path,
                checksum_type,
            } => run_checksum(&path, &checksum_type).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
