//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_fetch() {
    match parse(&["artifetch", "fetch", "debian.toml"]) {
        CliCommand::Fetch {
            artifact,
            target_path,
            description,
        } => {
            assert_eq!(artifact, PathBuf::from("debian.toml"));
            assert!(target_path.is_none());
            assert!(description.is_none());
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_overrides() {
    match parse(&[
        "artifetch",
        "fetch",
        "debian.toml",
        "--target-path",
        "/srv/images/debian.iso",
        "--description",
        "ISO",
    ]) {
        CliCommand::Fetch {
            target_path,
            description,
            ..
        } => {
            assert_eq!(target_path, Some(PathBuf::from("/srv/images/debian.iso")));
            assert_eq!(description.as_deref(), Some("ISO"));
        }
        _ => panic!("expected Fetch with overrides"),
    }
}

#[test]
fn cli_parse_resolve() {
    match parse(&["artifetch", "resolve", "debian.toml"]) {
        CliCommand::Resolve { artifact } => assert_eq!(artifact, PathBuf::from("debian.toml")),
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_checksum_default_type() {
    match parse(&["artifetch", "checksum", "/tmp/file.iso"]) {
        CliCommand::Checksum {
            path,
            checksum_type,
        } => {
            assert_eq!(path, PathBuf::from("/tmp/file.iso"));
            assert_eq!(checksum_type, "sha256");
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_checksum_type() {
    match parse(&["artifetch", "checksum", "--type", "md5", "file.iso"]) {
        CliCommand::Checksum { checksum_type, .. } => assert_eq!(checksum_type, "md5"),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["artifetch"]).is_err());
    assert!(Cli::try_parse_from(["artifetch", "fetch"]).is_err());
}
