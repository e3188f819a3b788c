//! CLI parse tests.

use super::Cli;
use clap::Parser;
use prebuild_core::logging::Verbosity;
use prebuild_core::request::ArtifactSource;
use prebuild_core::url_model::BuildMode;
use std::path::Path;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_platform_mode() {
    let cli = parse(&[
        "fetch-artifact",
        "-p",
        "desktop",
        "--webrtc-version",
        "6099a",
        "-o",
        "out/release",
    ]);
    assert_eq!(cli.output_dir, Path::new("out/release"));
    assert!(cli.checksum.is_none());
    assert_eq!(cli.verbosity(), Verbosity::Normal);
    match cli.source() {
        ArtifactSource::Platform {
            token,
            version,
            mode,
        } => {
            assert_eq!(token, "desktop");
            assert_eq!(version.as_deref(), Some("6099a"));
            assert_eq!(mode, BuildMode::Release);
        }
        other => panic!("expected platform source, got {:?}", other),
    }
}

#[test]
fn cli_parse_debug_build() {
    let cli = parse(&["fetch-artifact", "--platform", "mac", "--debug", "-o", "x"]);
    assert_eq!(cli.build_mode(), BuildMode::Debug);
    let cli = parse(&["fetch-artifact", "--platform", "mac", "--release", "-o", "x"]);
    assert_eq!(cli.build_mode(), BuildMode::Release);
}

#[test]
fn cli_parse_url_mode() {
    let cli = parse(&[
        "fetch-artifact",
        "--url",
        "https://example.com/a.tar.bz2",
        "--checksum",
        "ABCD",
        "--output-dir",
        "build",
        "-v",
    ]);
    assert_eq!(cli.checksum.as_deref(), Some("ABCD"));
    assert_eq!(cli.verbosity(), Verbosity::Verbose);
    assert_eq!(
        cli.source(),
        ArtifactSource::Url("https://example.com/a.tar.bz2".to_string())
    );
}

#[test]
fn cli_requires_exactly_one_source() {
    assert!(Cli::try_parse_from(["fetch-artifact", "-o", "x"]).is_err());
    assert!(Cli::try_parse_from([
        "fetch-artifact",
        "-u",
        "https://example.com/a.tar.bz2",
        "-p",
        "linux",
        "-o",
        "x",
    ])
    .is_err());
}

#[test]
fn cli_requires_output_dir() {
    assert!(Cli::try_parse_from(["fetch-artifact", "-p", "linux"]).is_err());
}

#[test]
fn cli_build_modes_conflict() {
    assert!(Cli::try_parse_from([
        "fetch-artifact",
        "-p",
        "linux",
        "--debug",
        "--release",
        "-o",
        "x",
    ])
    .is_err());
}

#[test]
fn cli_verbose_and_quiet_conflict() {
    assert!(Cli::try_parse_from(["fetch-artifact", "-p", "linux", "-o", "x", "-v", "-q"]).is_err());
    let cli = parse(&["fetch-artifact", "-p", "linux", "-o", "x", "-q"]);
    assert_eq!(cli.verbosity(), Verbosity::Quiet);
}
