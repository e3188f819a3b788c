//! CLI for fetching prebuilt artifacts.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use prebuild_core::config;
use prebuild_core::extract::TarExtractor;
use prebuild_core::fetcher::VerifiedFetcher;
use prebuild_core::logging::Verbosity;
use prebuild_core::request::{ArtifactRequest, ArtifactSource};
use prebuild_core::run::{enter_output_dir, fetch_and_extract};
use prebuild_core::transport::CurlTransport;
use prebuild_core::url_model::BuildMode;
use prebuild_core::HostInfo;
use std::path::{Path, PathBuf};

/// Download and unpack a build artifact archive for a given platform, or from an arbitrary URL.
#[derive(Debug, Parser)]
#[command(name = "fetch-artifact")]
#[command(version)]
#[command(long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "platform"])))]
pub struct Cli {
    /// URL of an explicitly-specified artifact archive.
    #[arg(short, long)]
    pub url: Option<String>,

    /// WebRTC prebuild platform to fetch artifacts for (e.g. desktop, mac, linux-arm64).
    #[arg(short, long)]
    pub platform: Option<String>,

    /// sha256sum of the unexpanded artifact archive (can be omitted for standard prebuilds).
    #[arg(short, long)]
    pub checksum: Option<String>,

    /// Fetch debug prebuild instead of release.
    #[arg(long, conflicts_with = "release")]
    pub debug: bool,

    /// Fetch release prebuild (default).
    #[arg(long)]
    pub release: bool,

    /// WebRTC tag, used to identify a prebuild.
    #[arg(long, value_name = "TAG")]
    pub webrtc_version: Option<String>,

    /// Build directory; created if missing. The archive is cached and unpacked here.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Config file (default: $XDG_CONFIG_HOME/fetch-artifact/config.toml, if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append log output to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the resolved checksum and URL, then exit without downloading.
    #[arg(long)]
    pub print_url: bool,

    /// More detailed diagnostics.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn build_mode(&self) -> BuildMode {
        if self.debug {
            BuildMode::Debug
        } else {
            BuildMode::Release
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    pub fn source(&self) -> ArtifactSource {
        match (&self.url, &self.platform) {
            (Some(url), _) => ArtifactSource::Url(url.clone()),
            (None, platform) => ArtifactSource::Platform {
                token: platform.clone().unwrap_or_default(),
                version: self.webrtc_version.clone(),
                mode: self.build_mode(),
            },
        }
    }

    pub fn run(self) -> Result<()> {
        let cfg = config::load(self.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);
        let table = cfg.checksum_table()?;

        let request = ArtifactRequest::build(
            &self.source(),
            self.checksum.as_deref(),
            &table,
            HostInfo::detect(),
            &cfg,
        )?;
        if let Some(platform) = &request.platform {
            tracing::debug!("resolved platform {}", platform);
        }

        if self.print_url {
            println!("{}  {}", request.expected_checksum, request.url);
            return Ok(());
        }

        enter_output_dir(&self.output_dir)?;
        let fetcher = VerifiedFetcher::new(CurlTransport::new(cfg.http.clone()));
        let archive = fetch_and_extract(&request, Path::new("."), &fetcher, &TarExtractor)
            .with_context(|| format!("fetching {}", request.url))?;
        tracing::info!(
            "unpacked {} into {}",
            archive.display(),
            self.output_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
