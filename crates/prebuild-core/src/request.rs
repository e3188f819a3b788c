//! Turning invocation inputs into a single [`ArtifactRequest`].
//!
//! Everything here is pure: argument problems surface before any file or
//! network I/O happens.

use std::path::PathBuf;

use crate::checksum::is_sha256_hex;
use crate::checksum_table::ChecksumTable;
use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::platform::{HostInfo, PlatformResolver};
use crate::url_model::{archive_file_name, prebuild_url, BuildMode};

/// Where the archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// An explicit archive URL; a checksum must be supplied with it.
    Url(String),
    /// A prebuild identified by platform token, version tag and build mode.
    Platform {
        token: String,
        version: Option<String>,
        mode: BuildMode,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub url: String,
    /// Lowercase hex SHA-256.
    pub expected_checksum: String,
    /// Archive file name, relative to the output directory.
    pub destination: PathBuf,
    /// Canonical platform identifier in platform mode.
    pub platform: Option<String>,
}

impl ArtifactRequest {
    /// Builds the request for `source`.
    ///
    /// An explicit `checksum` always wins; in platform mode the resolved
    /// identifier's table entry is the fallback.
    pub fn build(
        source: &ArtifactSource,
        checksum: Option<&str>,
        table: &ChecksumTable,
        host: HostInfo,
        cfg: &FetchConfig,
    ) -> Result<Self> {
        let checksum = checksum.map(str::trim).filter(|c| !c.is_empty());

        let (url, platform) = match source {
            ArtifactSource::Url(url) => (url.clone(), None),
            ArtifactSource::Platform {
                token,
                version,
                mode,
            } => {
                let version = version
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| FetchError::argument("--platform requires --webrtc-version"))?;
                let platform = PlatformResolver::new(table, host).resolve(token)?;
                let url = prebuild_url(
                    &cfg.base_url,
                    version,
                    &platform,
                    *mode,
                    &cfg.archive_extension,
                );
                (url, Some(platform))
            }
        };

        let expected = match (checksum, platform.as_deref()) {
            (Some(c), _) => c.to_string(),
            (None, Some(p)) => table
                .lookup(p)
                .map(str::to_string)
                .ok_or_else(|| FetchError::MissingChecksum(p.to_string()))?,
            (None, None) => return Err(FetchError::MissingChecksum(url)),
        };
        if !is_sha256_hex(&expected) {
            return Err(FetchError::argument(format!(
                "checksum is not a SHA-256 hex digest: {}",
                expected
            )));
        }

        let destination = PathBuf::from(archive_file_name(&url)?);
        Ok(Self {
            url,
            expected_checksum: expected.to_ascii_lowercase(),
            destination,
            platform,
        })
    }

    pub fn file_name(&self) -> String {
        self.destination.to_string_lossy().into_owned()
    }
}
