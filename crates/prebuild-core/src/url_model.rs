//! Prebuild URL naming and local archive file names.

use std::fmt;

use crate::error::{FetchError, Result};

pub const DEFAULT_BASE_URL: &str = "https://build-artifacts.signal.org/libraries";
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "tar.bz2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    Debug,
    #[default]
    Release,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{base}/webrtc-{version}-{platform}-{mode}.{extension}`
///
/// A trailing `/` on `base_url` and a leading `.` on `extension` are tolerated.
pub fn prebuild_url(
    base_url: &str,
    version: &str,
    platform: &str,
    mode: BuildMode,
    extension: &str,
) -> String {
    format!(
        "{}/webrtc-{}-{}-{}.{}",
        base_url.trim_end_matches('/'),
        version,
        platform,
        mode,
        extension.trim_start_matches('.')
    )
}

/// Local file name for an archive: the last non-empty segment of the URL path.
///
/// Fails for unparseable URLs and for URLs whose path has no usable segment,
/// since the archive would otherwise land under an invented name.
pub fn archive_file_name(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url)
        .map_err(|e| FetchError::argument(format!("invalid URL '{}': {}", url, e)))?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or("");
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
        return Err(FetchError::argument(format!(
            "URL '{}' does not name a file",
            url
        )));
    }
    Ok(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prebuild_url_naming() {
        assert_eq!(
            prebuild_url(DEFAULT_BASE_URL, "6099a", "linux-x64", BuildMode::Release, "tar.bz2"),
            "https://build-artifacts.signal.org/libraries/webrtc-6099a-linux-x64-release.tar.bz2"
        );
        assert_eq!(
            prebuild_url("https://mirror.example/", "7", "mac-arm64", BuildMode::Debug, ".tar.gz"),
            "https://mirror.example/webrtc-7-mac-arm64-debug.tar.gz"
        );
    }

    #[test]
    fn build_mode_default_and_display() {
        assert_eq!(BuildMode::default(), BuildMode::Release);
        assert_eq!(BuildMode::Debug.to_string(), "debug");
    }

    #[test]
    fn archive_name_is_last_segment() {
        assert_eq!(
            archive_file_name("https://example.com/a/b/webrtc-1-linux-x64-release.tar.bz2").unwrap(),
            "webrtc-1-linux-x64-release.tar.bz2"
        );
        assert_eq!(
            archive_file_name("https://example.com/file.tar.gz?token=abc").unwrap(),
            "file.tar.gz"
        );
        assert_eq!(archive_file_name("https://example.com/dir/file.tar/").unwrap(), "file.tar");
    }

    #[test]
    fn archive_name_requires_a_segment() {
        assert!(archive_file_name("https://example.com/").is_err());
        assert!(archive_file_name("https://example.com").is_err());
        assert!(archive_file_name("not a url").is_err());
    }
}
