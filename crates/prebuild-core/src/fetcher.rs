//! Checksum-verified, idempotent download of a single archive.
//!
//! [`VerifiedFetcher::ensure`] hands back an open file whose content hashes to
//! the expected SHA-256, reusing a cached copy when it already matches and
//! otherwise downloading through a staging file that is only renamed into
//! place after verification.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use crate::checksum::{digests_match, sha256_reader, HashingWriter};
use crate::error::{FetchError, Result};
use crate::storage::StagedFile;
use crate::transport::Transport;

pub struct VerifiedFetcher<T> {
    transport: T,
}

impl<T: Transport> VerifiedFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ensures `destination` holds the archive behind `url` with SHA-256 `expected`.
    ///
    /// A stale or corrupt `destination` triggers exactly one re-download. A
    /// downloaded body that does not match is fatal: the destination is left
    /// untouched and the unverified bytes are kept beside it.
    pub fn ensure(&self, destination: &Path, url: &str, expected: &str) -> Result<File> {
        if let Some(file) = self.verify_cached(destination, expected)? {
            return Ok(file);
        }
        self.download(destination, url, expected)
    }

    fn verify_cached(&self, destination: &Path, expected: &str) -> Result<Option<File>> {
        let mut file = match File::open(destination) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FetchError::io(
                    format!("failed to open {}", destination.display()),
                    e,
                ))
            }
        };
        let actual = sha256_reader(&mut file)
            .map_err(|e| FetchError::io(format!("failed to read {}", destination.display()), e))?;
        if digests_match(expected, &actual) {
            tracing::info!("using cached {} (checksum verified)", destination.display());
            file.seek(SeekFrom::Start(0)).map_err(|e| {
                FetchError::io(format!("failed to rewind {}", destination.display()), e)
            })?;
            return Ok(Some(file));
        }
        tracing::warn!(
            "existing file '{}' has non-matching checksum {}; re-downloading",
            destination.display(),
            actual
        );
        Ok(None)
    }

    fn download(&self, destination: &Path, url: &str, expected: &str) -> Result<File> {
        tracing::info!("downloading {}...", destination.display());
        let mut staged = StagedFile::create_for(destination)?;

        let mut writer = HashingWriter::new(staged.as_file_mut());
        let received = self.transport.fetch(url, &mut writer)?;
        let (_, actual) = writer
            .finish()
            .map_err(|e| FetchError::io(format!("failed to write {}", url), e))?;
        tracing::debug!(bytes = received, sha256 = %actual, "download finished");

        if !digests_match(expected, &actual) {
            let kept_at = staged.keep()?;
            return Err(FetchError::ChecksumMismatch {
                url: url.to_string(),
                expected: expected.trim().to_ascii_lowercase(),
                actual,
                kept_at,
            });
        }
        staged.finalize(destination)
    }
}
