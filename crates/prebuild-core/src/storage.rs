//! Staging files for downloads.
//!
//! A download is written to a uniquely-named file next to its destination and
//! only becomes visible under the destination name through an atomic rename,
//! so an interrupted or rejected transfer never replaces a good archive.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{FetchError, Result};

/// Suffix of staging files, e.g. `archive.tar.bz2.Xy12Ab.unverified`.
pub const STAGING_SUFFIX: &str = ".unverified";

/// Directory a staging file for `destination` is created in: the destination's
/// own directory, so the final rename stays on one filesystem.
pub fn staging_dir(destination: &Path) -> &Path {
    match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// A download in progress. Dropping it removes the file.
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    /// Create an empty, uniquely-named staging file for `destination`.
    pub fn create_for(destination: &Path) -> Result<Self> {
        let name = destination
            .file_name()
            .ok_or_else(|| {
                FetchError::argument(format!("{} does not name a file", destination.display()))
            })?
            .to_string_lossy();
        let dir = staging_dir(destination);
        let prefix = format!("{}.", name);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(STAGING_SUFFIX);
        // 0666 less the umask, as `File::create` would give; tempfile's default is 0600.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let file = builder
            .tempfile_in(dir)
            .map_err(|e| {
                FetchError::io(format!("failed to create staging file in {}", dir.display()), e)
            })?;
        tracing::debug!(path = %file.path().display(), "staging download");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn as_file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    /// Sync to disk and atomically rename over `destination`, replacing any
    /// previous file. Returns the still-open handle positioned at the start.
    pub fn finalize(self, destination: &Path) -> Result<File> {
        self.file
            .as_file()
            .sync_all()
            .map_err(|e| FetchError::io(format!("failed to sync {}", self.path().display()), e))?;
        let mut file = self.file.persist(destination).map_err(|e| {
            FetchError::io(
                format!(
                    "failed to rename {} to {}",
                    e.file.path().display(),
                    destination.display()
                ),
                e.error,
            )
        })?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| FetchError::io(format!("failed to rewind {}", destination.display()), e))?;
        Ok(file)
    }

    /// Leave the staging file on disk and return its path.
    pub fn keep(self) -> Result<PathBuf> {
        let (_, path) = self.file.keep().map_err(|e| {
            FetchError::io(
                format!("failed to keep {}", e.file.path().display()),
                e.error,
            )
        })?;
        Ok(path)
    }
}
