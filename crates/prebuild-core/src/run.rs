//! End-to-end flow: verified fetch followed by extraction.

use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};
use crate::extract::Extractor;
use crate::fetcher::VerifiedFetcher;
use crate::request::ArtifactRequest;
use crate::transport::Transport;

/// Creates `dir` (with parents) and makes it the process's working directory.
pub fn enter_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| FetchError::io(format!("failed to create {}", dir.display()), e))?;
    std::env::set_current_dir(dir)
        .map_err(|e| FetchError::io(format!("failed to enter {}", dir.display()), e))?;
    tracing::debug!("working in {}", dir.display());
    Ok(())
}

/// Fetches `request` into `output_dir` (verifying its checksum) and unpacks it there.
/// Returns the path of the verified archive.
pub fn fetch_and_extract<T, E>(
    request: &ArtifactRequest,
    output_dir: &Path,
    fetcher: &VerifiedFetcher<T>,
    extractor: &E,
) -> Result<PathBuf>
where
    T: Transport,
    E: Extractor + ?Sized,
{
    let archive_path = output_dir.join(&request.destination);
    let archive = fetcher.ensure(&archive_path, &request.url, &request.expected_checksum)?;
    extractor.unpack(archive, &request.file_name(), output_dir)?;
    Ok(archive_path)
}
