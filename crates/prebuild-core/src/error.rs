//! Error taxonomy for resolving, fetching and unpacking a prebuild.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("no known checksum for '{0}'; pass --checksum")]
    MissingChecksum(String),

    /// A freshly downloaded archive did not hash to the expected value.
    /// The unverified bytes are kept at `kept_at` for inspection.
    #[error(
        "checksum mismatch for {url}: expected {expected}, actual {actual} (unverified download kept at {})",
        kept_at.display()
    )]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
        kept_at: PathBuf,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Argument(String),

    #[error("failed to extract {}: {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn argument<S: Into<String>>(message: S) -> Self {
        FetchError::Argument(message.into())
    }

    pub(crate) fn io<S: Into<String>>(context: S, source: io::Error) -> Self {
        FetchError::Io {
            context: context.into(),
            source,
        }
    }
}
