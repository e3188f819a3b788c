//! Expected SHA-256 of the canonical prebuild archive for each platform.

use std::collections::BTreeMap;

use crate::checksum::is_sha256_hex;
use crate::error::{FetchError, Result};

/// Built-in prebuild checksums, keyed by canonical platform identifier.
const PREBUILD_CHECKSUMS: &[(&str, &str)] = &[
    ("android", "e9fae8e1dcbb837bba669c3aa22f7f61ab0cefbc4b0f70a44aaf2a76f7e2a464"),
    ("ios", "74f94b1a5c974c1dffe38304c339ef587dc32245db69c4d8184282afcf8d6e71"),
    ("windows-x64", "e30da35e168b377557f5234ab0ad62da440cfad338e30fd636d869c60b87ff58"),
    ("windows-arm64", "ec3d6198b455edf8ea93de7e734115928add6ea96f77a38ee62dc2b53b53c18e"),
    ("mac-x64", "3ea7cb23bc0e0258a3f1142004a597d0ae4e5712084008d682941ea689ebb92a"),
    ("mac-arm64", "3f091086565a54764428c818935f0c020ac3b54437c77cfe002602a7a9bc2a35"),
    ("linux-x64", "18365c39ce9542bc0b62feaeffbad367349d6b7d93d089c5792bad072c2c5bce"),
    ("linux-arm64", "091ee72acba704e39d162093601b453d0f22b074944a83e4c810a893a25e64d0"),
];

/// Immutable mapping from canonical platform identifier to hex SHA-256.
///
/// Its key set doubles as the list of canonical identifiers understood by
/// [`crate::platform::PlatformResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumTable {
    entries: BTreeMap<String, String>,
}

impl Default for ChecksumTable {
    fn default() -> Self {
        Self::from_entries(
            PREBUILD_CHECKSUMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }
}

impl ChecksumTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k, v.to_ascii_lowercase()))
                .collect(),
        }
    }

    /// Returns a new table with `overrides` added to (or replacing) the current entries.
    /// Every override must be a 64-digit hex digest.
    pub fn with_overrides<'a, I>(&self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut entries = self.entries.clone();
        for (platform, digest) in overrides {
            if !is_sha256_hex(digest) {
                return Err(FetchError::argument(format!(
                    "checksum for '{}' is not a SHA-256 hex digest: {}",
                    platform, digest
                )));
            }
            entries.insert(platform.clone(), digest.to_ascii_lowercase());
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, platform: &str) -> Option<&str> {
        self.entries.get(platform).map(String::as_str)
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.entries.contains_key(platform)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
