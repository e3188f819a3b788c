//! SHA-256 helpers: streaming digests of existing files and a writer that
//! hashes bytes on their way to disk.
//!
//! Both paths read or write in bounded chunks so memory use does not grow
//! with the archive size.

use sha2::{Digest, Sha256};
use std::io::{self, Read, Write};

const BUF_SIZE: usize = 64 * 1024;

/// Number of hex digits in a SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Compute SHA-256 of everything remaining in `reader` and return it as lowercase hex.
pub fn sha256_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hex digests compare case-insensitively; surrounding whitespace is ignored.
pub fn digests_match(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

/// True if `s` looks like a SHA-256 hex digest (64 hex digits, any case).
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == SHA256_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Forwards writes to `inner` while feeding the same bytes into a SHA-256 digest.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Flush the inner writer and return it with the lowercase hex digest of all bytes written.
    pub fn finish(mut self) -> io::Result<(W, String)> {
        self.inner.flush()?;
        Ok((self.inner, hex::encode(self.hasher.finalize())))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        // Only the bytes the inner writer accepted are part of the stream.
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
