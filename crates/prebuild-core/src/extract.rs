//! Unpacking a verified archive.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::{FetchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarBz2,
    TarGz,
    Tar,
}

impl ArchiveFormat {
    /// Picks the format from the leading bytes of the archive. Anything
    /// that is neither bzip2 nor gzip is treated as a plain tar stream.
    pub fn sniff(head: &[u8]) -> Self {
        if head.starts_with(b"BZh") {
            ArchiveFormat::TarBz2
        } else if head.starts_with(&[0x1f, 0x8b]) {
            ArchiveFormat::TarGz
        } else {
            ArchiveFormat::Tar
        }
    }
}

/// Unpacks an opened archive into a directory.
pub trait Extractor {
    fn unpack(&self, archive: File, archive_name: &str, into: &Path) -> Result<()>;
}

/// Tar archives, optionally bzip2 or gzip compressed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarExtractor;

impl Extractor for TarExtractor {
    fn unpack(&self, archive: File, archive_name: &str, into: &Path) -> Result<()> {
        let extract_err = |source: io::Error| FetchError::Extract {
            path: PathBuf::from(archive_name),
            source,
        };
        let mut reader = BufReader::new(archive);
        let format = ArchiveFormat::sniff(reader.fill_buf().map_err(extract_err)?);
        tracing::info!("extracting {} ({:?})...", archive_name, format);

        let unpacked = match format {
            ArchiveFormat::TarBz2 => unpack_tar(BzDecoder::new(reader), into),
            ArchiveFormat::TarGz => unpack_tar(GzDecoder::new(reader), into),
            ArchiveFormat::Tar => unpack_tar(reader, into),
        };
        unpacked.map_err(extract_err)
    }
}

// `Archive::unpack` refuses entries that would land outside `into`.
fn unpack_tar<R: Read>(reader: R, into: &Path) -> io::Result<()> {
    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.unpack(into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> File {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        File::open(&path).unwrap()
    }

    #[test]
    fn format_from_leading_bytes() {
        assert_eq!(ArchiveFormat::sniff(b"BZh91AY&SY"), ArchiveFormat::TarBz2);
        assert_eq!(ArchiveFormat::sniff(&[0x1f, 0x8b, 0x08, 0x00]), ArchiveFormat::TarGz);
        assert_eq!(ArchiveFormat::sniff(b"readme.txt\0\0"), ArchiveFormat::Tar);
        assert_eq!(ArchiveFormat::sniff(b""), ArchiveFormat::Tar);
    }

    #[test]
    fn unpacks_tar_bz2() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let tar = tar_bytes(&[("release/obj/libwebrtc.a", &b"lib"[..]), ("include/api.h", &b"hdr"[..])]);
        let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::best());
        enc.write_all(&tar).unwrap();
        let archive = write_archive(src.path(), "a.tar.bz2", &enc.finish().unwrap());

        TarExtractor.unpack(archive, "a.tar.bz2", out.path()).unwrap();
        assert_eq!(std::fs::read(out.path().join("release/obj/libwebrtc.a")).unwrap(), b"lib");
        assert_eq!(std::fs::read(out.path().join("include/api.h")).unwrap(), b"hdr");
    }

    #[test]
    fn unpacks_tar_gz() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let tar = tar_bytes(&[("readme.txt", &b"hello"[..])]);
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(&tar).unwrap();
        let archive = write_archive(src.path(), "a.tgz", &enc.finish().unwrap());

        TarExtractor.unpack(archive, "a.tgz", out.path()).unwrap();
        assert_eq!(std::fs::read(out.path().join("readme.txt")).unwrap(), b"hello");
    }

    #[test]
    fn corrupt_archive_is_extract_error() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let archive = write_archive(src.path(), "a.tar.bz2", b"BZh9 definitely not bzip2");

        let err = TarExtractor.unpack(archive, "a.tar.bz2", out.path()).unwrap_err();
        assert!(matches!(err, FetchError::Extract { .. }));
    }

    #[test]
    fn gzip_archive_without_suffix_is_unpacked() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let tar = tar_bytes(&[("lib/libringrtc.a", &b"rtc"[..])]);
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(&tar).unwrap();
        let archive = write_archive(src.path(), "latest", &enc.finish().unwrap());

        TarExtractor.unpack(archive, "latest", out.path()).unwrap();
        assert_eq!(std::fs::read(out.path().join("lib/libringrtc.a")).unwrap(), b"rtc");
    }

    #[test]
    fn plain_tar_is_unpacked_regardless_of_name() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let archive = write_archive(src.path(), "bundle.zip", &tar_bytes(&[("a.txt", &b"a"[..])]));

        TarExtractor.unpack(archive, "bundle.zip", out.path()).unwrap();
        assert_eq!(std::fs::read(out.path().join("a.txt")).unwrap(), b"a");
    }
}
