use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

/// Reads through to an inner reader while feeding every byte to a digest.
/// Wrapping the raw (still gzip-compressed) stream lets [`crate::store`]
/// compute the integrity digest over exactly the bytes that were fetched,
/// not over the decompressed tree.
pub struct HashingReader<R, D> {
    inner: R,
    digest: D,
}

impl<R: Read, D: digest::Update> HashingReader<R, D> {
    pub fn new(inner: R, digest: D) -> Self {
        Self { inner, digest }
    }

    pub fn into_digest(self) -> D {
        self.digest
    }
}

impl<R: Read, D: digest::Update> Read for HashingReader<R, D> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.digest.update(&buf[..n]);
        }
        Ok(n)
    }
}

/// Reads through to an inner reader while copying every byte read to a
/// sink, so the raw tarball bytes can be persisted to disk in the same
/// single streaming pass that unpacks and hashes them (no whole-tarball
/// buffering in memory).
pub struct TeeReader<R, W> {
    inner: R,
    sink: W,
}

impl<R: Read, W: io::Write> TeeReader<R, W> {
    pub fn new(inner: R, sink: W) -> Self {
        Self { inner, sink }
    }
}

impl<R: Read, W: io::Write> Read for TeeReader<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.sink.write_all(&buf[..n])?;
        }
        Ok(n)
    }
}

/// Unpack a gzip-over-ustar-tar stream into `dest`, stripping the
/// conventional leading `package/` path component and normalising file
/// modes (spec §4.4). Symlink entries are preserved as-is.
pub fn unpack_tarball<R: Read>(reader: &mut R, dest: &Path) -> io::Result<()> {
    let gz = GzDecoder::new(reader);
    let mut archive = Archive::new(gz);
    archive.set_preserve_permissions(false);
    archive.set_unpack_xattrs(false);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let raw_path = entry.path()?.into_owned();
        let Some(stripped) = strip_package_prefix(&raw_path) else {
            continue;
        };
        if stripped.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(&stripped);

        match entry.header().entry_type() {
            tar::EntryType::Directory => {
                fs::create_dir_all(&target)?;
                set_mode(&target, 0o755)?;
            }
            tar::EntryType::Symlink => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let link_target = entry
                    .link_name()?
                    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing symlink target"))?
                    .into_owned();
                let _ = fs::remove_file(&target);
                create_symlink(&link_target, &target)?;
            }
            tar::EntryType::Regular | tar::EntryType::Continuous => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let executable = entry.header().mode()? & 0o100 != 0;
                let mut out = fs::File::create(&target)?;
                io::copy(&mut entry, &mut out)?;
                set_mode(&target, if executable { 0o755 } else { 0o644 })?;
            }
            _ => {
                // Hard links, device nodes, fifos: not part of the npm tarball
                // convention; skip rather than fail the whole unpack.
            }
        }
    }

    Ok(())
}

/// Strip the conventional leading `package/` directory. Tarballs that for
/// whatever reason omit it are unpacked as-is (path unchanged).
fn strip_package_prefix(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(std::path::Component::Normal(first)) if first == "package" => {
            Some(components.as_path().to_path_buf())
        }
        _ => Some(path.to_path_buf()),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn build_tarball(files: &[(&str, &[u8], bool)]) -> Vec<u8> {
        let mut tar_bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut tar_bytes);
            for (path, contents, executable) in files {
                let mut header = tar::Header::new_gnu();
                header.set_size(contents.len() as u64);
                header.set_mode(if *executable { 0o755 } else { 0o644 });
                header.set_cksum();
                builder.append_data(&mut header, path, *contents).expect("append");
            }
            builder.finish().expect("finish tar");
        }
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(&tar_bytes).expect("write gz");
        gz.finish().expect("finish gz")
    }

    #[test]
    fn strips_package_prefix_and_normalises_modes() {
        let bytes = build_tarball(&[
            ("package/index.js", b"module.exports = 1;\n", false),
            ("package/bin/cli.js", b"#!/usr/bin/env node\n", true),
        ]);
        let dir = tempfile::tempdir().expect("tempdir");
        let mut reader = bytes.as_slice();
        unpack_tarball(&mut reader, dir.path()).expect("unpack");

        assert!(dir.path().join("index.js").is_file());
        assert!(dir.path().join("bin/cli.js").is_file());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let file_mode = fs::metadata(dir.path().join("index.js")).unwrap().permissions().mode() & 0o777;
            assert_eq!(file_mode, 0o644);
            let exec_mode = fs::metadata(dir.path().join("bin/cli.js")).unwrap().permissions().mode() & 0o777;
            assert_eq!(exec_mode, 0o755);
        }
    }

    #[test]
    fn unpacks_without_package_prefix_unchanged() {
        let bytes = build_tarball(&[("index.js", b"x", false)]);
        let dir = tempfile::tempdir().expect("tempdir");
        let mut reader = bytes.as_slice();
        unpack_tarball(&mut reader, dir.path()).expect("unpack");
        assert!(dir.path().join("index.js").is_file());
    }

    #[test]
    fn hashing_reader_observes_every_byte() {
        let data = b"hello world";
        let digest = crate::integrity::AnyDigest::for_algorithm("sha256").expect("sha256");
        let mut hashing = HashingReader::new(data.as_slice(), digest);
        let mut buf = Vec::new();
        hashing.read_to_end(&mut buf).expect("read");
        assert_eq!(buf, data);
        let encoded = hashing.into_digest().finalize_base64();
        assert!(!encoded.is_empty());
    }

    #[test]
    fn tee_reader_copies_every_byte_to_the_sink_unchanged() {
        let data = b"hello world";
        let mut sink = Vec::new();
        let mut teed = TeeReader::new(data.as_slice(), &mut sink);
        let mut buf = Vec::new();
        teed.read_to_end(&mut buf).expect("read");
        assert_eq!(buf, data);
        assert_eq!(sink, data);
    }
}
