use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use jio_error::{PackageManagerError, Result};

use crate::decode::{unpack_tarball, HashingReader};
use crate::integrity::{split_sri, AnyDigest};
use crate::lock::KeyLock;
use crate::paths;

/// Content-addressed package store (spec §4.4, C4). Entries are keyed by
/// `(name, version)`; once written they are immutable and shared across
/// every project on the machine.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn default_store() -> Self {
        Self::new(paths::default_store_root())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn package_dir(&self, name: &str, version: &str) -> PathBuf {
        paths::package_dir(&self.root, name, version)
    }

    /// Purely local existence check; never contacts the network.
    #[must_use]
    pub fn exists(&self, name: &str, version: &str) -> bool {
        let dir = self.package_dir(name, version);
        dir.is_dir() && paths::integrity_sidecar(&dir).is_file()
    }

    /// Read the sidecar integrity string for an existing entry.
    pub fn integrity(&self, name: &str, version: &str) -> Result<String> {
        let sidecar = paths::integrity_sidecar(&self.package_dir(name, version));
        fs::read_to_string(&sidecar)
            .map(|s| s.trim().to_string())
            .map_err(|e| PackageManagerError::Io(format!("{}: {e}", sidecar.display())))
    }

    /// Recompute the digest over the entry's persisted tarball bytes and
    /// compare it against `expected_integrity`, failing with
    /// `ErrIntegrity` on any mismatch (spec §4.6 Verify, §8 invariant 4).
    /// Unlike [`Self::integrity`], which only reads the cached sidecar
    /// string, this re-hashes the stored bytes so a tampered entry is
    /// actually caught rather than trusted.
    pub fn verify(&self, name: &str, version: &str, expected_integrity: &str) -> Result<()> {
        let package_dir = self.package_dir(name, version);
        let tarball_path = paths::tarball_sidecar(&package_dir);
        let mut tarball_file = fs::File::open(&tarball_path)
            .map_err(|e| PackageManagerError::Io(format!("{}: {e}", tarball_path.display())))?;

        let (algo, expected_b64) = split_sri(expected_integrity)?;
        let digest = AnyDigest::for_algorithm(algo).ok_or_else(|| {
            PackageManagerError::Integrity(format!("unsupported algorithm '{algo}'"), String::new())
        })?;

        let mut hashing = HashingReader::new(&mut tarball_file, digest);
        io::copy(&mut hashing, &mut io::sink()).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        let computed = hashing.into_digest().finalize_base64();

        if computed != expected_b64 {
            return Err(PackageManagerError::Integrity(name.to_string(), version.to_string()));
        }
        Ok(())
    }

    /// Consume a gzip-compressed tar stream, verify it against
    /// `expected_integrity` (an SRI string), and persist it under
    /// `(name, version)`. Concurrent callers for the same key serialise
    /// through a per-key file lock; distinct keys proceed independently.
    pub fn add<R: Read>(&self, name: &str, version: &str, reader: R, expected_integrity: &str) -> Result<()> {
        if self.exists(name, version) {
            return Ok(());
        }

        let lock_path = paths::lock_file(&self.root, name, version);
        let _guard = KeyLock::acquire(&lock_path)?;

        // Re-check after acquiring the lock: another process may have
        // finished materialising this key while we waited.
        if self.exists(name, version) {
            return Ok(());
        }

        let (algo, expected_b64) = split_sri(expected_integrity)?;
        let digest = AnyDigest::for_algorithm(algo).ok_or_else(|| {
            PackageManagerError::Integrity(format!("unsupported algorithm '{algo}'"), String::new())
        })?;

        let tmp_root = paths::tmp_root(&self.root);
        fs::create_dir_all(&tmp_root).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        let tmp_dir = tempfile::tempdir_in(&tmp_root).map_err(|e| PackageManagerError::Io(e.to_string()))?;

        // Unpack into `<tmp>/package/...` directly so the whole temp
        // directory becomes the final entry's layout (`<entry>/package/...`)
        // with a single rename, no post-hoc move needed.
        let staged = tmp_dir.path().join("package");
        fs::create_dir_all(&staged).map_err(|e| PackageManagerError::Io(e.to_string()))?;

        // Tee the raw (still gzip-compressed) bytes to a sidecar file as
        // they stream through, so `verify` can later recompute the digest
        // over the entry's originating tarball instead of trusting a
        // cached digest string.
        let tarball_sidecar = paths::tarball_sidecar(tmp_dir.path());
        let tarball_file = fs::File::create(&tarball_sidecar).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        let teed = crate::decode::TeeReader::new(reader, tarball_file);

        let mut hashing = HashingReader::new(teed, digest);
        if let Err(e) = unpack_tarball(&mut hashing, &staged) {
            return Err(PackageManagerError::Io(e.to_string()));
        }
        let computed = hashing.into_digest().finalize_base64();

        if computed != expected_b64 {
            // tmp_dir's Drop removes the temp directory; nothing partial is
            // ever visible under the store root.
            return Err(PackageManagerError::Integrity(name.to_string(), version.to_string()));
        }

        fs::write(paths::integrity_sidecar(tmp_dir.path()), expected_integrity)
            .map_err(|e| PackageManagerError::Io(e.to_string()))?;

        let final_dir = self.package_dir(name, version);
        if let Some(parent) = final_dir.parent() {
            fs::create_dir_all(parent).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        }
        // `into_path` disarms the temp directory's auto-delete so the
        // rename below hands off ownership cleanly; on failure the
        // directory is leaked into `.tmp/` rather than silently vanishing,
        // which is preferable to a torn rename.
        let tmp_path = tmp_dir.into_path();
        fs::rename(&tmp_path, &final_dir).map_err(|e| {
            let _ = fs::remove_dir_all(&tmp_path);
            PackageManagerError::Io(e.to_string())
        })?;

        Ok(())
    }

    /// Materialise the stored tree into `target_path`. No-op if it already
    /// refers to the same entry; otherwise atomically replaced.
    pub fn link(&self, name: &str, version: &str, target_path: &Path, mode: LinkMode) -> Result<()> {
        let source = self.package_dir(name, version).join("package");
        if !source.exists() {
            return Err(PackageManagerError::Io(format!(
                "store entry missing for {name}@{version}"
            )));
        }

        if Self::already_linked(&source, target_path, mode) {
            return Ok(());
        }

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        }
        Self::remove_existing(target_path)?;

        match mode {
            LinkMode::Symlink => crate::link::symlink_dir(&source, target_path),
            LinkMode::HardLink => crate::link::materialise_tree(&source, target_path),
        }
    }

    /// Link many `(name, version) -> target_path` placements concurrently.
    /// Mirrors the teacher's `PackageLinker::link_packages_batch`; the first
    /// failure is returned but sibling tasks are allowed to finish (the
    /// store has no shared mutable state across distinct keys).
    pub fn link_batch(&self, placements: &[(String, String, PathBuf, LinkMode)]) -> Result<()> {
        use rayon::prelude::*;
        placements
            .par_iter()
            .map(|(name, version, target, mode)| self.link(name, version, target, *mode))
            .collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    fn already_linked(source: &Path, target: &Path, mode: LinkMode) -> bool {
        match mode {
            LinkMode::Symlink => fs::read_link(target)
                .ok()
                .is_some_and(|existing| paths_equal(&existing, source)),
            LinkMode::HardLink => target.is_dir() && crate::link::same_tree(source, target),
        }
    }

    fn remove_existing(target: &Path) -> Result<()> {
        if target.is_symlink() || target.is_file() {
            fs::remove_file(target).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        } else if target.is_dir() {
            fs::remove_dir_all(target).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

fn paths_equal(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    HardLink,
    Symlink,
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use sha2::{Digest, Sha512};
    use std::io::Write;

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut tar_bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut tar_bytes);
            for (path, contents) in files {
                let mut header = tar::Header::new_gnu();
                header.set_size(contents.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, format!("package/{path}"), *contents).expect("append");
            }
            builder.finish().expect("finish tar");
        }
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(&tar_bytes).expect("write gz");
        gz.finish().expect("finish gz")
    }

    fn sri_for(bytes: &[u8]) -> String {
        let digest = Sha512::digest(bytes);
        format!("sha512-{}", base64::engine::general_purpose::STANDARD.encode(digest))
    }

    #[test]
    fn add_then_exists_then_link_hardlink() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(root.path().to_path_buf());
        let bytes = tarball(&[("index.js", b"module.exports = 1;\n")]);
        let integrity = sri_for(&bytes);

        store.add("left-pad", "1.3.1", bytes.as_slice(), &integrity).expect("add");
        assert!(store.exists("left-pad", "1.3.1"));
        assert_eq!(store.integrity("left-pad", "1.3.1").expect("integrity"), integrity);

        let target = root.path().join("project/node_modules/left-pad");
        store.link("left-pad", "1.3.1", &target, LinkMode::HardLink).expect("link");
        assert!(target.join("index.js").is_file());

        // Idempotent: a second link of the same entry to the same target is a no-op.
        store.link("left-pad", "1.3.1", &target, LinkMode::HardLink).expect("relink");
        assert!(target.join("index.js").is_file());
    }

    #[test]
    fn verify_recomputes_digest_over_persisted_tarball_bytes() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(root.path().to_path_buf());
        let bytes = tarball(&[("index.js", b"module.exports = 1;\n")]);
        let integrity = sri_for(&bytes);
        store.add("left-pad", "1.3.1", bytes.as_slice(), &integrity).expect("add");

        store.verify("left-pad", "1.3.1", &integrity).expect("verify succeeds on untampered entry");
    }

    #[test]
    fn verify_fails_when_persisted_tarball_is_tampered_with() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(root.path().to_path_buf());
        let bytes = tarball(&[("index.js", b"module.exports = 1;\n")]);
        let integrity = sri_for(&bytes);
        store.add("left-pad", "1.3.1", bytes.as_slice(), &integrity).expect("add");

        // Tamper with the persisted tarball bytes directly; the `.integrity`
        // sidecar is left untouched, so a check that only reads the sidecar
        // would not catch this.
        let tarball_path = paths::tarball_sidecar(&store.package_dir("left-pad", "1.3.1"));
        let mut corrupted = fs::read(&tarball_path).expect("read tarball sidecar");
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;
        fs::write(&tarball_path, &corrupted).expect("write corrupted tarball");

        let err = store
            .verify("left-pad", "1.3.1", &integrity)
            .expect_err("tampered tarball must fail verification");
        assert!(matches!(err, PackageManagerError::Integrity(_, _)));
    }

    #[test]
    fn add_rejects_digest_mismatch_and_leaves_no_entry() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(root.path().to_path_buf());
        let bytes = tarball(&[("index.js", b"module.exports = 1;\n")]);

        let err = store
            .add("left-pad", "1.3.1", bytes.as_slice(), "sha512-not-the-real-digest")
            .expect_err("mismatched integrity must fail");
        assert!(matches!(err, PackageManagerError::Integrity(_, _)));
        assert!(!store.exists("left-pad", "1.3.1"));
        assert!(!store.package_dir("left-pad", "1.3.1").exists());
    }

    #[test]
    fn add_is_idempotent_for_an_existing_key() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(root.path().to_path_buf());
        let bytes = tarball(&[("index.js", b"x")]);
        let integrity = sri_for(&bytes);

        store.add("left-pad", "1.3.1", bytes.as_slice(), &integrity).expect("first add");
        // Second add call for the same key must not error even with a
        // stream that would otherwise fail to parse.
        store.add("left-pad", "1.3.1", std::io::empty(), &integrity).expect("second add is a no-op");
    }

    #[test]
    fn link_fails_when_store_entry_missing() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(root.path().to_path_buf());
        let target = root.path().join("node_modules/missing");
        let err = store
            .link("missing", "1.0.0", &target, LinkMode::HardLink)
            .expect_err("missing entry must fail");
        assert!(matches!(err, PackageManagerError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn link_symlink_points_at_store_entry() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(root.path().to_path_buf());
        let bytes = tarball(&[("index.js", b"x")]);
        let integrity = sri_for(&bytes);
        store.add("left-pad", "1.3.1", bytes.as_slice(), &integrity).expect("add");

        let target = root.path().join("project/node_modules/.jio/left-pad@1.3.1");
        store.link("left-pad", "1.3.1", &target, LinkMode::Symlink).expect("link");
        assert!(target.is_symlink());
        assert!(target.join("index.js").is_file());
    }
}
