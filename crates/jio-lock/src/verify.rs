use jio_error::{PackageManagerError, Result};
use jio_store::ContentStore;

use crate::native::LockFile;

/// One entry's verification outcome, for the orchestrator's `ci` flow to
/// report before deciding whether to download anything (spec §4.6 Verify).
#[derive(Debug)]
pub enum VerifyOutcome {
    /// The store already has this entry and its digest matches the lock.
    Present,
    /// The store is missing this entry; the caller must fetch it through
    /// the registry, then re-verify.
    Missing,
}

/// Check every lock entry against the local store. Never downloads
/// anything itself — that is the orchestrator's job once it knows which
/// entries are `Missing` — but always fails fast on a digest mismatch,
/// since that can never be repaired by re-downloading the same bytes.
///
/// Recomputes the digest over the entry's persisted tarball bytes
/// (`ContentStore::verify`) rather than trusting the cached `.integrity`
/// sidecar, so a store entry tampered with after it was written is caught
/// here instead of silently passing (spec §4.6 Verify, §8 invariant 4).
pub fn verify_entry(store: &ContentStore, key: &str, name: &str, version: &str, integrity: &str) -> Result<VerifyOutcome> {
    if !store.exists(name, version) {
        return Ok(VerifyOutcome::Missing);
    }
    if let Err(e) = store.verify(name, version, integrity) {
        return match e {
            PackageManagerError::Integrity(_, _) => Err(PackageManagerError::Integrity(key.to_string(), version.to_string())),
            other => Err(other),
        };
    }
    Ok(VerifyOutcome::Present)
}

/// Verify every entry in `lock` against `store`. Returns the identity keys
/// that must be (re-)downloaded. Stops at the first integrity mismatch —
/// per spec §7, an integrity failure is always fatal and `node_modules/`
/// must not be touched.
pub fn verify_lock(store: &ContentStore, lock: &LockFile) -> Result<Vec<String>> {
    let mut missing = Vec::new();
    for (key, entry) in &lock.packages {
        match verify_entry(store, key, &entry.name, &entry.version, &entry.integrity)? {
            VerifyOutcome::Present => {}
            VerifyOutcome::Missing => missing.push(key.clone()),
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jio_store::LinkMode;
    use std::io::Write;

    fn tarball(contents: &[u8]) -> Vec<u8> {
        let mut tar_bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut tar_bytes);
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, "package/index.js", contents).expect("append");
            builder.finish().expect("finish tar");
        }
        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        gz.write_all(&tar_bytes).expect("gzip write");
        gz.finish().expect("gzip finish")
    }

    fn sri_for(bytes: &[u8]) -> String {
        use sha2::{Digest, Sha512};
        let digest = Sha512::digest(bytes);
        format!("sha512-{}", base64::Engine::encode(&base64::engine::general_purpose::STANDARD, digest))
    }

    #[test]
    fn verify_entry_passes_for_an_untampered_store_entry() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(tmp.path().join("store"));
        let bytes = tarball(b"module.exports = 1;\n");
        let integrity = sri_for(&bytes);
        store.add("left-pad", "1.3.1", bytes.as_slice(), &integrity).expect("add");

        let outcome = verify_entry(&store, "left-pad@1.3.1", "left-pad", "1.3.1", &integrity).expect("verify");
        assert!(matches!(outcome, VerifyOutcome::Present));
    }

    #[test]
    fn verify_entry_reports_missing_when_store_lacks_the_entry() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(tmp.path().join("store"));

        let outcome = verify_entry(&store, "left-pad@1.3.1", "left-pad", "1.3.1", "sha512-whatever").expect("verify");
        assert!(matches!(outcome, VerifyOutcome::Missing));
    }

    /// Mirrors the §8 scenario 2 end-to-end case: a store entry is tampered
    /// with after being written, and `ci`'s verify pass must still catch it
    /// even though the cached `.integrity` sidecar was never touched.
    #[test]
    fn verify_entry_fails_when_tarball_bytes_are_tampered_after_the_fact() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(tmp.path().join("store"));
        let bytes = tarball(b"module.exports = 1;\n");
        let integrity = sri_for(&bytes);
        store.add("left-pad", "1.3.1", bytes.as_slice(), &integrity).expect("add");

        // Link so the tampering is observable end to end, then corrupt the
        // persisted tarball sidecar directly (not the unpacked tree or the
        // `.integrity` sidecar, which a naive implementation would still trust).
        let target = tmp.path().join("project/node_modules/left-pad");
        store.link("left-pad", "1.3.1", &target, LinkMode::HardLink).expect("link");

        let tarball_path = store.package_dir("left-pad", "1.3.1").join(".tarball");
        let mut corrupted = std::fs::read(&tarball_path).expect("read tarball sidecar");
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;
        std::fs::write(&tarball_path, &corrupted).expect("write corrupted tarball");

        let err = verify_entry(&store, "left-pad@1.3.1", "left-pad", "1.3.1", &integrity)
            .expect_err("tampered store entry must fail verification");
        assert!(matches!(err, PackageManagerError::Integrity(_, _)));
    }
}
