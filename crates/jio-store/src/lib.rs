//! Content-addressed package store (spec §4.4, C4): a shared on-disk CAS
//! keyed by `(name, version)`, with hard-link/symlink materialisation into
//! per-project `node_modules/`.

mod decode;
mod integrity;
mod link;
mod lock;
pub mod paths;

pub use store::{ContentStore, LinkMode};

mod store;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, format!("package/{path}"), *contents)
                .expect("append");
        }
        let tar_bytes = builder.into_inner().expect("finish tar");

        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        gz.write_all(&tar_bytes).expect("gzip write");
        gz.finish().expect("gzip finish")
    }

    fn sha512_sri(bytes: &[u8]) -> String {
        use sha2::{Digest, Sha512};
        let digest = Sha512::digest(bytes);
        format!(
            "sha512-{}",
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, digest)
        )
    }

    #[test]
    fn add_then_link_round_trips_file_contents() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(tmp.path().join("store"));

        let tarball = make_tarball(&[("index.js", b"module.exports = 1;\n")]);
        let sri = sha512_sri(&tarball);

        store
            .add("left-pad", "1.3.1", tarball.as_slice(), &sri)
            .expect("add succeeds");
        assert!(store.exists("left-pad", "1.3.1"));
        assert_eq!(store.integrity("left-pad", "1.3.1").expect("sidecar"), sri);

        let target = tmp.path().join("project/node_modules/left-pad");
        store
            .link("left-pad", "1.3.1", &target, LinkMode::HardLink)
            .expect("link succeeds");
        let contents = std::fs::read_to_string(target.join("index.js")).expect("read linked file");
        assert_eq!(contents, "module.exports = 1;\n");
    }

    #[test]
    fn add_rejects_tampered_bytes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = ContentStore::new(tmp.path().join("store"));

        let tarball = make_tarball(&[("index.js", b"ok\n")]);
        let wrong_sri = sha512_sri(b"not the tarball");

        let err = store
            .add("left-pad", "1.3.1", tarball.as_slice(), &wrong_sri)
            .expect_err("integrity mismatch must fail");
        assert!(matches!(err, jio_error::PackageManagerError::Integrity(..)));
        assert!(!store.exists("left-pad", "1.3.1"));
    }

    #[test]
    fn scoped_package_path_has_no_separator() {
        let root = std::path::Path::new("/store");
        let dir = paths::package_dir(root, "@types/node", "20.0.0");
        assert_eq!(dir, std::path::Path::new("/store/@types+node/20.0.0"));
    }
}
