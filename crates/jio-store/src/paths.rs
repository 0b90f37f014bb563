use std::path::{Path, PathBuf};

/// Encode a (possibly scoped) package name so it never introduces a path
/// separator: `@scope/name` becomes `@scope+name` (spec §4.4).
#[must_use]
pub fn encode_name(name: &str) -> String {
    name.replace('/', "+")
}

#[must_use]
pub fn default_store_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(jio_constants::STORE_DIRNAME)
}

/// Directory holding the unpacked tree for `(name, version)`.
#[must_use]
pub fn package_dir(store_root: &Path, name: &str, version: &str) -> PathBuf {
    store_root.join(encode_name(name)).join(version)
}

/// Sidecar file recording the integrity digest for a store entry.
#[must_use]
pub fn integrity_sidecar(package_dir: &Path) -> PathBuf {
    package_dir.join(".integrity")
}

/// Sidecar holding the raw (gzip-compressed) tarball bytes an entry was
/// unpacked from, kept so a later `verify` can recompute the digest over
/// the originating bytes instead of trusting the `.integrity` sidecar
/// (spec §4.6 Verify, §8 invariant 4).
#[must_use]
pub fn tarball_sidecar(package_dir: &Path) -> PathBuf {
    package_dir.join(".tarball")
}

#[must_use]
pub fn tmp_root(store_root: &Path) -> PathBuf {
    store_root.join(".tmp")
}

#[must_use]
pub fn locks_root(store_root: &Path) -> PathBuf {
    store_root.join(".locks")
}

#[must_use]
pub fn lock_file(store_root: &Path, name: &str, version: &str) -> PathBuf {
    locks_root(store_root).join(format!("{}@{version}.lock", encode_name(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_name_has_no_separator() {
        let encoded = encode_name("@types/node");
        assert!(!encoded.contains('/'));
        assert_eq!(encoded, "@types+node");
    }
}
