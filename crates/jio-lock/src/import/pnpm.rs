use indexmap::IndexMap;
use serde::Deserialize;

use jio_error::{PackageManagerError, Result};
use jio_resolver::ResolvedPackage;

#[derive(Debug, Deserialize, Default)]
struct Resolution {
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    tarball: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PnpmPackageEntry {
    #[serde(default)]
    resolution: Resolution,
    #[serde(default)]
    dependencies: IndexMap<String, String>,
    #[serde(default)]
    dev: bool,
}

#[derive(Debug, Deserialize)]
struct PnpmLock {
    #[serde(default)]
    packages: IndexMap<String, PnpmPackageEntry>,
}

/// Parse a pnpm `pnpm-lock.yaml`'s `packages:` map. pnpm keys combine a
/// leading slash, the name/version, and an optional parenthesised peer
/// suffix (`/react@18.0.0(react-dom@18.0.0)`); we strip both to recover the
/// plain identity key spec §4.6 uses.
pub fn parse(content: &str) -> Result<IndexMap<String, ResolvedPackage>> {
    let lock: PnpmLock = serde_yaml::from_str(content).map_err(|e| PackageManagerError::Lock(e.to_string()))?;

    let mut out = IndexMap::new();
    let mut raw_keys: Vec<&String> = lock.packages.keys().collect();
    raw_keys.sort();

    for raw_key in raw_keys {
        let entry = &lock.packages[raw_key];
        let Some((name, version)) = split_identity(raw_key) else {
            continue;
        };
        let identity_key = format!("{name}@{version}");
        let integrity = entry
            .resolution
            .integrity
            .clone()
            .unwrap_or_default();
        let resolved = entry.resolution.tarball.clone().unwrap_or_default();

        out.insert(
            identity_key,
            ResolvedPackage {
                name,
                version,
                resolved,
                integrity,
                dependencies: entry.dependencies.clone(),
                dev: entry.dev,
                optional: false,
            },
        );
    }

    Ok(out)
}

/// `/react@18.0.0(react-dom@18.0.0)` -> `("react", "18.0.0")`;
/// `/@scope/name@1.2.3` -> `("@scope/name", "1.2.3")`.
fn split_identity(raw_key: &str) -> Option<(String, String)> {
    let without_peers = raw_key.split('(').next().unwrap_or(raw_key);
    let without_slash = without_peers.strip_prefix('/').unwrap_or(without_peers);

    let at_positions: Vec<usize> = without_slash.match_indices('@').map(|(i, _)| i).collect();
    let split_at = at_positions.into_iter().filter(|&i| i != 0).next_back()?;
    let name = without_slash[..split_at].to_string();
    let version = without_slash[split_at + 1..].to_string();
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_scoped_keys() {
        let content = concat!(
            "packages:\n",
            "  /react@18.0.0:\n",
            "    resolution: {integrity: sha512-abc, tarball: https://example.com/react-18.0.0.tgz}\n",
            "  /@types/react@18.0.0:\n",
            "    resolution: {integrity: sha512-def}\n",
            "    dependencies:\n",
            "      '@types/scheduler': ^0.16.0\n",
        );
        let parsed = parse(content).expect("parses");
        assert_eq!(parsed.get("react@18.0.0").expect("present").integrity, "sha512-abc");
        let scoped = parsed.get("@types/react@18.0.0").expect("present");
        assert_eq!(scoped.dependencies.get("@types/scheduler").map(String::as_str), Some("^0.16.0"));
    }

    #[test]
    fn strips_peer_suffix() {
        let content = concat!(
            "packages:\n",
            "  /react@18.0.0(react-dom@18.0.0):\n",
            "    resolution: {integrity: sha512-abc}\n",
        );
        let parsed = parse(content).expect("parses");
        assert!(parsed.contains_key("react@18.0.0"));
    }
}
