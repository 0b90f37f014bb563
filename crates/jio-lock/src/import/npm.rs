use indexmap::IndexMap;
use serde::Deserialize;

use jio_error::{PackageManagerError, Result};
use jio_resolver::ResolvedPackage;

/// One `packages["node_modules/..."]` entry of an npm v2/v3 lockfile.
#[derive(Debug, Deserialize)]
struct NpmEntry {
    version: Option<String>,
    resolved: Option<String>,
    integrity: Option<String>,
    #[serde(default)]
    dependencies: IndexMap<String, String>,
    #[serde(default)]
    dev: bool,
    #[serde(default)]
    optional: bool,
}

#[derive(Debug, Deserialize)]
struct NpmLock {
    #[serde(default)]
    packages: IndexMap<String, NpmEntry>,
}

/// Parse an npm v2/v3 `package-lock.json`, collapsing every install path
/// that shares `(name, version, integrity)` into one identity-keyed entry
/// (spec §4.6 Import). The root entry (key `""`) carries no dist info and
/// is skipped; its dependency ranges come from the project's own manifest,
/// not from the foreign lock.
pub fn parse(content: &str) -> Result<IndexMap<String, ResolvedPackage>> {
    let lock: NpmLock = serde_json::from_str(content).map_err(|e| PackageManagerError::Lock(e.to_string()))?;

    // path -> name, so duplicate paths for the same (name, version,
    // integrity) merge into a single identity key.
    let mut merged: IndexMap<String, (ResolvedPackage, bool, bool)> = IndexMap::new();

    let mut paths: Vec<&String> = lock.packages.keys().collect();
    paths.sort();

    for path in paths {
        if path.is_empty() {
            continue;
        }
        let entry = &lock.packages[path];
        let Some(version) = &entry.version else { continue };
        let name = name_from_path(path);
        let identity_key = format!("{name}@{version}");

        let integrity = entry.integrity.clone().unwrap_or_default();
        let resolved = entry.resolved.clone().unwrap_or_default();

        merged
            .entry(identity_key)
            .and_modify(|(pkg, all_dev, all_optional)| {
                for (k, v) in &entry.dependencies {
                    pkg.dependencies.entry(k.clone()).or_insert_with(|| v.clone());
                }
                *all_dev &= entry.dev;
                *all_optional &= entry.optional;
            })
            .or_insert_with(|| {
                (
                    ResolvedPackage {
                        name: name.clone(),
                        version: version.clone(),
                        resolved,
                        integrity,
                        dependencies: entry.dependencies.clone(),
                        dev: entry.dev,
                        optional: entry.optional,
                    },
                    entry.dev,
                    entry.optional,
                )
            });
    }

    let mut out = IndexMap::new();
    for (key, (mut pkg, all_dev, all_optional)) in merged {
        pkg.dev = all_dev;
        pkg.optional = all_optional;
        out.insert(key, pkg);
    }
    Ok(out)
}

/// `node_modules/a/node_modules/@scope/b` -> `@scope/b`.
fn name_from_path(path: &str) -> String {
    let marker = "node_modules/";
    match path.rfind(marker) {
        Some(idx) => path[idx + marker.len()..].to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_scoped_and_nested_entries() {
        let content = r#"{
            "packages": {
                "": {"name": "root"},
                "node_modules/react": {
                    "version": "18.0.0",
                    "resolved": "https://registry.npmjs.org/react/-/react-18.0.0.tgz",
                    "integrity": "sha512-abc"
                },
                "node_modules/a/node_modules/react": {
                    "version": "18.0.0",
                    "resolved": "https://registry.npmjs.org/react/-/react-18.0.0.tgz",
                    "integrity": "sha512-abc",
                    "dev": true
                }
            }
        }"#;
        let parsed = parse(content).expect("parses");
        let entry = parsed.get("react@18.0.0").expect("present");
        assert_eq!(entry.integrity, "sha512-abc");
        // One occurrence was not dev, so the merged entry is not dev-only.
        assert!(!entry.dev);
    }
}
