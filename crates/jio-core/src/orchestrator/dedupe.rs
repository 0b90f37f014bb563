//! `dedupe` (spec §4.8): among multiple on-disk placements of the same
//! package name, keep the version with the most consumers at the shallowest
//! spot and remove the rest — the inverse of what `install` nests when a
//! version conflict forces a private copy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jio_error::{PackageManagerError, Result};
use jio_lock::LockFile;
use jio_resolver::satisfies_preferred;

use super::Orchestrator;

impl Orchestrator {
    pub fn dedupe(&self, project_dir: &Path) -> Result<()> {
        let lock_path = self.lock_path(project_dir);
        if !LockFile::exists_at(&lock_path) {
            return Err(PackageManagerError::Lock("no lock file present; nothing to dedupe".to_string()));
        }
        let lock = LockFile::load(&lock_path)?;

        // Every (requirer, name, range) edge in the graph, used to count how
        // many declared ranges a given installed version actually satisfies.
        let mut edges: Vec<(String, String)> = Vec::new();
        for (name, range) in lock
            .dependencies
            .iter()
            .chain(lock.dev_dependencies.iter())
            .chain(lock.optional_dependencies.iter())
        {
            edges.push((name.clone(), range.clone()));
        }
        for pkg in lock.packages.values() {
            for (name, range) in &pkg.dependencies {
                edges.push((name.clone(), range.clone()));
            }
        }

        let node_modules = project_dir.join("node_modules");
        let placements = find_placements(&node_modules)?;

        let mut by_name: HashMap<String, Vec<(usize, PathBuf)>> = HashMap::new();
        for (name, depth, path) in placements {
            by_name.entry(name).or_default().push((depth, path));
        }

        let mut removed = 0usize;
        for (name, group) in by_name {
            if group.len() <= 1 {
                continue;
            }
            let mut scored: Vec<(usize, usize, PathBuf, Option<jio_semver::Version>)> = group
                .into_iter()
                .map(|(depth, path)| {
                    let version = installed_version(&path);
                    let consumers = version
                        .as_ref()
                        .map(|v| {
                            edges
                                .iter()
                                .filter(|(n, r)| *n == name && satisfies_preferred(r, v))
                                .count()
                        })
                        .unwrap_or(0);
                    (consumers, depth, path, version)
                })
                .collect();

            // Winner: most consumers, then highest version, then shallowest path.
            scored.sort_by(|a, b| {
                b.0.cmp(&a.0).then(b.3.cmp(&a.3)).then(a.1.cmp(&b.1))
            });

            for (_, _, path, _) in scored.into_iter().skip(1) {
                if path.exists() {
                    std::fs::remove_dir_all(&path).map_err(|e| PackageManagerError::Io(e.to_string()))?;
                    removed += 1;
                }
            }
        }

        jio_logger::finish(&format!("Removed {removed} duplicate placement(s)"));
        Ok(())
    }
}

fn installed_version(package_dir: &Path) -> Option<jio_semver::Version> {
    let content = std::fs::read_to_string(package_dir.join("package.json")).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    let version_str = value.get("version")?.as_str()?;
    jio_semver::parse_version(version_str).ok()
}

/// Every directory under `node_modules` that looks like a package
/// placement, as `(name, depth, path)`. Skips `.bin` and the strict layout's
/// private `.jio` store of per-identity slots.
fn find_placements(node_modules: &Path) -> Result<Vec<(String, usize, PathBuf)>> {
    let mut out = Vec::new();
    walk(node_modules, 0, &mut out)?;
    Ok(out)
}

fn walk(dir: &Path, depth: usize, out: &mut Vec<(String, usize, PathBuf)>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| PackageManagerError::Io(e.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|e| PackageManagerError::Io(e.to_string()))?;
        let path = entry.path();
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if name == ".bin" || name == ".jio" {
            continue;
        }
        if name.starts_with('@') {
            walk(&path, depth, out)?;
            continue;
        }
        if path.is_dir() || path.is_symlink() {
            let package_name = match path.parent().and_then(|p| p.file_name()) {
                Some(scope) if scope.to_string_lossy().starts_with('@') => {
                    format!("{}/{}", scope.to_string_lossy(), name)
                }
                _ => name.to_string(),
            };
            out.push((package_name, depth, path.clone()));
            let nested = path.join("node_modules");
            if nested.is_dir() {
                walk(&nested, depth + 1, out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_package(dir: &Path, name: &str, version: &str) {
        std::fs::create_dir_all(dir).expect("create package dir");
        std::fs::write(dir.join("package.json"), format!(r#"{{"name": "{name}", "version": "{version}"}}"#))
            .expect("write manifest");
    }

    #[test]
    fn find_placements_skips_bin_and_private_store_dirs() {
        let root = tempfile::tempdir().expect("tempdir");
        let node_modules = root.path().join("node_modules");
        write_package(&node_modules.join("left-pad"), "left-pad", "1.3.1");
        std::fs::create_dir_all(node_modules.join(".bin")).expect("bin dir");
        std::fs::create_dir_all(node_modules.join(".jio").join("util@1.0.0")).expect("private dir");

        let placements = find_placements(&node_modules).expect("find placements");
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].0, "left-pad");
        assert_eq!(placements[0].1, 0);
    }

    #[test]
    fn find_placements_reports_scoped_name_and_nested_depth() {
        let root = tempfile::tempdir().expect("tempdir");
        let node_modules = root.path().join("node_modules");
        write_package(&node_modules.join("@scope/pkg"), "@scope/pkg", "1.0.0");
        write_package(
            &node_modules.join("left-pad").join("node_modules").join("util"),
            "util",
            "2.0.0",
        );

        let placements = find_placements(&node_modules).expect("find placements");
        let names: Vec<&str> = placements.iter().map(|(n, _, _)| n.as_str()).collect();
        assert!(names.contains(&"@scope/pkg"));
        let nested_util = placements.iter().find(|(n, _, _)| n == "util").expect("nested util");
        assert_eq!(nested_util.1, 1);
    }

    #[test]
    fn installed_version_reads_package_json() {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = root.path().join("left-pad");
        write_package(&dir, "left-pad", "1.3.1");
        let version = installed_version(&dir).expect("version parsed");
        assert_eq!(version, jio_semver::parse_version("1.3.1").expect("parse"));
    }

    #[test]
    fn installed_version_is_none_without_manifest() {
        let root = tempfile::tempdir().expect("tempdir");
        assert!(installed_version(root.path()).is_none());
    }
}
