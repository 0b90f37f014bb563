//! `uninstall <name>` (spec §4.8): drop the manifest entry, the on-disk
//! placement, and the lock entry together.

use std::path::Path;

use jio_error::{PackageManagerError, Result};
use jio_lock::LockFile;
use jio_manifest::{read_package_json, write_package_json};

use super::Orchestrator;

impl Orchestrator {
    pub fn uninstall(&self, project_dir: &Path, name: &str) -> Result<()> {
        let mut manifest = read_package_json(project_dir)?;
        if manifest.has_dependency(name).is_none() {
            return Err(PackageManagerError::InvalidPackageSpec(format!(
                "'{name}' is not a declared dependency"
            )));
        }
        manifest.remove_dependency(name);
        write_package_json(project_dir, &manifest)?;

        let placement_dir = project_dir.join("node_modules").join(name);
        if placement_dir.exists() {
            std::fs::remove_dir_all(&placement_dir).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        }

        let lock_path = self.lock_path(project_dir);
        if LockFile::exists_at(&lock_path) {
            let mut lock = LockFile::load(&lock_path)?;
            lock.packages.retain(|_, pkg| pkg.name != name);
            lock.dependencies.shift_remove(name);
            lock.dev_dependencies.shift_remove(name);
            lock.optional_dependencies.shift_remove(name);
            lock.save(&lock_path)?;
        }

        jio_logger::finish(&format!("Removed '{name}'"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use indexmap::IndexMap;
    use jio_lock::LockFile;
    use jio_resolver::ResolvedPackage;

    fn write_manifest(project_dir: &Path) {
        std::fs::write(
            project_dir.join("package.json"),
            r#"{"name": "app", "version": "1.0.0", "dependencies": {"left-pad": "^1.3.1"}}"#,
        )
        .expect("write manifest");
    }

    fn write_lock(project_dir: &Path) {
        let mut dependencies = IndexMap::new();
        dependencies.insert("left-pad".to_string(), "^1.3.1".to_string());
        let mut packages = IndexMap::new();
        packages.insert(
            "left-pad@1.3.1".to_string(),
            ResolvedPackage {
                name: "left-pad".to_string(),
                version: "1.3.1".to_string(),
                resolved: "https://registry.npmjs.org/left-pad/-/left-pad-1.3.1.tgz".to_string(),
                integrity: "sha512-x".to_string(),
                dependencies: IndexMap::new(),
                dev: false,
                optional: false,
            },
        );
        let lock = LockFile {
            name: "app".to_string(),
            version: "1.0.0".to_string(),
            dependencies,
            dev_dependencies: IndexMap::new(),
            optional_dependencies: IndexMap::new(),
            packages,
        };
        lock.save(&project_dir.join(jio_constants::NATIVE_LOCKFILE_NAME)).expect("save lock");
    }

    #[test]
    fn removes_manifest_entry_placement_and_lock_entry() {
        let project = tempfile::tempdir().expect("tempdir");
        write_manifest(project.path());
        write_lock(project.path());
        std::fs::create_dir_all(project.path().join("node_modules/left-pad")).expect("placement dir");

        let orchestrator = Orchestrator::new(Config::default());
        orchestrator.uninstall(project.path(), "left-pad").expect("uninstall");

        let manifest = read_package_json(project.path()).expect("read manifest");
        assert!(manifest.has_dependency("left-pad").is_none());
        assert!(!project.path().join("node_modules/left-pad").exists());

        let lock = LockFile::load(&project.path().join(jio_constants::NATIVE_LOCKFILE_NAME)).expect("load lock");
        assert!(lock.packages.is_empty());
        assert!(!lock.dependencies.contains_key("left-pad"));
    }

    #[test]
    fn rejects_a_name_that_is_not_a_declared_dependency() {
        let project = tempfile::tempdir().expect("tempdir");
        write_manifest(project.path());

        let orchestrator = Orchestrator::new(Config::default());
        let err = orchestrator
            .uninstall(project.path(), "not-installed")
            .expect_err("must reject unknown package");
        assert!(matches!(err, PackageManagerError::InvalidPackageSpec(_)));
    }
}
