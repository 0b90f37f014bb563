//! `prune [--production]` (spec §4.8): delete any `node_modules/` placement
//! whose package name isn't present in the lock file's package set.

use std::collections::HashSet;
use std::path::Path;

use jio_error::{PackageManagerError, Result};
use jio_lock::LockFile;

use super::Orchestrator;

impl Orchestrator {
    pub fn prune(&self, project_dir: &Path, production: bool) -> Result<()> {
        let lock_path = self.lock_path(project_dir);
        if !LockFile::exists_at(&lock_path) {
            return Err(PackageManagerError::Lock("no lock file present; nothing to prune".to_string()));
        }
        let lock = LockFile::load(&lock_path)?;

        let required: HashSet<String> = lock
            .packages
            .values()
            .filter(|pkg| !production || !pkg.dev)
            .map(|pkg| pkg.name.clone())
            .collect();

        let node_modules = project_dir.join("node_modules");
        let mut removed = 0usize;
        prune_dir(&node_modules, &required, &mut removed)?;

        jio_logger::finish(&format!("Pruned {removed} extraneous package(s)"));
        Ok(())
    }
}

fn prune_dir(dir: &Path, required: &HashSet<String>, removed: &mut usize) -> Result<()> {
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
            prune_dir(&path, required, removed)?;
            continue;
        }
        if !path.is_dir() && !path.is_symlink() {
            continue;
        }
        let package_name = match path.parent().and_then(|p| p.file_name()) {
            Some(scope) if scope.to_string_lossy().starts_with('@') => {
                format!("{}/{}", scope.to_string_lossy(), name)
            }
            _ => name.to_string(),
        };
        if required.contains(&package_name) {
            let nested = path.join("node_modules");
            if nested.is_dir() {
                prune_dir(&nested, required, removed)?;
            }
        } else {
            std::fs::remove_dir_all(&path).map_err(|e| PackageManagerError::Io(e.to_string()))?;
            *removed += 1;
        }
    }
    Ok(())
}
