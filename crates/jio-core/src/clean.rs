use std::fs;
use std::path::{Path, PathBuf};

use jio_error::{PackageManagerError, Result};
use jio_store::ContentStore;

pub struct CleanManager;

impl CleanManager {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn clean_cache(&self, store: &ContentStore) -> Result<()> {
        let store_path = store.root();

        if !store_path.exists() {
            jio_logger::info("No package cache found to clean.");
            return Ok(());
        }

        jio_logger::status("Cleaning package cache...");
        let cache_size = Self::directory_size(store_path)?;

        fs::remove_dir_all(store_path)
            .map_err(|e| PackageManagerError::Io(format!("failed to clean cache: {e}")))?;
        fs::create_dir_all(store_path)
            .map_err(|e| PackageManagerError::Io(format!("failed to recreate cache dir: {e}")))?;

        let size_mb = cache_size as f64 / 1024.0 / 1024.0;
        jio_logger::finish(&format!("Cleaned {size_mb:.2} MB of cached packages"));
        Ok(())
    }

    pub fn clean_node_modules(&self, project_dir: &str) -> Result<()> {
        let node_modules_path = PathBuf::from(project_dir).join("node_modules");

        if !node_modules_path.exists() {
            jio_logger::info("No node_modules directory found to clean.");
            return Ok(());
        }

        jio_logger::status("Cleaning node_modules...");
        let modules_size = Self::directory_size(&node_modules_path)?;

        fs::remove_dir_all(&node_modules_path)
            .map_err(|e| PackageManagerError::Io(format!("failed to clean node_modules: {e}")))?;

        let size_mb = modules_size as f64 / 1024.0 / 1024.0;
        jio_logger::finish(&format!("Cleaned {size_mb:.2} MB from node_modules"));
        Ok(())
    }

    fn directory_size(dir: &Path) -> Result<u64> {
        let mut total = 0u64;
        if dir.is_dir() {
            for entry in
                fs::read_dir(dir).map_err(|e| PackageManagerError::Io(format!("{}: {e}", dir.display())))?
            {
                let entry = entry.map_err(|e| PackageManagerError::Io(e.to_string()))?;
                let path = entry.path();
                if path.is_dir() {
                    total += Self::directory_size(&path)?;
                } else {
                    let metadata = fs::metadata(&path).map_err(|e| PackageManagerError::Io(e.to_string()))?;
                    total += metadata.len();
                }
            }
        }
        Ok(total)
    }
}

impl Default for CleanManager {
    fn default() -> Self {
        Self::new()
    }
}
