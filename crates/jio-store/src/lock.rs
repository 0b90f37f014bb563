use std::fs::{self, File, OpenOptions};
use std::path::Path;

use fs2::FileExt;

use jio_error::{PackageManagerError, Result};

/// Advisory per-key file lock, held for the duration of a single `add`.
/// Readers never take this lock (spec §5 shared-resource policy).
pub struct KeyLock {
    file: File,
}

impl KeyLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| PackageManagerError::Io(e.to_string()))?;
        file.lock_exclusive()
            .map_err(|e| PackageManagerError::Concurrent(e.to_string()))?;
        Ok(Self { file })
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
