use std::fs;
use std::path::Path;

use jio_error::{PackageManagerError, Result};

/// Single symlink from `target` to the store entry (strict layout, spec §4.7).
pub fn symlink_dir(source: &Path, target: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, target).map_err(|e| PackageManagerError::Io(e.to_string()))
    }
    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_dir(source, target).map_err(|e| PackageManagerError::Io(e.to_string()))
    }
}

/// Recreate `source`'s tree at `target`: reflink/hard-link every regular
/// file, recreate directories and symlinks, falling back to a byte copy
/// when the filesystem can do neither (spec §4.4 hard-link mode).
pub fn materialise_tree(source: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(target).map_err(|e| PackageManagerError::Io(e.to_string()))?;
    for entry in walk(source)? {
        let rel = entry.strip_prefix(source).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        let dest = target.join(rel);
        let file_type = fs::symlink_metadata(&entry)
            .map_err(|e| PackageManagerError::Io(e.to_string()))?
            .file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&dest).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        } else if file_type.is_symlink() {
            let link_target = fs::read_link(&entry).map_err(|e| PackageManagerError::Io(e.to_string()))?;
            let _ = fs::remove_file(&dest);
            #[cfg(unix)]
            std::os::unix::fs::symlink(&link_target, &dest).map_err(|e| PackageManagerError::Io(e.to_string()))?;
            #[cfg(windows)]
            std::os::windows::fs::symlink_file(&link_target, &dest).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        } else {
            link_file(&entry, &dest)?;
        }
    }
    Ok(())
}

fn link_file(source: &Path, dest: &Path) -> Result<()> {
    let _ = fs::remove_file(dest);
    if reflink_copy::reflink(source, dest).is_ok() {
        return Ok(());
    }
    if fs::hard_link(source, dest).is_ok() {
        return Ok(());
    }
    fs::copy(source, dest)
        .map(|_| ())
        .map_err(|e| PackageManagerError::Io(e.to_string()))
}

fn walk(root: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).map_err(|e| PackageManagerError::Io(e.to_string()))? {
            let entry = entry.map_err(|e| PackageManagerError::Io(e.to_string()))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| PackageManagerError::Io(e.to_string()))?;
            if file_type.is_dir() {
                stack.push(path.clone());
            }
            out.push(path);
        }
    }
    Ok(out)
}

/// Cheap idempotence check for hard-link mode: same file count and the
/// first regular file sharing an inode with its store counterpart implies
/// `target` already mirrors `source` (spec §4.4 `link` idempotence).
#[must_use]
pub fn same_tree(source: &Path, target: &Path) -> bool {
    let (Ok(s_meta), Ok(t_meta)) = (fs::metadata(source), fs::metadata(target)) else {
        return false;
    };
    if !s_meta.is_dir() || !t_meta.is_dir() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let Ok(entries) = fs::read_dir(source) else { return false };
        for entry in entries.flatten() {
            let rel = match entry.path().strip_prefix(source) {
                Ok(r) => r.to_path_buf(),
                Err(_) => continue,
            };
            let candidate = target.join(&rel);
            let Ok(source_meta) = entry.metadata() else { continue };
            if source_meta.is_file() {
                match fs::metadata(&candidate) {
                    Ok(candidate_meta) if candidate_meta.ino() == source_meta.ino() => return true,
                    _ => return false,
                }
            }
        }
        false
    }
    #[cfg(not(unix))]
    {
        false
    }
}
