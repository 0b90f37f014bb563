use std::fs;
use std::path::Path;

use jio_error::{PackageManagerError, Result};

use crate::package_json::PackageJson;

pub fn read_package_json(project_dir: &Path) -> Result<PackageJson> {
    let path = project_dir.join("package.json");
    let content = fs::read_to_string(&path).map_err(|e| {
        PackageManagerError::BadManifest(format!("{}: {e}", path.display()))
    })?;
    let parsed: PackageJson = serde_json::from_str(&content)?;
    Ok(parsed)
}

/// Two-space-indented JSON, field order as declared on `PackageJson` (stable
/// across a read-then-write with no changes, per §3/§8 invariant 5).
pub fn write_package_json(project_dir: &Path, package_json: &PackageJson) -> Result<()> {
    let path = project_dir.join("package.json");
    let content = serde_json::to_string_pretty(package_json)?;
    fs::write(&path, content)
        .map_err(|e| PackageManagerError::Io(format!("{}: {e}", path.display())))?;
    Ok(())
}
