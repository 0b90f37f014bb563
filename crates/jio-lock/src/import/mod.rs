//! Foreign lock-file import (spec §4.6): npm v2/v3, Yarn classic, and pnpm.
//! Each format is recognised at install time only when the native lock file
//! is absent.

pub mod npm;
pub mod pnpm;
pub mod yarn;

use indexmap::IndexMap;

use jio_error::Result;
use jio_resolver::ResolvedPackage;

use crate::native::LockFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignFormat {
    NpmV2OrV3,
    YarnClassic,
    Pnpm,
}

/// Detect which foreign lock file is present in `project_dir`, preferring
/// the order the ecosystem itself checks in (npm's own lock, then Yarn's,
/// then pnpm's) when more than one happens to exist.
#[must_use]
pub fn detect(project_dir: &std::path::Path) -> Option<(ForeignFormat, std::path::PathBuf)> {
    let candidates = [
        (ForeignFormat::NpmV2OrV3, "package-lock.json"),
        (ForeignFormat::YarnClassic, "yarn.lock"),
        (ForeignFormat::Pnpm, "pnpm-lock.yaml"),
    ];
    for (format, filename) in candidates {
        let path = project_dir.join(filename);
        if path.is_file() {
            return Some((format, path));
        }
    }
    None
}

/// Import a foreign lock file's content into a native [`LockFile`]. Root
/// dependency ranges always come from the live manifest, not the foreign
/// file — the import's job is pinning exact resolutions, not restating
/// declared ranges (spec §4.6).
pub fn import(
    format: ForeignFormat,
    content: &str,
    root_name: &str,
    root_version: &str,
    root_dependencies: IndexMap<String, String>,
    root_dev_dependencies: IndexMap<String, String>,
    root_optional_dependencies: IndexMap<String, String>,
) -> Result<LockFile> {
    let packages: IndexMap<String, ResolvedPackage> = match format {
        ForeignFormat::NpmV2OrV3 => npm::parse(content)?,
        ForeignFormat::YarnClassic => yarn::parse(content)?,
        ForeignFormat::Pnpm => pnpm::parse(content)?,
    };

    let mut sorted_keys: Vec<String> = packages.keys().cloned().collect();
    sorted_keys.sort();
    let mut sorted_packages = IndexMap::new();
    for key in sorted_keys {
        if let Some(pkg) = packages.get(&key) {
            sorted_packages.insert(key, pkg.clone());
        }
    }

    Ok(LockFile {
        name: root_name.to_string(),
        version: root_version.to_string(),
        dependencies: root_dependencies,
        dev_dependencies: root_dev_dependencies,
        optional_dependencies: root_optional_dependencies,
        packages: sorted_packages,
    })
}
