use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `bin` may be a single path string (named after the package) or a map of
/// command name -> path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bin {
    Single(String),
    Many(IndexMap<String, String>),
}

/// Typed read/write view of `package.json` (§4.2). Unknown fields are
/// preserved via `other` so a save-without-modification round-trips exactly.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PackageJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<Bin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<String, String>>,
    #[serde(rename = "devDependencies", skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<IndexMap<String, String>>,
    #[serde(rename = "peerDependencies", skip_serializing_if = "Option::is_none")]
    pub peer_dependencies: Option<IndexMap<String, String>>,
    #[serde(
        rename = "optionalDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub optional_dependencies: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(
        rename = "patchedDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub patched_dependencies: Option<IndexMap<String, String>>,
    // Catch-all for other fields to preserve them on round-trip.
    #[serde(flatten)]
    pub other: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyType {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
}

impl PackageJson {
    #[must_use]
    pub fn get_all_dependencies(&self) -> HashMap<String, String> {
        let mut all_deps = HashMap::new();

        if let Some(deps) = &self.dependencies {
            all_deps.extend(deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(dev_deps) = &self.dev_dependencies {
            all_deps.extend(dev_deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(opt_deps) = &self.optional_dependencies {
            all_deps.extend(opt_deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        all_deps
    }

    /// Ranges declared directly by this manifest, by dependency type, as the
    /// resolver's root-level seed (§4.5).
    #[must_use]
    pub fn dependencies_of(&self, dep_type: DependencyType) -> &IndexMap<String, String> {
        static EMPTY: std::sync::OnceLock<IndexMap<String, String>> = std::sync::OnceLock::new();
        let empty = EMPTY.get_or_init(IndexMap::new);
        match dep_type {
            DependencyType::Dependencies => self.dependencies.as_ref().unwrap_or(empty),
            DependencyType::DevDependencies => self.dev_dependencies.as_ref().unwrap_or(empty),
            DependencyType::PeerDependencies => self.peer_dependencies.as_ref().unwrap_or(empty),
            DependencyType::OptionalDependencies => {
                self.optional_dependencies.as_ref().unwrap_or(empty)
            }
        }
    }

    pub fn save(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
