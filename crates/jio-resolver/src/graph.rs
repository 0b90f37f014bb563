use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A fully-pinned graph node (spec §3 `ResolvedPackage`). Identity key is
/// `"<name>@<version>"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: String,
    pub resolved: String,
    pub integrity: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dev: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl ResolvedPackage {
    #[must_use]
    pub fn identity_key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// The whole pinned, deduplicated dependency graph (spec §3 `DependencyGraph`).
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub root_name: String,
    pub root_version: String,
    pub root_dependencies: IndexMap<String, String>,
    pub root_dev_dependencies: IndexMap<String, String>,
    pub root_optional_dependencies: IndexMap<String, String>,
    /// identity key -> node.
    pub packages: IndexMap<String, ResolvedPackage>,
    pub warnings: Vec<ResolveWarning>,
}

impl DependencyGraph {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResolvedPackage> {
        self.packages.get(key)
    }

    /// Identity keys in stable lexicographic order, for lock-file emission
    /// and deterministic `node_modules/` materialisation logging (spec §5).
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.packages.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[derive(Debug, Clone)]
pub enum ResolveWarning {
    /// An optional dependency's candidate lookup failed; the node was
    /// omitted from the graph rather than aborting the resolve.
    OptionalSkipped { name: String, range: String, reason: String },
    /// A peer dependency has no matching node anywhere in the graph.
    UnmetPeer { consumer: String, peer: String, range: String, optional: bool },
    /// A platform (`os`/`cpu`) mismatch caused an optional dependency to be
    /// skipped rather than installed.
    PlatformMismatch { name: String, version: String },
}

impl std::fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptionalSkipped { name, range, reason } => {
                write!(f, "optional dependency '{name}@{range}' skipped: {reason}")
            }
            Self::UnmetPeer { consumer, peer, range, optional } => {
                let severity = if *optional { "optional" } else { "required" };
                write!(
                    f,
                    "{severity} peer dependency '{peer}@{range}' of '{consumer}' is not present in the tree"
                )
            }
            Self::PlatformMismatch { name, version } => {
                write!(f, "'{name}@{version}' skipped: unsupported os/cpu for this platform")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, version: &str) -> ResolvedPackage {
        ResolvedPackage {
            name: name.to_string(),
            version: version.to_string(),
            resolved: format!("https://registry.npmjs.org/{name}/-/{name}-{version}.tgz"),
            integrity: "sha512-x".to_string(),
            dependencies: IndexMap::new(),
            dev: false,
            optional: false,
        }
    }

    #[test]
    fn identity_key_joins_name_and_version() {
        assert_eq!(pkg("left-pad", "1.3.1").identity_key(), "left-pad@1.3.1");
    }

    #[test]
    fn sorted_keys_are_lexicographic_not_insertion_order() {
        let mut graph = DependencyGraph::default();
        graph.packages.insert("util@2.0.0".to_string(), pkg("util", "2.0.0"));
        graph.packages.insert("left-pad@1.3.1".to_string(), pkg("left-pad", "1.3.1"));

        assert_eq!(graph.sorted_keys(), vec!["left-pad@1.3.1".to_string(), "util@2.0.0".to_string()]);
    }

    #[test]
    fn get_looks_up_by_identity_key() {
        let mut graph = DependencyGraph::default();
        graph.packages.insert("left-pad@1.3.1".to_string(), pkg("left-pad", "1.3.1"));

        assert!(graph.get("left-pad@1.3.1").is_some());
        assert!(graph.get("left-pad@9.9.9").is_none());
    }

    #[test]
    fn warning_display_messages_name_the_affected_package() {
        let optional_skipped = ResolveWarning::OptionalSkipped {
            name: "fsevents".to_string(),
            range: "^2.0.0".to_string(),
            reason: "unsupported platform".to_string(),
        };
        assert!(optional_skipped.to_string().contains("fsevents"));

        let unmet_peer = ResolveWarning::UnmetPeer {
            consumer: "app".to_string(),
            peer: "react".to_string(),
            range: "^18.0.0".to_string(),
            optional: false,
        };
        assert!(unmet_peer.to_string().contains("required"));
    }
}
