//! Dependency graph resolver (spec §4.5, C5): turns a manifest plus
//! registry metadata into a fully pinned, deduplicated [`DependencyGraph`].

pub mod graph;
pub mod platform;
mod resolve;

pub use graph::{DependencyGraph, ResolveWarning, ResolvedPackage};
pub use resolve::{LayoutMode, resolve};

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use jio_manifest::PackageJson;
    use jio_registry::RegistryConfig;
    use jio_registry::RegistryClient;

    fn manifest_with(deps: &[(&str, &str)]) -> PackageJson {
        let mut dependencies = IndexMap::new();
        for (name, range) in deps {
            dependencies.insert((*name).to_string(), (*range).to_string());
        }
        PackageJson {
            name: Some("a".to_string()),
            version: Some("0.1.0".to_string()),
            description: None,
            license: None,
            main: None,
            bin: None,
            scripts: None,
            dependencies: Some(dependencies),
            dev_dependencies: None,
            peer_dependencies: None,
            optional_dependencies: None,
            workspaces: None,
            files: None,
            private: None,
            patched_dependencies: None,
            other: IndexMap::new(),
        }
    }

    #[tokio::test]
    async fn empty_manifest_resolves_to_empty_graph() {
        let manifest = manifest_with(&[]);
        let registry = RegistryClient::new(RegistryConfig::default());
        let graph = resolve(&registry, &manifest, LayoutMode::Hoisted, IndexMap::new())
            .await
            .expect("resolve");
        assert!(graph.packages.is_empty());
    }
}
