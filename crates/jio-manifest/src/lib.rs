pub mod dependency_manager;
pub mod io;
pub mod package_json;

pub use dependency_manager::DependencyManager;
pub use io::{read_package_json, write_package_json};
pub use package_json::{Bin, DependencyType, PackageJson};

impl PackageJson {
    /// Add a dependency, removing it from any other dependency section first
    /// so a package never appears twice.
    pub fn add_dependency(
        &mut self,
        name: &str,
        version: &str,
        dep_type: DependencyType,
        save_exact: bool,
    ) {
        DependencyManager::add_dependency(self, name, version, dep_type, save_exact);
    }

    pub fn remove_dependency(&mut self, name: &str) {
        DependencyManager::remove_dependency(self, name);
    }

    #[must_use]
    pub fn has_dependency(&self, name: &str) -> Option<DependencyType> {
        DependencyManager::has_dependency(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn add_dependency_prefixes_with_caret_by_default() {
        let mut pkg = PackageJson {
            name: Some("a".into()),
            version: Some("0.1.0".into()),
            description: None,
            license: None,
            main: None,
            bin: None,
            scripts: None,
            dependencies: None,
            dev_dependencies: None,
            peer_dependencies: None,
            optional_dependencies: None,
            workspaces: None,
            files: None,
            private: None,
            patched_dependencies: None,
            other: IndexMap::new(),
        };
        pkg.add_dependency("left-pad", "1.3.1", DependencyType::Dependencies, false);
        assert_eq!(
            pkg.dependencies.expect("set").get("left-pad").map(String::as_str),
            Some("^1.3.1")
        );
    }

    #[test]
    fn add_dependency_moves_between_sections() {
        let mut pkg = PackageJson {
            name: None,
            version: None,
            description: None,
            license: None,
            main: None,
            bin: None,
            scripts: None,
            dependencies: Some(IndexMap::from([("x".to_string(), "^1.0.0".to_string())])),
            dev_dependencies: None,
            peer_dependencies: None,
            optional_dependencies: None,
            workspaces: None,
            files: None,
            private: None,
            patched_dependencies: None,
            other: IndexMap::new(),
        };
        pkg.add_dependency("x", "^1.0.0", DependencyType::DevDependencies, false);
        assert!(pkg.dependencies.expect("set").is_empty());
        assert!(pkg.dev_dependencies.expect("set").contains_key("x"));
    }
}
