//! Native lock file, foreign-format import, and CI verification
//! (spec §4.6, C6).

pub mod import;
mod native;
mod verify;

pub use native::LockFile;
pub use verify::{VerifyOutcome, verify_entry, verify_lock};

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use jio_resolver::{DependencyGraph, ResolvedPackage};

    fn sample_graph() -> DependencyGraph {
        let mut packages = IndexMap::new();
        packages.insert(
            "left-pad@1.3.1".to_string(),
            ResolvedPackage {
                name: "left-pad".to_string(),
                version: "1.3.1".to_string(),
                resolved: "https://registry.npmjs.org/left-pad/-/left-pad-1.3.1.tgz".to_string(),
                integrity: "sha512-abc".to_string(),
                dependencies: IndexMap::new(),
                dev: false,
                optional: false,
            },
        );
        let mut root_dependencies = IndexMap::new();
        root_dependencies.insert("left-pad".to_string(), "^1.3.0".to_string());

        DependencyGraph {
            root_name: "a".to_string(),
            root_version: "0.1.0".to_string(),
            root_dependencies,
            root_dev_dependencies: IndexMap::new(),
            root_optional_dependencies: IndexMap::new(),
            packages,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn round_trips_through_json() {
        let graph = sample_graph();
        let lock = LockFile::from_graph(&graph);
        let json = lock.to_json().expect("serialises");
        let parsed = LockFile::parse(&json).expect("parses");
        assert_eq!(parsed.packages.len(), 1);
        assert_eq!(parsed.packages["left-pad@1.3.1"].integrity, "sha512-abc");
    }

    #[test]
    fn canonical_key_order_is_fixed() {
        let graph = sample_graph();
        let lock = LockFile::from_graph(&graph);
        let json = lock.to_json().expect("serialises");
        let name_pos = json.find("\"name\"").expect("has name");
        let deps_pos = json.find("\"dependencies\"").expect("has dependencies");
        let packages_pos = json.find("\"packages\"").expect("has packages");
        assert!(name_pos < deps_pos);
        assert!(deps_pos < packages_pos);
    }
}
