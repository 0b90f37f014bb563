use std::collections::HashMap;
use std::path::Path;

use jio_resolver::{DependencyGraph, ResolvedPackage, satisfies_preferred};
use jio_store::LinkMode;

use super::{LayoutPlan, Placement};

/// Every package linked directly under `node_modules/<name>`; at most one
/// version per name at the top level. A requirer whose declared range the
/// top-level version doesn't satisfy gets its own copy nested under
/// `node_modules/<requirer>/node_modules/<name>` (spec §4.7 "Hoisted").
pub fn plan(graph: &DependencyGraph, project_dir: &Path) -> LayoutPlan {
    let node_modules = project_dir.join("node_modules");
    let bin_dir = node_modules.join(".bin");

    let mut by_name: HashMap<&str, Vec<&ResolvedPackage>> = HashMap::new();
    for pkg in graph.packages.values() {
        if pkg.resolved == "workspace:" {
            continue;
        }
        by_name.entry(pkg.name.as_str()).or_default().push(pkg);
    }

    let mut placements = Vec::new();
    let mut winners: HashMap<String, String> = HashMap::new();

    let mut names: Vec<&str> = by_name.keys().copied().collect();
    names.sort_unstable();

    for name in names {
        let candidates = &by_name[name];
        let Some(winner) = candidates
            .iter()
            .max_by_key(|c| jio_semver::parse_version(&c.version).ok())
        else {
            continue;
        };

        placements.push(Placement {
            name: winner.name.clone(),
            version: winner.version.clone(),
            target: node_modules.join(&winner.name),
            mode: LinkMode::HardLink,
            bin_dir: Some(bin_dir.clone()),
        });
        winners.insert(winner.name.clone(), winner.version.clone());
    }

    let mut edges: Vec<(String, String, String)> = Vec::new();
    for (name, range) in graph
        .root_dependencies
        .iter()
        .chain(graph.root_dev_dependencies.iter())
        .chain(graph.root_optional_dependencies.iter())
    {
        edges.push((graph.root_name.clone(), name.clone(), range.clone()));
    }
    for pkg in graph.packages.values() {
        for (name, range) in &pkg.dependencies {
            edges.push((pkg.identity_key(), name.clone(), range.clone()));
        }
    }

    for (requirer, name, range) in &edges {
        let Some(candidates) = by_name.get(name.as_str()) else {
            continue;
        };
        let Some(winner_version) = winners.get(name) else {
            continue;
        };
        let Ok(winner_parsed) = jio_semver::parse_version(winner_version) else {
            continue;
        };
        if satisfies_preferred(range, &winner_parsed) {
            continue;
        }

        let needed = candidates
            .iter()
            .filter(|c| &c.version != winner_version)
            .filter(|c| {
                jio_semver::parse_version(&c.version)
                    .map(|v| satisfies_preferred(range, &v))
                    .unwrap_or(false)
            })
            .max_by_key(|c| jio_semver::parse_version(&c.version).ok());
        let Some(needed) = needed else {
            continue;
        };

        let requirer_dir = if *requirer == graph.root_name {
            node_modules.clone()
        } else {
            node_modules.join(requirer_package_name(requirer))
        };
        let nested_target = requirer_dir.join("node_modules").join(&needed.name);
        if placements.iter().any(|p| p.target == nested_target) {
            continue;
        }
        placements.push(Placement {
            name: needed.name.clone(),
            version: needed.version.clone(),
            target: nested_target,
            mode: LinkMode::HardLink,
            bin_dir: Some(requirer_dir.join("node_modules").join(".bin")),
        });
    }

    LayoutPlan { placements }
}

/// `"<name>@<version>"` -> `"<name>"`; scoped names keep their leading `@`
/// (only the version separator's `@` is the rightmost one).
fn requirer_package_name(identity_key: &str) -> &str {
    identity_key.rfind('@').map_or(identity_key, |i| &identity_key[..i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn pkg(name: &str, version: &str, deps: &[(&str, &str)]) -> ResolvedPackage {
        let mut dependencies = IndexMap::new();
        for (n, r) in deps {
            dependencies.insert((*n).to_string(), (*r).to_string());
        }
        ResolvedPackage {
            name: name.to_string(),
            version: version.to_string(),
            resolved: format!("https://registry.npmjs.org/{name}/-/{name}-{version}.tgz"),
            integrity: "sha512-x".to_string(),
            dependencies,
            dev: false,
            optional: false,
        }
    }

    #[test]
    fn single_version_is_placed_at_top_level_only() {
        let mut packages = IndexMap::new();
        packages.insert("left-pad@1.3.1".to_string(), pkg("left-pad", "1.3.1", &[]));
        let mut root_dependencies = IndexMap::new();
        root_dependencies.insert("left-pad".to_string(), "^1.3.0".to_string());

        let graph = DependencyGraph {
            root_name: "a".to_string(),
            root_version: "0.1.0".to_string(),
            root_dependencies,
            root_dev_dependencies: IndexMap::new(),
            root_optional_dependencies: IndexMap::new(),
            packages,
            warnings: Vec::new(),
        };

        let plan = plan(&graph, Path::new("/project"));
        assert_eq!(plan.placements.len(), 1);
        assert_eq!(plan.placements[0].target, Path::new("/project/node_modules/left-pad"));
    }

    #[test]
    fn conflicting_version_is_nested_under_its_requirer() {
        // root needs util@^1.0.0 (hoisted winner), and left-pad needs util@^2.0.0
        // which the hoisted copy can't satisfy, so it must nest under left-pad.
        let mut packages = IndexMap::new();
        packages.insert("util@1.2.3".to_string(), pkg("util", "1.2.3", &[]));
        packages.insert("util@2.0.0".to_string(), pkg("util", "2.0.0", &[]));
        packages.insert("left-pad@1.0.0".to_string(), pkg("left-pad", "1.0.0", &[("util", "^2.0.0")]));

        let mut root_dependencies = IndexMap::new();
        root_dependencies.insert("util".to_string(), "^1.0.0".to_string());
        root_dependencies.insert("left-pad".to_string(), "^1.0.0".to_string());

        let graph = DependencyGraph {
            root_name: "a".to_string(),
            root_version: "0.1.0".to_string(),
            root_dependencies,
            root_dev_dependencies: IndexMap::new(),
            root_optional_dependencies: IndexMap::new(),
            packages,
            warnings: Vec::new(),
        };

        let plan = plan(&graph, Path::new("/project"));
        let top_level_util = plan
            .placements
            .iter()
            .find(|p| p.target == Path::new("/project/node_modules/util"))
            .expect("top-level util placement");
        assert_eq!(top_level_util.version, "1.2.3");

        let nested_util = plan
            .placements
            .iter()
            .find(|p| p.target == Path::new("/project/node_modules/left-pad/node_modules/util"))
            .expect("nested util placement under left-pad");
        assert_eq!(nested_util.version, "2.0.0");
    }
}
