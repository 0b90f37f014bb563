use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use jio_resolver::{DependencyGraph, ResolvedPackage, satisfies_preferred};
use jio_store::LinkMode;

use super::{LayoutPlan, Placement};

/// Directory holding every identity's private, version-qualified slot.
const PRIVATE_DIRNAME: &str = ".jio";

/// Every package lives in its own private slot `node_modules/.jio/<name>@<version>/`,
/// materialised as a real tree (hard-linked from the store, not symlinked —
/// a symlinked slot would mean writing a sibling dependency's path underneath
/// it mutates the shared store entry itself); only the root's own declared
/// dependencies are symlinked into plain `node_modules/<name>`; each
/// package's private `node_modules/` holds symlinks to exactly its own
/// declared dependencies' store locations (spec §4.7 "Strict").
pub fn plan(graph: &DependencyGraph, project_dir: &Path) -> LayoutPlan {
    let node_modules = project_dir.join("node_modules");
    let private_root = node_modules.join(PRIVATE_DIRNAME);

    let mut by_name: HashMap<&str, Vec<&ResolvedPackage>> = HashMap::new();
    for pkg in graph.packages.values() {
        if pkg.resolved == "workspace:" {
            continue;
        }
        by_name.entry(pkg.name.as_str()).or_default().push(pkg);
    }

    let mut placements = Vec::new();
    let mut seen = HashSet::new();

    for pkg in graph.packages.values() {
        if pkg.resolved == "workspace:" {
            continue;
        }
        let private_dir = private_root.join(pkg.identity_key());
        add_placement(
            &mut placements,
            &mut seen,
            pkg,
            private_dir.clone(),
            LinkMode::HardLink,
            Some(private_dir.join("node_modules").join(".bin")),
        );

        let mut dep_names: Vec<&String> = pkg.dependencies.keys().collect();
        dep_names.sort();
        for dep_name in dep_names {
            let Some(range) = pkg.dependencies.get(dep_name) else {
                continue;
            };
            let Some(resolved) = pick(&by_name, dep_name, range) else {
                continue;
            };
            let symlink_target = private_dir.join("node_modules").join(dep_name);
            add_placement(&mut placements, &mut seen, resolved, symlink_target, LinkMode::Symlink, None);
        }
    }

    for (name, range) in graph
        .root_dependencies
        .iter()
        .chain(graph.root_dev_dependencies.iter())
        .chain(graph.root_optional_dependencies.iter())
    {
        let Some(resolved) = pick(&by_name, name, range) else {
            continue;
        };
        let target = node_modules.join(name);
        add_placement(
            &mut placements,
            &mut seen,
            resolved,
            target,
            LinkMode::Symlink,
            Some(node_modules.join(".bin")),
        );
    }

    LayoutPlan { placements }
}

fn add_placement(
    placements: &mut Vec<Placement>,
    seen: &mut HashSet<PathBuf>,
    pkg: &ResolvedPackage,
    target: PathBuf,
    mode: LinkMode,
    bin_dir: Option<PathBuf>,
) {
    if !seen.insert(target.clone()) {
        return;
    }
    placements.push(Placement {
        name: pkg.name.clone(),
        version: pkg.version.clone(),
        target,
        mode,
        bin_dir,
    });
}

/// Among graph identities named `name`, the one the original resolve would
/// have chosen for a requirer declaring `range`: the highest version that
/// satisfies it (spec §4.1 selection policy, reapplied here since strict
/// mode keeps distinct identities per requirer rather than recording edges).
fn pick<'a>(by_name: &HashMap<&str, Vec<&'a ResolvedPackage>>, name: &str, range: &str) -> Option<&'a ResolvedPackage> {
    let candidates = by_name.get(name)?;
    candidates
        .iter()
        .filter(|c| {
            jio_semver::parse_version(&c.version)
                .map(|v| satisfies_preferred(range, &v))
                .unwrap_or(false)
        })
        .max_by_key(|c| jio_semver::parse_version(&c.version).ok())
        .copied()
        .or_else(|| candidates.iter().max_by_key(|c| jio_semver::parse_version(&c.version).ok()).copied())
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
    fn each_distinct_version_gets_its_own_private_slot() {
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

        let private_util_1 = plan
            .placements
            .iter()
            .find(|p| p.target == Path::new("/project/node_modules/.jio/util@1.2.3"));
        let private_util_2 = plan
            .placements
            .iter()
            .find(|p| p.target == Path::new("/project/node_modules/.jio/util@2.0.0"));
        assert!(private_util_1.is_some());
        assert!(private_util_2.is_some());

        // left-pad's own isolated node_modules/ sees only the util version
        // it declared, not the root's preferred one.
        let left_pad_sees = plan
            .placements
            .iter()
            .find(|p| p.target == Path::new("/project/node_modules/.jio/left-pad@1.0.0/node_modules/util"))
            .expect("left-pad sees its own util");
        assert_eq!(left_pad_sees.version, "2.0.0");

        // Only declared direct deps of the root are symlinked into plain node_modules/.
        let top_level_util = plan
            .placements
            .iter()
            .find(|p| p.target == Path::new("/project/node_modules/util"))
            .expect("root-level util symlink");
        assert_eq!(top_level_util.version, "1.2.3");
    }
}
