use std::collections::HashSet;
use std::path::{Path, PathBuf};

use jio_constants::NATIVE_LOCKFILE_NAME;
use jio_error::Result;
use jio_lock::LockFile;
use jio_manifest::{PackageJson, read_package_json};

pub struct ListManager;

impl ListManager {
    pub fn list_dependencies(&self, project_dir: &str, tree: bool, depth: Option<u32>) -> Result<()> {
        let path = PathBuf::from(project_dir);
        let pkg = read_package_json(&path)?;

        if tree {
            self.show_dependency_tree(&path, &pkg, depth)
        } else {
            self.show_flat_list(&pkg)
        }
    }

    fn show_dependency_tree(&self, project_dir: &Path, pkg: &PackageJson, depth: Option<u32>) -> Result<()> {
        jio_logger::info("Dependency tree:");
        let lock_path = project_dir.join(NATIVE_LOCKFILE_NAME);
        if !LockFile::exists_at(&lock_path) {
            jio_logger::info("No lock file present; run install to generate a tree.");
            return self.show_flat_list(pkg);
        }
        let lock = LockFile::load(&lock_path)?;

        let max_depth = depth.unwrap_or(u32::MAX);
        let mut names: Vec<&String> = lock.dependencies.keys().collect();
        names.extend(lock.dev_dependencies.keys());
        names.sort();
        names.dedup();

        let mut seen = HashSet::new();
        for name in names {
            self.print_branch(&lock, name, 0, max_depth, &mut seen);
        }
        Ok(())
    }

    fn print_branch<'a>(
        &self,
        lock: &'a LockFile,
        name: &str,
        depth: u32,
        max_depth: u32,
        seen: &mut HashSet<String>,
    ) {
        if depth > max_depth {
            return;
        }
        let Some(entry) = lock.packages.values().find(|p| p.name == name) else {
            println!("{}{name} (unresolved)", "  ".repeat(depth as usize));
            return;
        };
        let key = entry.identity_key();
        println!("{}{} {}", "  ".repeat(depth as usize), entry.name, entry.version);
        if !seen.insert(key) || depth == max_depth {
            return;
        }
        let mut children: Vec<&String> = entry.dependencies.keys().collect();
        children.sort();
        for child in children {
            self.print_branch(lock, child, depth + 1, max_depth, seen);
        }
    }

    fn show_flat_list(&self, pkg: &PackageJson) -> Result<()> {
        if let Some(deps) = &pkg.dependencies {
            if !deps.is_empty() {
                jio_logger::info("Dependencies:");
                for (name, version) in deps {
                    println!("  {name} {version}");
                }
            }
        }

        if let Some(dev_deps) = &pkg.dev_dependencies {
            if !dev_deps.is_empty() {
                jio_logger::info("DevDependencies:");
                for (name, version) in dev_deps {
                    println!("  {name} {version}");
                }
            }
        }

        if let Some(peer_deps) = &pkg.peer_dependencies {
            if !peer_deps.is_empty() {
                jio_logger::info("PeerDependencies:");
                for (name, version) in peer_deps {
                    println!("  {name} {version}");
                }
            }
        }

        if let Some(opt_deps) = &pkg.optional_dependencies {
            if !opt_deps.is_empty() {
                jio_logger::info("OptionalDependencies:");
                for (name, version) in opt_deps {
                    println!("  {name} {version}");
                }
            }
        }

        Ok(())
    }
}

impl Default for ListManager {
    fn default() -> Self {
        Self
    }
}
