//! `update [name...]` (spec §4.8): re-resolve named dependencies (or all,
//! if none named) to the highest version satisfying their current range,
//! preserving the range's `^`/`~`/exact prefix unless `--latest` is given.

use std::path::Path;

use jio_error::{PackageManagerError, Result};
use jio_manifest::{read_package_json, write_package_json};
use jio_resolver::DependencyGraph;
use jio_semver::{max_satisfying, parse_range};

use super::Orchestrator;

impl Orchestrator {
    pub async fn update(&self, project_dir: &Path, names: &[String], latest: bool) -> Result<DependencyGraph> {
        let mut manifest = read_package_json(project_dir)?;

        let targets: Vec<String> = if names.is_empty() {
            manifest.get_all_dependencies().into_keys().collect()
        } else {
            names.to_vec()
        };

        for name in &targets {
            let Some(dep_type) = manifest.has_dependency(name) else {
                jio_logger::warn(&format!("'{name}' is not a declared dependency; skipping"));
                continue;
            };
            let current_range = manifest
                .dependencies_of(dep_type)
                .get(name)
                .cloned()
                .unwrap_or_default();

            let metadata = self.registry.metadata(name).await?;
            let versions = metadata.ordered_versions();

            let target_version = if latest {
                versions.into_iter().next_back()
            } else {
                let parsed =
                    parse_range(&current_range).map_err(|_| PackageManagerError::BadRange(current_range.clone()))?;
                max_satisfying(&parsed, versions.as_slice(), false)
            };

            let Some(target_version) = target_version else {
                jio_logger::warn(&format!("no version of '{name}' satisfies the update"));
                continue;
            };

            let prefix = range_prefix(&current_range);
            let new_range = format!("{prefix}{target_version}");
            // save_exact: true because new_range already carries the exact
            // prefix we want; format_version_string must not reinterpret it.
            manifest.add_dependency(name, &new_range, dep_type, true);
        }

        write_package_json(project_dir, &manifest)?;
        self.install_resolve(project_dir).await
    }
}

fn range_prefix(range: &str) -> &'static str {
    let trimmed = range.trim();
    if trimmed.starts_with('^') {
        "^"
    } else if trimmed.starts_with('~') {
        "~"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::range_prefix;

    #[test]
    fn preserves_caret_prefix() {
        assert_eq!(range_prefix("^1.2.3"), "^");
    }

    #[test]
    fn preserves_tilde_prefix() {
        assert_eq!(range_prefix("~1.2.3"), "~");
    }

    #[test]
    fn exact_range_has_no_prefix() {
        assert_eq!(range_prefix("1.2.3"), "");
    }
}
