//! `outdated` (spec §4.8, §9): report `(current, wanted, latest)` per direct
//! dependency using proper semver ordering throughout — the source this was
//! distilled from fell back to plain string comparison here, which this
//! deliberately does not repeat.

use std::path::Path;

use jio_error::Result;
use jio_lock::LockFile;
use jio_manifest::{DependencyType, read_package_json};
use jio_semver::{max_satisfying, parse_range};

use super::Orchestrator;

#[derive(Debug, Clone)]
pub struct OutdatedEntry {
    pub name: String,
    pub current: Option<String>,
    pub wanted: Option<String>,
    pub latest: Option<String>,
}

impl Orchestrator {
    pub async fn outdated(&self, project_dir: &Path) -> Result<Vec<OutdatedEntry>> {
        let manifest = read_package_json(project_dir)?;
        let lock_path = self.lock_path(project_dir);
        let lock = if LockFile::exists_at(&lock_path) {
            Some(LockFile::load(&lock_path)?)
        } else {
            None
        };

        let mut direct: Vec<(String, String)> = manifest
            .dependencies_of(DependencyType::Dependencies)
            .iter()
            .map(|(name, range)| (name.clone(), range.clone()))
            .collect();
        direct.sort_by(|a, b| a.0.cmp(&b.0));

        let mut entries = Vec::with_capacity(direct.len());
        for (name, range) in direct {
            let current = lock
                .as_ref()
                .and_then(|l| l.packages.values().find(|p| p.name == name))
                .map(|p| p.version.clone());

            let metadata = self.registry.metadata(&name).await?;
            let versions = metadata.ordered_versions();

            let wanted = parse_range(&range)
                .ok()
                .and_then(|parsed| max_satisfying(&parsed, versions.as_slice(), false))
                .map(|v| v.to_string());
            let latest = versions.into_iter().next_back().map(|v| v.to_string());

            entries.push(OutdatedEntry { name, current, wanted, latest });
        }

        Ok(entries)
    }
}
