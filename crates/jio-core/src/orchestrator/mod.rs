//! Install orchestrator (spec §4.8, C8): ties the manifest, resolver,
//! content store, layout, and lock file together for every operation mode.

pub mod dedupe;
pub mod outdated;
pub mod prune;
pub mod uninstall;
pub mod update;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use jio_constants::NATIVE_LOCKFILE_NAME;
use jio_error::{PackageManagerError, Result};
use jio_lock::{LockFile, import};
use jio_manifest::{DependencyType, read_package_json, write_package_json};
use jio_registry::RegistryClient;
use jio_resolver::{DependencyGraph, resolve};
use jio_store::ContentStore;

use crate::config::Config;
use crate::download::fetch_missing;
use crate::layout;

pub struct Orchestrator {
    pub config: Config,
    pub registry: Arc<RegistryClient>,
    pub store: Arc<ContentStore>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(RegistryClient::new(config.registry_config()));
        let store = Arc::new(ContentStore::new(config.store_directory.clone()));
        Self { config, registry, store }
    }

    fn lock_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(NATIVE_LOCKFILE_NAME)
    }

    /// `install (fresh)` (spec §4.8): resolve, download/verify in parallel,
    /// materialise the layout, write the lock. When no native lock exists
    /// but a foreign one does, imports it instead of re-resolving.
    pub async fn install(&self, project_dir: &Path) -> Result<DependencyGraph> {
        let lock_path = self.lock_path(project_dir);
        if !LockFile::exists_at(&lock_path) {
            if let Some((format, foreign_path)) = import::detect(project_dir) {
                return self.install_from_foreign_lock(project_dir, format, &foreign_path).await;
            }
        }
        self.install_resolve(project_dir).await
    }

    pub(crate) async fn install_resolve(&self, project_dir: &Path) -> Result<DependencyGraph> {
        let manifest = read_package_json(project_dir)?;
        let graph = resolve(&self.registry, &manifest, self.config.layout_mode(), IndexMap::new()).await?;
        self.fetch_link_and_lock(project_dir, &graph).await?;
        Ok(graph)
    }

    async fn install_from_foreign_lock(
        &self,
        project_dir: &Path,
        format: import::ForeignFormat,
        foreign_path: &Path,
    ) -> Result<DependencyGraph> {
        jio_logger::status("Importing foreign lock file...");
        let manifest = read_package_json(project_dir)?;
        let content =
            std::fs::read_to_string(foreign_path).map_err(|e| PackageManagerError::Io(e.to_string()))?;

        let lock = import::import(
            format,
            &content,
            manifest.name.as_deref().unwrap_or_default(),
            manifest.version.as_deref().unwrap_or_default(),
            manifest.dependencies_of(DependencyType::Dependencies).clone(),
            manifest.dependencies_of(DependencyType::DevDependencies).clone(),
            manifest.dependencies_of(DependencyType::OptionalDependencies).clone(),
        )?;

        let graph = graph_from_lock(&lock);
        let packages: Vec<_> = graph.packages.values().cloned().collect();
        fetch_missing(
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            &packages,
            self.config.download_concurrency(),
        )
        .await?;

        let plan = layout::plan(&graph, self.config.layout_mode(), project_dir);
        layout::materialise(&self.store, project_dir, &plan)?;
        lock.save(&self.lock_path(project_dir))?;

        jio_logger::finish(&format!("Installed {} packages from imported lock file", graph.packages.len()));
        Ok(graph)
    }

    /// `install (with added package)` (spec §4.8): patch the manifest's
    /// declared dependencies, save it, then install exactly as a fresh
    /// install would.
    pub async fn install_add(
        &self,
        project_dir: &Path,
        name: &str,
        version_range: &str,
        dep_type: DependencyType,
        save_exact: bool,
    ) -> Result<DependencyGraph> {
        let mut manifest = read_package_json(project_dir)?;
        manifest.add_dependency(name, version_range, dep_type, save_exact);
        write_package_json(project_dir, &manifest)?;
        self.install_resolve(project_dir).await
    }

    /// `ci` (spec §4.8): refuses without a lock file; never mutates the
    /// manifest or lock; verifies every entry against the store before
    /// linking anything, fetching only what's missing.
    pub async fn ci(&self, project_dir: &Path) -> Result<DependencyGraph> {
        let lock_path = self.lock_path(project_dir);
        if !LockFile::exists_at(&lock_path) {
            return Err(PackageManagerError::Lock(
                "no lock file present; run install first".to_string(),
            ));
        }
        let lock = LockFile::load(&lock_path)?;

        let missing_keys = jio_lock::verify_lock(&self.store, &lock)?;
        if !missing_keys.is_empty() {
            let missing: Vec<_> = lock
                .packages
                .iter()
                .filter(|(key, _)| missing_keys.contains(key))
                .map(|(_, pkg)| pkg.clone())
                .collect();
            fetch_missing(
                Arc::clone(&self.registry),
                Arc::clone(&self.store),
                &missing,
                self.config.download_concurrency(),
            )
            .await?;

            let still_missing = jio_lock::verify_lock(&self.store, &lock)?;
            if !still_missing.is_empty() {
                return Err(PackageManagerError::Integrity(still_missing.join(", "), String::new()));
            }
        }

        let graph = graph_from_lock(&lock);
        let plan = layout::plan(&graph, self.config.layout_mode(), project_dir);
        layout::materialise(&self.store, project_dir, &plan)?;
        jio_logger::finish(&format!("Installed {} packages from lock file", graph.packages.len()));
        Ok(graph)
    }

    async fn fetch_link_and_lock(&self, project_dir: &Path, graph: &DependencyGraph) -> Result<()> {
        let packages: Vec<_> = graph.packages.values().cloned().collect();
        fetch_missing(
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            &packages,
            self.config.download_concurrency(),
        )
        .await?;

        let plan = layout::plan(graph, self.config.layout_mode(), project_dir);
        layout::materialise(&self.store, project_dir, &plan)?;

        let lock = LockFile::from_graph(graph).optimised();
        lock.save(&self.lock_path(project_dir))?;

        jio_logger::finish(&format!("Installed {} packages", graph.packages.len()));
        Ok(())
    }
}

/// Reconstruct a [`DependencyGraph`] view from a loaded lock file, for the
/// operations (`ci`, `prune`, `dedupe`) that drive layout without
/// re-resolving against the registry.
pub(crate) fn graph_from_lock(lock: &LockFile) -> DependencyGraph {
    DependencyGraph {
        root_name: lock.name.clone(),
        root_version: lock.version.clone(),
        root_dependencies: lock.dependencies.clone(),
        root_dev_dependencies: lock.dev_dependencies.clone(),
        root_optional_dependencies: lock.optional_dependencies.clone(),
        packages: lock.packages.clone(),
        warnings: Vec::new(),
    }
}
