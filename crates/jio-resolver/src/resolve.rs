use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, join_all};
use indexmap::IndexMap;
use tokio::sync::Mutex;

use jio_error::{PackageManagerError, Result};
use jio_manifest::{DependencyType, PackageJson};
use jio_registry::{PackageMetadata, RegistryClient};
use jio_semver::{SpecialRange, Version, max_satisfying, parse_range, parse_special, satisfies};

use crate::graph::{DependencyGraph, ResolveWarning, ResolvedPackage};
use crate::platform::is_platform_compatible;

/// Hoisted prefers a single shared version per name at the top level;
/// strict never biases reuse across requirers (spec §4.5 step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Hoisted,
    Strict,
}

struct PeerCheck {
    consumer: String,
    peer: String,
    range: String,
    optional: bool,
}

struct ResolveState<'a> {
    registry: &'a RegistryClient,
    mode: LayoutMode,
    workspaces: IndexMap<String, String>,
    metadata_cache: Mutex<HashMap<String, Arc<PackageMetadata>>>,
    preferred: Mutex<HashMap<String, Version>>,
    packages: Mutex<IndexMap<String, ResolvedPackage>>,
    warnings: Mutex<Vec<ResolveWarning>>,
    peer_checks: Mutex<Vec<PeerCheck>>,
}

/// Build a pinned [`DependencyGraph`] from a manifest by walking (requirer,
/// name, range) edges breadth-first from the root (spec §4.5, C5).
pub async fn resolve(
    registry: &RegistryClient,
    manifest: &PackageJson,
    mode: LayoutMode,
    workspaces: IndexMap<String, String>,
) -> Result<DependencyGraph> {
    jio_logger::status("Resolving dependency tree...");
    let root_dependencies = manifest.dependencies_of(DependencyType::Dependencies).clone();
    let root_dev_dependencies = manifest.dependencies_of(DependencyType::DevDependencies).clone();
    let root_optional_dependencies = manifest
        .dependencies_of(DependencyType::OptionalDependencies)
        .clone();

    let state = ResolveState {
        registry,
        mode,
        workspaces,
        metadata_cache: Mutex::new(HashMap::new()),
        preferred: Mutex::new(HashMap::new()),
        packages: Mutex::new(IndexMap::new()),
        warnings: Mutex::new(Vec::new()),
        peer_checks: Mutex::new(Vec::new()),
    };

    let mut roots: Vec<(String, String, bool, bool)> = Vec::new();
    for (name, range) in &root_dependencies {
        roots.push((name.clone(), range.clone(), false, false));
    }
    for (name, range) in &root_dev_dependencies {
        roots.push((name.clone(), range.clone(), true, false));
    }
    for (name, range) in &root_optional_dependencies {
        roots.push((name.clone(), range.clone(), false, true));
    }
    // Deterministic fan-out order, per §4.5 determinism requirement.
    roots.sort_by(|a, b| a.0.cmp(&b.0));

    let futures = roots
        .into_iter()
        .map(|(name, range, dev, optional)| resolve_one(&state, name, range, dev, optional));
    for result in join_all(futures).await {
        result?;
    }

    let mut graph = DependencyGraph {
        root_name: manifest.name.clone().unwrap_or_default(),
        root_version: manifest.version.clone().unwrap_or_default(),
        root_dependencies,
        root_dev_dependencies,
        root_optional_dependencies,
        packages: state.packages.into_inner(),
        warnings: state.warnings.into_inner(),
    };

    check_peers(state.peer_checks.into_inner(), &mut graph);
    for warning in &graph.warnings {
        jio_logger::warn(&warning.to_string());
    }
    Ok(graph)
}

fn resolve_one<'a>(
    state: &'a ResolveState<'a>,
    name: String,
    range: String,
    dev: bool,
    optional: bool,
) -> BoxFuture<'a, Result<()>> {
    async move {
        if let Some(SpecialRange::Workspace(_spec)) = parse_special(&range) {
            return resolve_workspace_edge(state, name, optional).await;
        }

        let metadata = match fetch_metadata(state, &name).await {
            Ok(m) => m,
            Err(e) => {
                return demote_or_fail(
                    state,
                    optional,
                    ResolveWarning::OptionalSkipped {
                        name: name.clone(),
                        range: range.clone(),
                        reason: e.to_string(),
                    },
                    e,
                )
                .await;
            }
        };

        // Flat-hoisting reuse bias (spec §4.5 step 4): a requirer whose
        // range the already-hoisted top-level version satisfies gets that
        // same version rather than re-running max_satisfying, so one
        // version serves every compatible requirer at the top level.
        let already_hoisted = if state.mode == LayoutMode::Hoisted {
            state.preferred.lock().await.get(&name).cloned()
        } else {
            None
        };
        let reusable = already_hoisted.filter(|v| satisfies_preferred(&range, v));

        let version = match reusable.or_else(|| select_version(&metadata, &range)) {
            Some(v) => v,
            None => {
                let err = PackageManagerError::NoMatch(name.clone(), range.clone());
                return demote_or_fail(
                    state,
                    optional,
                    ResolveWarning::OptionalSkipped {
                        name: name.clone(),
                        range: range.clone(),
                        reason: "no published version satisfies the range".to_string(),
                    },
                    err,
                )
                .await;
            }
        };

        let version_data = metadata
            .versions
            .iter()
            .find(|(key, _)| jio_semver::parse_version(key).map(|v| v == version).unwrap_or(false))
            .map(|(_, v)| v)
            .expect("selected version came from this metadata's own version list");

        if optional && !is_platform_compatible(&version_data.os, &version_data.cpu) {
            state.warnings.lock().await.push(ResolveWarning::PlatformMismatch {
                name: name.clone(),
                version: version.to_string(),
            });
            return Ok(());
        }

        let identity_key = format!("{name}@{version}");

        {
            let mut packages = state.packages.lock().await;
            if packages.contains_key(&identity_key) {
                // Already resolved (or being resolved) by another branch;
                // cycle/shared-reference dedup per spec §9.
                return Ok(());
            }
            let integrity = version_data
                .dist
                .integrity_string()
                .unwrap_or_else(|| version_data.dist.tarball.clone());
            packages.insert(
                identity_key.clone(),
                ResolvedPackage {
                    name: name.clone(),
                    version: version.to_string(),
                    resolved: version_data.dist.tarball.clone(),
                    integrity,
                    dependencies: version_data.dependencies.clone(),
                    dev,
                    optional,
                },
            );
        }

        if state.mode == LayoutMode::Hoisted {
            let mut preferred = state.preferred.lock().await;
            preferred.entry(name.clone()).or_insert_with(|| version.clone());
        }

        {
            let mut peer_checks = state.peer_checks.lock().await;
            for (peer_name, peer_range) in &version_data.peer_dependencies {
                let peer_optional = version_data
                    .peer_dependencies_meta
                    .get(peer_name)
                    .and_then(|v| v.get("optional"))
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false);
                peer_checks.push(PeerCheck {
                    consumer: identity_key.clone(),
                    peer: peer_name.clone(),
                    range: peer_range.clone(),
                    optional: peer_optional,
                });
            }
        }

        let mut child_names: Vec<&String> = version_data.dependencies.keys().collect();
        child_names.extend(version_data.optional_dependencies.keys());
        child_names.sort();
        child_names.dedup();

        let mut children = Vec::new();
        for child_name in child_names {
            let (child_range, child_optional) = if let Some(r) = version_data.dependencies.get(child_name) {
                (r.clone(), optional)
            } else {
                (
                    version_data.optional_dependencies[child_name].clone(),
                    true,
                )
            };
            children.push(resolve_one(state, child_name.clone(), child_range, dev, child_optional));
        }

        for result in join_all(children).await {
            result?;
        }

        Ok(())
    }
    .boxed()
}

async fn resolve_workspace_edge(state: &ResolveState<'_>, name: String, optional: bool) -> Result<()> {
    let Some(version) = state.workspaces.get(&name).cloned() else {
        let err = PackageManagerError::NoMatch(name.clone(), "workspace:*".to_string());
        return demote_or_fail(
            state,
            optional,
            ResolveWarning::OptionalSkipped {
                name: name.clone(),
                range: "workspace:*".to_string(),
                reason: "no matching workspace package".to_string(),
            },
            err,
        )
        .await;
    };
    let identity_key = format!("{name}@{version}");
    let mut packages = state.packages.lock().await;
    packages.entry(identity_key).or_insert_with(|| ResolvedPackage {
        name,
        version,
        resolved: "workspace:".to_string(),
        integrity: String::new(),
        dependencies: IndexMap::new(),
        dev: false,
        optional,
    });
    Ok(())
}

async fn demote_or_fail(
    state: &ResolveState<'_>,
    optional: bool,
    warning: ResolveWarning,
    err: PackageManagerError,
) -> Result<()> {
    if optional {
        state.warnings.lock().await.push(warning);
        Ok(())
    } else {
        Err(err)
    }
}

async fn fetch_metadata(state: &ResolveState<'_>, name: &str) -> Result<Arc<PackageMetadata>> {
    if let Some(hit) = state.metadata_cache.lock().await.get(name) {
        return Ok(hit.clone());
    }
    let fetched = Arc::new(state.registry.metadata(name).await?);
    state
        .metadata_cache
        .lock()
        .await
        .entry(name.to_string())
        .or_insert_with(|| fetched.clone());
    Ok(fetched)
}

/// `latest` dist-tag, or the highest version satisfying an ordinary range
/// (spec §4.1 selection policy; §4.5 step 2).
fn select_version(metadata: &PackageMetadata, range: &str) -> Option<Version> {
    if let Some(SpecialRange::Latest) = parse_special(range) {
        let tag = metadata.dist_tags.get("latest")?;
        return jio_semver::parse_version(tag).ok();
    }
    let parsed = parse_range(range).ok()?;
    max_satisfying(&parsed, &metadata.ordered_versions(), false)
}

fn check_peers(peer_checks: Vec<PeerCheck>, graph: &mut DependencyGraph) {
    for check in peer_checks {
        let present = graph.packages.values().any(|p| p.name == check.peer);
        if !present {
            graph.warnings.push(ResolveWarning::UnmetPeer {
                consumer: check.consumer,
                peer: check.peer,
                range: check.range,
                optional: check.optional,
            });
        }
    }
}

/// True when `version` already chosen for `name` (hoisted top-level pick)
/// would also satisfy a new requirer's range — the reuse bias from spec
/// §4.5 step 4. Exposed for the layout planner, which needs the same
/// answer when deciding whether a requirer can use the top-level copy.
#[must_use]
pub fn satisfies_preferred(range_str: &str, version: &Version) -> bool {
    parse_range(range_str).map(|r| satisfies(&r, version)).unwrap_or(false)
}
