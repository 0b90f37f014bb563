//! Bounded-concurrency fetch of resolved packages into the content store
//! (spec §4.8, §5): the orchestrator's `(ResolvedPackage) -> download-then-link`
//! work queue. A package whose bytes are already in the store is skipped
//! without contacting the registry at all.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use jio_error::{PackageManagerError, Result};
use jio_registry::RegistryClient;
use jio_resolver::ResolvedPackage;
use jio_store::ContentStore;

/// Fetch every package in `packages` the store does not already hold, with
/// at most `concurrency` downloads in flight. A required package's failure
/// aborts the whole batch; an optional package's failure is demoted to a
/// warning and simply leaves that entry absent from the store (layout
/// skips placements the store can't satisfy).
pub async fn fetch_missing(
    registry: Arc<RegistryClient>,
    store: Arc<ContentStore>,
    packages: &[ResolvedPackage],
    concurrency: usize,
) -> Result<()> {
    let to_fetch: Vec<ResolvedPackage> = packages
        .iter()
        .filter(|p| !p.resolved.is_empty() && !store.exists(&p.name, &p.version))
        .cloned()
        .collect();

    if to_fetch.is_empty() {
        return Ok(());
    }

    jio_logger::status(&format!("Fetching {} packages...", to_fetch.len()));
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let tasks = to_fetch.into_iter().map(|package| {
        let registry = Arc::clone(&registry);
        let store = Arc::clone(&store);
        let semaphore = Arc::clone(&semaphore);
        async move {
            let permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| PackageManagerError::Cancelled)?;
            let outcome = fetch_one(&registry, &store, &package).await;
            drop(permit);
            match outcome {
                Ok(()) => Ok(()),
                Err(e) if package.optional => {
                    jio_logger::warn(&format!(
                        "optional dependency '{}@{}' failed to download: {e}",
                        package.name, package.version
                    ));
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
    });

    for result in join_all(tasks).await {
        result?;
    }
    Ok(())
}

async fn fetch_one(registry: &Arc<RegistryClient>, store: &Arc<ContentStore>, package: &ResolvedPackage) -> Result<()> {
    let registry = Arc::clone(registry);
    let store = Arc::clone(store);
    let name = package.name.clone();
    let version = package.version.clone();
    let url = package.resolved.clone();
    let integrity = package.integrity.clone();

    tokio::task::spawn_blocking(move || {
        let response = registry.open_tarball(&url)?;
        store.add(&name, &version, response, &integrity)
    })
    .await
    .map_err(|e| PackageManagerError::Io(format!("download task panicked: {e}")))?
}
