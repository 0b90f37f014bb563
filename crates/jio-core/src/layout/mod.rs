//! Node-modules layout (spec §4.7, C7): hoisted and strict placement share
//! the same `{plan(graph) -> placements, materialise(placements)}` pipeline
//! (spec §9 "Dispatch over layout modes"); only the planner differs.

pub mod bin_shims;
mod hoisted;
mod strict;

use std::fs;
use std::path::{Path, PathBuf};

use jio_error::{PackageManagerError, Result};
use jio_resolver::{DependencyGraph, LayoutMode};
use jio_store::{ContentStore, LinkMode};

/// One resolved package placed at one path in `node_modules/`.
#[derive(Debug, Clone)]
pub struct Placement {
    pub name: String,
    pub version: String,
    pub target: PathBuf,
    pub mode: LinkMode,
    /// `.bin` directory that should receive this placement's binary shims,
    /// if it declares any (spec §4.7 "Binary shims").
    pub bin_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutPlan {
    pub placements: Vec<Placement>,
}

#[must_use]
pub fn plan(graph: &DependencyGraph, mode: LayoutMode, project_dir: &Path) -> LayoutPlan {
    match mode {
        LayoutMode::Hoisted => hoisted::plan(graph, project_dir),
        LayoutMode::Strict => strict::plan(graph, project_dir),
    }
}

/// Remove any pre-existing `node_modules/` (spec §4.7 "Destructive
/// updates"), link every placement from the store, then write binary shims.
pub fn materialise(store: &ContentStore, project_dir: &Path, layout: &LayoutPlan) -> Result<()> {
    let node_modules = project_dir.join("node_modules");
    if node_modules.exists() {
        fs::remove_dir_all(&node_modules).map_err(|e| PackageManagerError::Io(e.to_string()))?;
    }

    let batch: Vec<(String, String, PathBuf, LinkMode)> = layout
        .placements
        .iter()
        .map(|p| (p.name.clone(), p.version.clone(), p.target.clone(), p.mode))
        .collect();
    store.link_batch(&batch)?;

    for placement in &layout.placements {
        if let Some(bin_dir) = &placement.bin_dir {
            bin_shims::write_shims_for(&placement.name, &placement.target, bin_dir)?;
        }
    }
    Ok(())
}
