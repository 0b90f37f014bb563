use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;

/// One published version, as the registry's metadata document describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageVersion {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: IndexMap<String, String>,
    #[serde(default, rename = "peerDependenciesMeta")]
    pub peer_dependencies_meta: IndexMap<String, serde_json::Value>,
    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub bin: Option<serde_json::Value>,
    #[serde(default)]
    pub os: Option<Vec<String>>,
    #[serde(default)]
    pub cpu: Option<Vec<String>>,
    pub dist: Dist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dist {
    pub tarball: String,
    #[serde(default)]
    pub integrity: Option<String>,
    #[serde(default)]
    pub shasum: Option<String>,
}

impl Dist {
    /// SRI string, preferring the declared `integrity` field and falling back
    /// to the legacy `shasum` hex digest when that's all the registry gave us.
    #[must_use]
    pub fn integrity_string(&self) -> Option<String> {
        self.integrity.clone().or_else(|| {
            self.shasum
                .as_ref()
                .map(|sha1_hex| format!("sha1-{}", hex_to_base64(sha1_hex)))
        })
    }
}

fn hex_to_base64(hex: &str) -> String {
    use base64::Engine;
    let bytes: Vec<u8> = (0..hex.len())
        .step_by(2)
        .filter_map(|i| hex.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
        .collect();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// The full registry document for a package name.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub name: String,
    pub versions: IndexMap<String, PackageVersion>,
    pub dist_tags: HashMap<String, String>,
}

impl PackageMetadata {
    /// Known versions, ascending.
    #[must_use]
    pub fn ordered_versions(&self) -> Vec<jio_semver::Version> {
        let mut versions: Vec<jio_semver::Version> = self
            .versions
            .keys()
            .filter_map(|v| jio_semver::parse_version(v).ok())
            .collect();
        versions.sort();
        versions
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMetadata {
    pub name: String,
    pub versions: IndexMap<String, PackageVersion>,
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,
}
