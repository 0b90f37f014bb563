//! Opaque, immutable configuration record (spec §6, §9 "Global
//! configuration"): built once from layered sources and passed by reference
//! through the orchestrator — never re-read mid-operation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jio_registry::RegistryConfig;
use jio_resolver::LayoutMode;
use jio_store::LinkMode;
use jio_symcap::SystemCapabilities;

#[derive(Debug, Clone)]
pub struct Config {
    pub store_directory: PathBuf,
    pub cache_directory: PathBuf,
    pub registry: String,
    pub scoped_registries: HashMap<String, String>,
    pub auth_tokens: HashMap<String, String>,
    pub http_timeout: Duration,
    pub max_retries: u32,
    pub max_concurrent_downloads: Option<usize>,
    pub use_hard_links: bool,
    pub use_symlinks: bool,
    pub strict_node_modules: bool,
    pub verify_integrity: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_directory: jio_store::paths::default_store_root(),
            cache_directory: jio_store::paths::default_store_root(),
            registry: jio_constants::DEFAULT_REGISTRY.to_string(),
            scoped_registries: HashMap::new(),
            auth_tokens: HashMap::new(),
            http_timeout: Duration::from_secs(30),
            max_retries: u32::from(jio_constants::MAX_ATTEMPTS),
            max_concurrent_downloads: None,
            use_hard_links: true,
            use_symlinks: false,
            strict_node_modules: false,
            verify_integrity: true,
        }
    }
}

impl Config {
    /// Layer built-in defaults, then a `.npmrc`-style file in `project_dir`
    /// (if present), then nothing further — CLI overrides are applied by
    /// the caller via the `with_*` builders after this returns.
    #[must_use]
    pub fn load(project_dir: &Path) -> Self {
        let mut config = Self::default();
        let npmrc_path = project_dir.join(".npmrc");
        if let Ok(content) = fs::read_to_string(&npmrc_path) {
            config.apply_npmrc(&content);
        }
        config
    }

    fn apply_npmrc(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if let Some(host_key) = key.strip_prefix("//") {
                if let Some(host) = host_key.strip_suffix("/:_authToken") {
                    self.auth_tokens.insert(host.to_string(), value.to_string());
                }
                continue;
            }
            if let Some(scope) = key.strip_suffix(":registry") {
                self.scoped_registries.insert(scope.to_string(), value.to_string());
                continue;
            }
            match key {
                "registry" => self.registry = value.to_string(),
                "store-dir" => self.store_directory = PathBuf::from(value),
                "cache" => self.cache_directory = PathBuf::from(value),
                "fetch-timeout" => {
                    if let Ok(ms) = value.parse::<u64>() {
                        self.http_timeout = Duration::from_millis(ms);
                    }
                }
                "fetch-retries" => {
                    if let Ok(n) = value.parse::<u32>() {
                        self.max_retries = n;
                    }
                }
                "max-concurrent-downloads" => {
                    if let Ok(n) = value.parse::<usize>() {
                        self.max_concurrent_downloads = Some(n);
                    }
                }
                "prefer-offline" | "prefer-symlinked-node-modules" => {
                    self.use_symlinks = value == "true";
                }
                "strict-node-modules" => self.strict_node_modules = value == "true",
                "verify-integrity" => self.verify_integrity = value != "false",
                _ => {}
            }
        }
    }

    #[must_use]
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            default_registry: self.registry.clone(),
            scoped_registries: self.scoped_registries.clone(),
            auth_tokens: self.auth_tokens.clone(),
            http_timeout: self.http_timeout,
            max_retries: self.max_retries,
        }
    }

    #[must_use]
    pub fn layout_mode(&self) -> LayoutMode {
        if self.strict_node_modules {
            LayoutMode::Strict
        } else {
            LayoutMode::Hoisted
        }
    }

    #[must_use]
    pub fn link_mode(&self) -> LinkMode {
        if self.strict_node_modules || self.use_symlinks {
            LinkMode::Symlink
        } else if self.use_hard_links {
            LinkMode::HardLink
        } else {
            LinkMode::HardLink
        }
    }

    /// Bound on simultaneous downloads/store writes (spec §5); falls back to
    /// the system-capability probe when not explicitly configured.
    #[must_use]
    pub fn download_concurrency(&self) -> usize {
        self.max_concurrent_downloads
            .unwrap_or_else(|| SystemCapabilities::get().default_download_concurrency())
    }
}
