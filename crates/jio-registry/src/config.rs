use std::collections::HashMap;
use std::time::Duration;

/// Immutable registry configuration, built once and passed by reference.
/// Mirrors the subset of `.npmrc` keys the core reads (spec §6).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub default_registry: String,
    /// `@scope` -> registry base URL.
    pub scoped_registries: HashMap<String, String>,
    /// registry host -> bearer token.
    pub auth_tokens: HashMap<String, String>,
    pub http_timeout: Duration,
    pub max_retries: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_registry: jio_constants::DEFAULT_REGISTRY.to_string(),
            scoped_registries: HashMap::new(),
            auth_tokens: HashMap::new(),
            http_timeout: Duration::from_secs(30),
            max_retries: u32::from(jio_constants::MAX_ATTEMPTS),
        }
    }
}

impl RegistryConfig {
    /// Registry base URL to use for a (possibly scoped) package name.
    #[must_use]
    pub fn registry_for(&self, package_name: &str) -> &str {
        if let Some(scope) = package_name.strip_prefix('@').and_then(|s| s.split('/').next()) {
            if let Some(url) = self.scoped_registries.get(&format!("@{scope}")) {
                return url;
            }
        }
        &self.default_registry
    }

    #[must_use]
    pub fn token_for_host(&self, host: &str) -> Option<&str> {
        self.auth_tokens.get(host).map(String::as_str)
    }
}
