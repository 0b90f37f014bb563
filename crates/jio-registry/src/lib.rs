pub mod client;
pub mod config;
pub mod types;

pub use client::RegistryClient;
pub use config::RegistryConfig;
pub use types::{Dist, PackageMetadata, PackageVersion};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_registry_overrides_default() {
        let mut config = RegistryConfig::default();
        config
            .scoped_registries
            .insert("@myscope".to_string(), "https://registry.example.com".to_string());

        assert_eq!(
            config.registry_for("@myscope/pkg"),
            "https://registry.example.com"
        );
        assert_eq!(config.registry_for("lodash"), config.default_registry);
    }
}
