use std::time::Duration;

use jio_error::{PackageManagerError, Result};

use crate::config::RegistryConfig;
use crate::types::{PackageMetadata, RawMetadata};

/// HTTPS client for the registry protocol (§4.3 / §6). Holds both an async
/// client (metadata, the hot path for the resolver's parallel fan-out) and a
/// blocking client (tarball download) — the blocking `reqwest::Response`
/// implements `std::io::Read` directly, which lets the content store decode
/// gzip/tar straight off the wire without ever buffering a whole tarball.
pub struct RegistryClient {
    async_http: reqwest::Client,
    blocking_http: reqwest::blocking::Client,
    config: RegistryConfig,
}

impl RegistryClient {
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let async_http = reqwest::Client::builder()
            .user_agent(jio_constants::USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_default();
        let blocking_http = reqwest::blocking::Client::builder()
            .user_agent(jio_constants::USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_default();
        Self {
            async_http,
            blocking_http,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn host_of(url: &str) -> Option<String> {
        url.split("//").nth(1)?.split('/').next().map(str::to_string)
    }

    /// GET the registry metadata document for `name`, retrying transport
    /// failures with exponential back-off; auth failures are never retried.
    pub async fn metadata(&self, name: &str) -> Result<PackageMetadata> {
        let base = self.config.registry_for(name);
        let encoded = urlencoding::encode(name);
        let url = format!("{}/{}", base.trim_end_matches('/'), encoded);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let mut req = self
                .async_http
                .get(&url)
                .header("Accept", "application/json");
            if let Some(host) = Self::host_of(&url) {
                if let Some(token) = self.config.token_for_host(&host) {
                    req = req.bearer_auth(token);
                }
            }

            match req.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(PackageManagerError::NotFound(name.to_string()));
                    }
                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(PackageManagerError::Auth(format!(
                            "registry returned {status} for {name}"
                        )));
                    }
                    if !status.is_success() {
                        if attempt >= self.config.max_retries {
                            return Err(PackageManagerError::Network(format!(
                                "registry returned {status} for {name}"
                            )));
                        }
                        Self::backoff(attempt).await;
                        continue;
                    }

                    let raw: RawMetadata = resp
                        .json()
                        .await
                        .map_err(|e| PackageManagerError::Network(e.to_string()))?;
                    return Ok(PackageMetadata {
                        name: raw.name,
                        versions: raw.versions,
                        dist_tags: raw.dist_tags,
                    });
                }
                Err(e) => {
                    if attempt >= self.config.max_retries {
                        return Err(PackageManagerError::Network(e.to_string()));
                    }
                    Self::backoff(attempt).await;
                }
            }
        }
    }

    async fn backoff(attempt: u32) {
        let millis = 100u64.saturating_mul(1u64 << attempt.min(6));
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    /// Open a blocking, streaming GET to the tarball URL. The caller reads
    /// from the returned response directly (it implements `Read`); nothing is
    /// buffered here.
    pub fn open_tarball(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let mut req = self.blocking_http.get(url);
            if let Some(host) = Self::host_of(url) {
                if let Some(token) = self.config.token_for_host(&host) {
                    req = req.bearer_auth(token);
                }
            }

            match req.send() {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) if resp.status() == reqwest::StatusCode::NOT_FOUND => {
                    return Err(PackageManagerError::NotFound(url.to_string()));
                }
                Ok(resp)
                    if resp.status() == reqwest::StatusCode::UNAUTHORIZED
                        || resp.status() == reqwest::StatusCode::FORBIDDEN =>
                {
                    return Err(PackageManagerError::Auth(format!(
                        "registry returned {} for {url}",
                        resp.status()
                    )));
                }
                Ok(resp) => {
                    if attempt >= self.config.max_retries {
                        return Err(PackageManagerError::Network(format!(
                            "registry returned {} for {url}",
                            resp.status()
                        )));
                    }
                    std::thread::sleep(Duration::from_millis(
                        100u64.saturating_mul(1u64 << attempt.min(6)),
                    ));
                }
                Err(e) => {
                    if attempt >= self.config.max_retries {
                        return Err(PackageManagerError::Network(e.to_string()));
                    }
                    std::thread::sleep(Duration::from_millis(
                        100u64.saturating_mul(1u64 << attempt.min(6)),
                    ));
                }
            }
        }
    }
}
