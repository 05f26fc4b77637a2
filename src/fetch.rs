//! Download of registry delegation files.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::compile::RegistrySource;
use crate::config::Config;
use crate::{Registry, Result};

/// Downloads delegation files from the RIRs.
///
/// A registry that cannot be fetched after all attempts contributes an
/// empty [`RegistrySource`]; the pull goes on with the others.
pub struct RirFetcher {
    client: reqwest::blocking::Client,
    urls: BTreeMap<Registry, String>,
    attempts: u32,
}

impl RirFetcher {
    /// Build a fetcher from configuration (timeout, proxy, retries, URLs).
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cidre/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            urls: config.registry_urls()?,
            attempts: config.retries + 1,
        })
    }

    /// URL used for a registry.
    pub fn url(&self, registry: Registry) -> &str {
        self.urls
            .get(&registry)
            .map(String::as_str)
            .unwrap_or_else(|| registry.default_url())
    }

    /// Fetch one registry, retrying on failure.
    pub fn fetch(&self, registry: Registry) -> Result<RegistrySource> {
        let url = self.url(registry);
        let mut attempt = 1;
        loop {
            log::info!("Pulling IP ranges from {} ({})", registry, url);
            match self.download(url) {
                Ok(body) => {
                    let source = RegistrySource::from_text(registry, &body);
                    log::debug!("Pulled {} lines from {}", source.lines.len(), registry);
                    return Ok(source);
                }
                Err(e) if attempt < self.attempts => {
                    log::warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        self.attempts,
                        registry,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Fetch all registries. Failures become empty sources.
    pub fn fetch_all(&self) -> Vec<RegistrySource> {
        Registry::ALL
            .into_iter()
            .map(|registry| match self.fetch(registry) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("Error pulling {} data: {}", registry, e);
                    RegistrySource::empty(registry)
                }
            })
            .collect()
    }

    fn download(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls_used() {
        let fetcher = RirFetcher::new(&Config::default()).unwrap();
        for registry in Registry::ALL {
            assert_eq!(fetcher.url(registry), registry.default_url());
        }
        assert_eq!(fetcher.attempts, 2);
    }

    #[test]
    fn test_url_override() {
        let mut config = Config::default();
        config
            .registries
            .insert("arin".to_string(), "http://127.0.0.1:1/arin".to_string());
        let fetcher = RirFetcher::new(&config).unwrap();
        assert_eq!(fetcher.url(Registry::Arin), "http://127.0.0.1:1/arin");
        assert_eq!(fetcher.url(Registry::Apnic), Registry::Apnic.default_url());
    }

    #[test]
    fn test_unreachable_registry_yields_empty_source() {
        let mut config = Config::default();
        config.timeout_secs = 1;
        config.retries = 0;
        for registry in Registry::ALL {
            config.registries.insert(
                registry.as_str().to_string(),
                "http://127.0.0.1:1/unreachable".to_string(),
            );
        }
        let fetcher = RirFetcher::new(&config).unwrap();
        assert!(fetcher.fetch(Registry::Arin).is_err());

        let sources = fetcher.fetch_all();
        assert_eq!(sources.len(), 5);
        assert!(sources.iter().all(|s| s.lines.is_empty()));
    }
}
