//! Configuration file support.
//!
//! Every field is optional in YAML:
//!
//! ```yaml
//! cidr_store: /var/lib/cidre
//! proxy: http://proxy.internal:3128
//! timeout_secs: 60
//! retries: 2
//! registries:
//!   ripencc: https://mirror.example.net/delegated-ripencc-extended-latest
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Registry, Result};

/// Default directory for compiled CIDR files.
pub const DEFAULT_CIDR_STORE: &str = "./output/cidr";

/// Default HTTP timeout per registry request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `ipv4/` and `ipv6/` CIDR files
    pub cidr_store: PathBuf,
    /// Proxy URL for registry requests
    pub proxy: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Extra attempts after a failed download
    pub retries: u32,
    /// Registry name → URL override
    pub registries: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cidr_store: PathBuf::from(DEFAULT_CIDR_STORE),
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: 1,
            registries: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse YAML config text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        self.registry_urls()?;
        Ok(())
    }

    /// URL overrides keyed by registry.
    pub fn registry_urls(&self) -> Result<BTreeMap<Registry, String>> {
        self.registries
            .iter()
            .map(|(name, url)| {
                let registry = name
                    .parse::<Registry>()
                    .map_err(|_| Error::Config(format!("unknown registry: {}", name)))?;
                Ok((registry, url.clone()))
            })
            .collect()
    }
}
