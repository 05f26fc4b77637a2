//! Metadata recorded alongside the CIDR store after each pull.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::Result;

/// What the last pull produced.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PullMetadata {
    #[serde(with = "system_time_serde")]
    pub last_pulled: Option<SystemTime>,
    /// Whether blocks were minimized before saving
    pub merged: bool,
    /// Registries that contributed data
    pub registries: Vec<String>,
}

mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time.map(|t| t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(|s| UNIX_EPOCH + Duration::from_secs(s)))
    }
}

impl PullMetadata {
    /// Metadata for a pull finishing now.
    pub fn now(merged: bool, registries: Vec<String>) -> Self {
        Self {
            last_pulled: Some(SystemTime::now()),
            merged,
            registries,
        }
    }

    /// Load metadata from a file.
    ///
    /// Returns default metadata if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save metadata to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Time since the last pull, `None` if never pulled.
    pub fn age(&self) -> Option<Duration> {
        let last = self.last_pulled?;
        Some(SystemTime::now().duration_since(last).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_metadata_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pull.meta");
        let meta = PullMetadata::now(false, vec!["arin".to_string(), "lacnic".to_string()]);
        meta.save(&path).unwrap();
        let loaded = PullMetadata::load(&path).unwrap();
        assert!(loaded.last_pulled.is_some());
        assert!(!loaded.merged);
        assert_eq!(loaded.registries, vec!["arin", "lacnic"]);
    }

    #[test]
    fn test_metadata_missing_file() {
        let loaded = PullMetadata::load("/nonexistent/pull.meta").unwrap();
        assert!(loaded.last_pulled.is_none());
        assert!(loaded.age().is_none());
    }

    #[test]
    fn test_metadata_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pull.meta");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            PullMetadata::load(&path),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_metadata_age() {
        let meta = PullMetadata {
            last_pulled: Some(SystemTime::now() - Duration::from_secs(3600)),
            ..PullMetadata::default()
        };
        assert!(meta.age().unwrap() >= Duration::from_secs(3600));
    }
}
